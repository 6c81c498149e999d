// ABOUTME: Error types for job specification parsing
// ABOUTME: Keeps the underlying HCL diagnostics intact for the caller

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobParseError {
    #[error("Failed to parse job specification: {0}")]
    Hcl(#[from] hcl::Error),

    #[error("Invalid job specification: {0}")]
    InvalidJob(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

pub type Result<T> = std::result::Result<T, JobParseError>;
