// ABOUTME: Job module for materializing rendered job descriptors
// ABOUTME: Exports the structured job model and the pluggable job spec parser

pub mod error;
pub mod model;
pub mod parser;

pub use error::{JobParseError, Result};
pub use model::{Job, Task, TaskGroup};
pub use parser::{HclJobParser, JobParser};
