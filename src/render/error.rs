// ABOUTME: Error types for the render pipeline
// ABOUTME: Wraps stage errors with the template path and records which stage failed

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::job::JobParseError;
use crate::template::TemplateError;
use crate::variables::LoadError;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Loading,
    Merging,
    Rendering,
    Materializing,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStage::Loading => "loading",
            RenderStage::Merging => "merging",
            RenderStage::Rendering => "rendering",
            RenderStage::Materializing => "materializing",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error("Failed to parse job from template {}: {source}", path.display())]
    JobParse {
        path: PathBuf,
        #[source]
        source: JobParseError,
    },
}

impl RenderError {
    /// Stage the pipeline was in when it failed
    pub fn stage(&self) -> RenderStage {
        match self {
            RenderError::Load(_) => RenderStage::Loading,
            RenderError::TemplateRead { .. } | RenderError::Template { .. } => {
                RenderStage::Rendering
            }
            RenderError::JobParse { .. } => RenderStage::Materializing,
        }
    }

    /// Name of the unresolved variable when rendering failed on one
    pub fn missing_variable(&self) -> Option<&str> {
        match self {
            RenderError::Template { source, .. } => source.missing_variable(),
            _ => None,
        }
    }

    /// Template path, for errors raised after the template was known
    pub fn template_path(&self) -> Option<&Path> {
        match self {
            RenderError::Load(_) => None,
            RenderError::TemplateRead { path, .. }
            | RenderError::Template { path, .. }
            | RenderError::JobParse { path, .. } => Some(path),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
