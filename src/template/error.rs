// ABOUTME: Error types for template engine operations
// ABOUTME: Separates missing variables from malformed expressions and other render failures

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Missing template variable: {0}")]
    MissingVariable(String),

    #[error("Template syntax error: {0}")]
    SyntaxError(String),

    #[error("Template render error: {0}")]
    RenderError(String),
}

impl TemplateError {
    /// Name of the unresolved variable, if that is what failed
    pub fn missing_variable(&self) -> Option<&str> {
        match self {
            TemplateError::MissingVariable(name) => Some(name),
            _ => None,
        }
    }
}

impl From<handlebars::TemplateError> for TemplateError {
    fn from(err: handlebars::TemplateError) -> Self {
        TemplateError::SyntaxError(err.to_string())
    }
}

impl From<handlebars::RenderError> for TemplateError {
    fn from(err: handlebars::RenderError) -> Self {
        use handlebars::RenderErrorReason;

        match err.reason() {
            RenderErrorReason::MissingVariable(Some(name)) => {
                TemplateError::MissingVariable(name.clone())
            }
            RenderErrorReason::HelperNotFound(name) => {
                TemplateError::SyntaxError(format!("unknown helper '{}'", name))
            }
            RenderErrorReason::TemplateError(inner) => {
                TemplateError::SyntaxError(inner.to_string())
            }
            RenderErrorReason::NestedError(_) => TemplateError::RenderError(err.to_string()),
            // Helper misuse, unknown partials and other expressions that cannot be evaluated
            _ => TemplateError::SyntaxError(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
