// ABOUTME: Render pipeline from template path and variable sources to a structured job
// ABOUTME: Runs loading, merging, rendering and materializing strictly in sequence

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::error::{RenderError, RenderStage, Result};
use crate::job::{HclJobParser, Job, JobParser};
use crate::template::{EnvironmentReader, ProcessEnvironment, TemplateEngine};
use crate::variables::{load_files, merge, VariableSet};

/// Everything one render call needs. The request owns its inline variables,
/// so the caller's map is snapshotted when the request is built.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub template: PathBuf,
    pub var_files: Vec<PathBuf>,
    /// Opaque configuration string, empty by default. Recorded in logs only.
    pub extra: String,
    pub variables: HashMap<String, String>,
}

impl RenderRequest {
    pub fn new<P: AsRef<Path>>(template: P) -> Self {
        Self {
            template: template.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_var_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.var_files.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_var_files<P: AsRef<Path>>(mut self, paths: &[P]) -> Self {
        self.var_files
            .extend(paths.iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    pub fn with_extra(mut self, extra: &str) -> Self {
        self.extra = extra.to_string();
        self
    }

    pub fn with_variable(mut self, key: &str, value: &str) -> Self {
        self.variables.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_variables(mut self, variables: &HashMap<String, String>) -> Self {
        self.variables
            .extend(variables.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}

/// Rendered job text together with the variable bindings used to produce it
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub variables: VariableSet,
}

/// Stateless render pipeline; safe to share across threads.
#[derive(Clone)]
pub struct Renderer {
    engine: TemplateEngine,
    parser: Arc<dyn JobParser>,
}

impl Renderer {
    /// Renderer reading the process environment and parsing HCL job specs
    pub fn new() -> Self {
        Self::with_environment(Arc::new(ProcessEnvironment))
    }

    pub fn with_environment(env: Arc<dyn EnvironmentReader>) -> Self {
        Self {
            engine: TemplateEngine::with_environment(env),
            parser: Arc::new(HclJobParser::new()),
        }
    }

    /// Replace the job spec parser used for materializing
    pub fn with_parser(mut self, parser: Arc<dyn JobParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Load, merge and render, returning the text and the merged bindings
    #[instrument(skip(self, request), fields(template = %request.template.display()))]
    pub fn render(&self, request: &RenderRequest) -> Result<Rendered> {
        if !request.extra.is_empty() {
            debug!("Render option: {}", request.extra);
        }

        debug!(
            "Stage {}: {} variable files",
            RenderStage::Loading,
            request.var_files.len()
        );
        let inline = VariableSet::from(&request.variables);
        let files = load_files(&request.var_files)?;

        debug!(
            "Stage {}: {} inline variables",
            RenderStage::Merging,
            inline.len()
        );
        let variables = merge(&files, &inline);

        debug!(
            "Stage {}: {} resolved variables",
            RenderStage::Rendering,
            variables.len()
        );
        let template =
            std::fs::read_to_string(&request.template).map_err(|source| {
                RenderError::TemplateRead {
                    path: request.template.clone(),
                    source,
                }
            })?;
        let text = self
            .engine
            .render(&template, &variables)
            .map_err(|source| RenderError::Template {
                path: request.template.clone(),
                source,
            })?;

        Ok(Rendered { text, variables })
    }

    /// Render without materializing
    pub fn render_template(&self, request: &RenderRequest) -> Result<String> {
        self.render(request).map(|rendered| rendered.text)
    }

    /// Render and parse into a job
    pub fn render_job(&self, request: &RenderRequest) -> Result<Job> {
        let rendered = self.render(request)?;

        debug!(
            "Stage {}: {}",
            RenderStage::Materializing,
            request.template.display()
        );
        self.parser
            .parse(&rendered.text)
            .map_err(|source| RenderError::JobParse {
                path: request.template.clone(),
                source,
            })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a template into a job using the process environment
pub fn render_job<T: AsRef<Path>, P: AsRef<Path>>(
    template: T,
    var_files: &[P],
    extra: &str,
    variables: &HashMap<String, String>,
) -> Result<Job> {
    let request = RenderRequest::new(template)
        .with_var_files(var_files)
        .with_extra(extra)
        .with_variables(variables);
    Renderer::new().render_job(&request)
}

/// Render a template to text using the process environment
pub fn render_template<T: AsRef<Path>, P: AsRef<Path>>(
    template: T,
    var_files: &[P],
    extra: &str,
    variables: &HashMap<String, String>,
) -> Result<String> {
    let request = RenderRequest::new(template)
        .with_var_files(var_files)
        .with_extra(extra)
        .with_variables(variables);
    Renderer::new().render_template(&request)
}
