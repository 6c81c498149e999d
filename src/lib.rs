// ABOUTME: Main library module for the nomad-render job templating engine
// ABOUTME: Exports variable loading, template rendering, job parsing and the render pipeline

pub mod cli;
pub mod job;
pub mod render;
pub mod template;
pub mod variables;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use job::{HclJobParser, Job, JobParser, Task, TaskGroup};
pub use render::{render_job, render_template, RenderError, RenderRequest, Rendered, Renderer};
pub use template::{EnvironmentReader, MapEnvironment, ProcessEnvironment, TemplateEngine};
pub use variables::{merge, VariableSet};

// Error handling
pub type Result<T> = anyhow::Result<T>;
