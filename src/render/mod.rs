// ABOUTME: Render pipeline module tying variables, templates and job parsing together
// ABOUTME: Exports the render entry points, request type and pipeline error taxonomy

pub mod error;
pub mod pipeline;

pub use error::{RenderError, RenderStage, Result};
pub use pipeline::{render_job, render_template, RenderRequest, Rendered, Renderer};
