// ABOUTME: Template engine module for job descriptor rendering
// ABOUTME: Provides strict Handlebars rendering, helper functions, and environment access

pub mod context;
pub mod engine;
pub mod error;
pub mod helpers;

pub use context::{EnvironmentReader, MapEnvironment, ProcessEnvironment};
pub use engine::TemplateEngine;
pub use error::{Result, TemplateError};
