// ABOUTME: Command implementations for the nomad-render CLI
// ABOUTME: Handles the render and validate commands on top of the render pipeline

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::args::Args;
use super::config::Config;
use crate::render::{RenderRequest, Renderer};

/// Render every template concurrently and emit the results in argument order
pub async fn render_templates(
    templates: Vec<PathBuf>,
    var_files: Vec<PathBuf>,
    vars: Vec<String>,
    extra: String,
    as_job: bool,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let templates = if templates.is_empty() {
        vec![find_default_template(Path::new("."))?]
    } else {
        templates
    };

    let variables = config.variables_with(Args::parse_variables(&vars)?);
    let var_files = config.var_files_with(&var_files);
    info!(
        "Rendering {} template(s) with {} variable file(s) and {} inline variable(s)",
        templates.len(),
        var_files.len(),
        variables.len()
    );

    let renderer = Arc::new(Renderer::new());
    let mut handles = Vec::with_capacity(templates.len());
    for template in templates {
        let request = RenderRequest::new(&template)
            .with_var_files(&var_files)
            .with_extra(&extra)
            .with_variables(&variables);
        let renderer = Arc::clone(&renderer);
        handles.push(tokio::task::spawn_blocking(move || {
            render_one(&renderer, &request, as_job)
        }));
    }

    let mut rendered = Vec::with_capacity(handles.len());
    for handle in handles {
        rendered.push(handle.await.context("render task panicked")??);
    }
    let content = rendered.join("\n");

    match output {
        Some(path) => {
            std::fs::write(&path, &content)
                .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            info!("Output written to: {}", path.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Render and parse a template, printing a short summary
pub async fn validate_template(
    template: Option<PathBuf>,
    var_files: Vec<PathBuf>,
    vars: Vec<String>,
    config: &Config,
) -> Result<()> {
    let template = match template {
        Some(path) => path,
        None => find_default_template(Path::new("."))?,
    };
    info!("Validating template: {}", template.display());

    let request = RenderRequest::new(&template)
        .with_var_files(&config.var_files_with(&var_files))
        .with_variables(&config.variables_with(Args::parse_variables(&vars)?));

    let job = tokio::task::spawn_blocking(move || Renderer::new().render_job(&request))
        .await
        .context("render task panicked")??;

    println!("✓ Job '{}' is valid", job.name);
    println!("  Task groups: {}", job.task_groups.len());
    println!("  Tasks: {}", job.task_count());

    Ok(())
}

fn render_one(renderer: &Renderer, request: &RenderRequest, as_job: bool) -> Result<String> {
    if as_job {
        let job = renderer.render_job(request)?;
        Ok(serde_json::to_string_pretty(&job)?)
    } else {
        Ok(renderer.render_template(request)?)
    }
}

/// The single `*.nomad` file in `dir`
pub fn find_default_template(dir: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory '{}'", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "nomad"))
        .collect();

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(anyhow::anyhow!(
            "No template given and no *.nomad file found in '{}'",
            dir.display()
        )),
        n => Err(anyhow::anyhow!(
            "No template given and {} *.nomad files found in '{}'; pass one explicitly",
            n,
            dir.display()
        )),
    }
}
