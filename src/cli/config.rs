// ABOUTME: Configuration management for nomad-render
// ABOUTME: Handles loading configuration from YAML files and environment variable overrides

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const LOG_FORMATS: &[&str] = &["pretty", "compact"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Variable files applied before any given on the command line
    #[serde(default)]
    pub var_files: Vec<PathBuf>,

    /// Default inline variables; command line `--var` values win
    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&contents)?
            }
            _ => Config::default(),
        };

        config.merge_env();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            anyhow::bail!(
                "Unknown logging format '{}', expected one of: {}",
                self.logging.format,
                LOG_FORMATS.join(", ")
            );
        }
        Ok(())
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local = [
            PathBuf::from("nomad-render.yaml"),
            PathBuf::from("nomad-render.yml"),
            PathBuf::from(".nomad-render.yaml"),
        ];

        if let Some(path) = local.into_iter().find(|p| p.exists()) {
            return Some(path);
        }

        dirs::home_dir()
            .map(|home| home.join(".nomad-render").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) {
        if let Ok(level) = std::env::var("NOMAD_RENDER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("NOMAD_RENDER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Configured variable files followed by the given ones
    pub fn var_files_with(&self, extra: &[PathBuf]) -> Vec<PathBuf> {
        self.var_files.iter().chain(extra).cloned().collect()
    }

    /// Configured variables overridden by the given ones
    pub fn variables_with(&self, overrides: HashMap<String, String>) -> HashMap<String, String> {
        let mut variables = self.variables.clone();
        variables.extend(overrides);
        variables
    }
}
