// ABOUTME: Main application orchestration for the nomad-render CLI
// ABOUTME: Coordinates between CLI arguments, configuration, logging and command execution

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::commands;
use super::{Args, Commands, Config};

pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initialize logging based on configuration. Logs go to stderr so
    /// rendered output on stdout stays clean.
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            &self.config.logging.level
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        match self.config.logging.format.as_str() {
            "compact" => {
                tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .try_init()
                    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .try_init()
                    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
            }
        }

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub async fn run(&mut self, args: Args) -> Result<()> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting nomad-render v{}", env!("CARGO_PKG_VERSION"));
        debug!("Configuration loaded from: {:?}", args.config);

        match args.command {
            Commands::Render {
                templates,
                var_files,
                vars,
                extra,
                job,
                output,
            } => {
                commands::render_templates(
                    templates,
                    var_files,
                    vars,
                    extra,
                    job,
                    output,
                    &self.config,
                )
                .await
            }

            Commands::Validate {
                template,
                var_files,
                vars,
            } => commands::validate_template(template, var_files, vars, &self.config).await,
        }
    }

    /// Create application from parsed command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = Config::load(args.config.clone())?;
        Ok(Self::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_app_creation() {
        let app = App::new(Config::default());
        assert!(app.config().var_files.is_empty());
        assert_eq!(app.config().logging.format, "pretty");
    }

    #[test]
    fn test_app_from_args_with_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nomad-render.yaml");

        fs::write(
            &config_path,
            "variables:\n  job_name: fromConfig\nlogging:\n  level: debug\n  format: compact\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "nomad-render",
            "--config",
            config_path.to_str().unwrap(),
            "validate",
            "job.nomad",
        ])
        .unwrap();

        let app = App::from_args(&args).unwrap();
        assert_eq!(
            app.config().variables.get("job_name"),
            Some(&"fromConfig".to_string())
        );
        assert_eq!(app.config().logging.format, "compact");
    }
}
