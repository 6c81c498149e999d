// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for nomad-render

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nomad-render")]
#[command(about = "Render Nomad job templates from variable files, overrides and the environment")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one or more job templates
    Render {
        #[arg(help = "Job template files (defaults to the single *.nomad file in the current directory)")]
        templates: Vec<PathBuf>,

        #[arg(long = "var-file", help = "Variable file (YAML, HCL or JSON); later files win")]
        var_files: Vec<PathBuf>,

        #[arg(
            short = 'V',
            long = "var",
            help = "Override template variables (key=value)"
        )]
        vars: Vec<String>,

        #[arg(long, default_value = "", help = "Opaque option passed through to the renderer")]
        extra: String,

        #[arg(long, help = "Print the parsed job as JSON instead of the rendered text")]
        job: bool,

        #[arg(short, long, help = "Write output to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Render and parse a job template, reporting whether it is valid
    Validate {
        #[arg(help = "Job template file (defaults to the single *.nomad file in the current directory)")]
        template: Option<PathBuf>,

        #[arg(long = "var-file", help = "Variable file (YAML, HCL or JSON); later files win")]
        var_files: Vec<PathBuf>,

        #[arg(short = 'V', long = "var", help = "Template variables (key=value)")]
        vars: Vec<String>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<HashMap<String, String>> {
        let mut variables = HashMap::new();

        for var in vars {
            match var.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    variables.insert(key.to_string(), value.to_string());
                }
                _ => {
                    return Err(anyhow::anyhow!(
                        "Invalid variable format '{}'. Expected 'key=value'",
                        var
                    ));
                }
            }
        }

        Ok(variables)
    }
}
