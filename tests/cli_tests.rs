// ABOUTME: Integration tests for the CLI application
// ABOUTME: Runs the built binary against fixture templates and checks its output

use std::process::{Command, Output};

mod common;
use common::{fixture, TestEnvironment, TEST_DC_NAME, TEST_ENV_NAME, TEST_ENV_VALUE, TEST_JOB_NAME};

fn nomad_render(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nomad-render"))
        .args(args)
        .env_remove("RUST_LOG")
        .env(TEST_ENV_NAME, TEST_ENV_VALUE)
        .output()
        .expect("Failed to execute command")
}

fn path_str(path: &std::path::Path) -> String {
    path.to_str().unwrap().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = nomad_render(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nomad-render"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("validate"));
}

#[test]
fn test_cli_render_text() {
    let template = path_str(&fixture("single_templated.nomad"));
    let vars = path_str(&fixture("test.tf"));

    let output = nomad_render(&["render", &template, "--var-file", &vars]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("job \"levantExample\""));
    assert!(!stdout.contains("{{"));
}

#[test]
fn test_cli_render_job_json() {
    let template = path_str(&fixture("multi_templated.nomad"));
    let vars = path_str(&fixture("test.yaml"));
    let datacentre = format!("datacentre={}", TEST_DC_NAME);

    let output = nomad_render(&[
        "render", &template, "--var-file", &vars, "--var", &datacentre, "--job",
    ]);

    assert!(output.status.success());
    let job: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(job["name"], TEST_JOB_NAME);
    assert_eq!(job["datacenters"][0], TEST_DC_NAME);
    assert_eq!(job["task_groups"][0]["name"], TEST_ENV_VALUE);
}

#[test]
fn test_cli_missing_variable_fails() {
    let template = path_str(&fixture("missing_var.nomad"));

    let output = nomad_render(&["render", &template, "--var", "job_name=levantExample"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("binary_url"));
}

#[test]
fn test_cli_invalid_var_format() {
    let template = path_str(&fixture("single_templated.nomad"));

    let output = nomad_render(&["render", &template, "--var", "job_name"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("key=value"));
}

#[test]
fn test_cli_validate_with_output_file() {
    let env = TestEnvironment::new();
    let out = env.path().join("rendered.nomad");
    let template = path_str(&fixture("single_templated.nomad"));

    let render = nomad_render(&[
        "render",
        &template,
        "--var",
        "job_name=levantExample",
        "--output",
        &path_str(&out),
    ]);
    assert!(render.status.success());

    let validate = nomad_render(&["validate", &path_str(&out)]);
    assert!(validate.status.success());
    let stdout = String::from_utf8_lossy(&validate.stdout);
    assert!(stdout.contains("Job 'levantExample' is valid"));
    assert!(stdout.contains("Task groups: 1"));
}

#[test]
fn test_cli_config_file_supplies_defaults() {
    let env = TestEnvironment::new();
    let config = env.write_file(
        "nomad-render.yaml",
        &format!(
            "var_files:\n  - {}\nvariables:\n  datacentre: {}\n",
            path_str(&fixture("test.yaml")),
            TEST_DC_NAME
        ),
    );
    let template = path_str(&fixture("multi_templated.nomad"));

    let output = nomad_render(&["--config", &path_str(&config), "render", &template, "--job"]);

    assert!(output.status.success());
    let job: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(job["name"], TEST_JOB_NAME);
    assert_eq!(job["datacenters"][0], TEST_DC_NAME);
}
