// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Locates fixtures and builds renderers with a deterministic environment

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use nomad_render::{MapEnvironment, Renderer};

pub const TEST_JOB_NAME: &str = "levantExample";
pub const TEST_JOB_NAME_OVERWRITE: &str = "levantExampleOverwrite";
pub const TEST_JOB_NAME_OVERWRITE2: &str = "levantExampleOverwrite2";
pub const TEST_DC_NAME: &str = "dc13";
pub const TEST_ENV_NAME: &str = "GROUP_NAME_ENV";
pub const TEST_ENV_VALUE: &str = "cache";

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixtures(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|name| fixture(name)).collect()
}

/// Renderer whose `env` helper sees only the test group name
pub fn renderer() -> Renderer {
    let env = MapEnvironment::new().with_var(TEST_ENV_NAME, TEST_ENV_VALUE);
    Renderer::with_environment(Arc::new(env))
}

pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }
}
