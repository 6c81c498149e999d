// ABOUTME: Environment access and context lookup for template helpers
// ABOUTME: Isolates process environment reads behind a small injectable trait

use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::variables::set::PATH_SEPARATOR;

/// Read-only view of environment variables used by the `env` helper.
pub trait EnvironmentReader: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentReader for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed environment, mostly for tests
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvironmentReader for MapEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolve a dotted variable name against a render context
pub fn lookup<'a>(context: &'a JsonValue, name: &str) -> Option<&'a JsonValue> {
    name.split(PATH_SEPARATOR)
        .try_fold(context, |current, segment| current.get(segment))
}

/// Text form of a value as it appears in rendered output
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
