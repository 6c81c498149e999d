// ABOUTME: Flattened variable set and the precedence merge across variable sources
// ABOUTME: Nested mappings become dotted names; later overlays silently replace earlier values

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Separator used when flattening nested mappings into variable names.
pub const PATH_SEPARATOR: char = '.';

/// Ordered mapping from variable name to value.
///
/// Names are case-sensitive. Values are scalars or lists; nested mappings are
/// flattened on the way in, so `{app: {image: redis}}` is stored as
/// `app.image = "redis"`. A name is never stored alongside one of its own
/// dotted descendants: inserting `app` drops every `app.*` entry, and inserting
/// `app.image` drops a scalar `app`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableSet {
    values: IndexMap<String, JsonValue>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a JSON mapping, flattening nested objects
    pub fn from_mapping(mapping: &Map<String, JsonValue>) -> Self {
        let mut set = Self::new();
        for (key, value) in mapping {
            set.insert_flattened(key.clone(), value);
        }
        set
    }

    /// Insert a value, flattening it first if it is a mapping
    pub fn insert_flattened(&mut self, key: String, value: &JsonValue) {
        match value {
            JsonValue::Object(nested) => {
                for (child, child_value) in nested {
                    let path = format!("{}{}{}", key, PATH_SEPARATOR, child);
                    self.insert_flattened(path, child_value);
                }
            }
            other => self.insert(key, other.clone()),
        }
    }

    /// Insert a leaf value, replacing anything it shadows
    pub fn insert(&mut self, key: String, value: JsonValue) {
        let descendant_prefix = format!("{}{}", key, PATH_SEPARATOR);
        self.values
            .retain(|existing, _| !existing.starts_with(&descendant_prefix));

        for (idx, _) in key.match_indices(PATH_SEPARATOR) {
            self.values.shift_remove(&key[..idx]);
        }

        self.values.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Apply every entry of `other` on top of this set
    pub fn overlay(&mut self, other: &VariableSet) {
        for (key, value) in &other.values {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Re-nest dotted names into a JSON object usable as a template context
    pub fn to_context(&self) -> JsonValue {
        let mut root = Map::new();
        for (key, value) in &self.values {
            let mut segments = key.split(PATH_SEPARATOR).peekable();
            let mut current = &mut root;
            while let Some(segment) = segments.next() {
                if segments.peek().is_none() {
                    current.insert(segment.to_string(), value.clone());
                    break;
                }
                let entry = current
                    .entry(segment.to_string())
                    .or_insert_with(|| JsonValue::Object(Map::new()));
                if !entry.is_object() {
                    *entry = JsonValue::Object(Map::new());
                }
                let Some(nested) = entry.as_object_mut() else {
                    break;
                };
                current = nested;
            }
        }
        JsonValue::Object(root)
    }
}

impl From<&HashMap<String, String>> for VariableSet {
    fn from(vars: &HashMap<String, String>) -> Self {
        let mut sorted: Vec<_> = vars.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let mut set = Self::new();
        for (key, value) in sorted {
            set.insert(key.clone(), JsonValue::String(value.clone()));
        }
        set
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key.into(), value.into());
        }
        set
    }
}

/// Merge file-sourced sets in caller order, then apply the inline overrides.
///
/// A later file wins over an earlier one for the same name, and the inline set
/// wins over every file. Names absent from every source stay absent.
pub fn merge(files: &[VariableSet], inline: &VariableSet) -> VariableSet {
    let mut merged = VariableSet::new();
    for file in files {
        merged.overlay(file);
    }
    merged.overlay(inline);
    merged
}
