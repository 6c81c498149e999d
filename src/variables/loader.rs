// ABOUTME: Variable file loading with per-format sources and format detection
// ABOUTME: Reads YAML, HCL and JSON variable files into flattened variable sets

use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{LoadError, Result};
use super::set::VariableSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableFormat {
    Yaml,
    Hcl,
    Json,
}

impl VariableFormat {
    /// Map a file extension to a format, if it is one we recognise
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(VariableFormat::Yaml),
            "tf" | "hcl" | "tfvars" => Some(VariableFormat::Hcl),
            "json" => Some(VariableFormat::Json),
            _ => None,
        }
    }

    /// Guess a format from file content
    pub fn sniff(content: &str) -> Self {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            return VariableFormat::Json;
        }
        if content.lines().any(looks_like_hcl) {
            return VariableFormat::Hcl;
        }
        VariableFormat::Yaml
    }

    pub fn source(self) -> &'static dyn VariableSource {
        match self {
            VariableFormat::Yaml => &YamlSource,
            VariableFormat::Hcl => &HclSource,
            VariableFormat::Json => &JsonSource,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableFormat::Yaml => "yaml",
            VariableFormat::Hcl => "hcl",
            VariableFormat::Json => "json",
        }
    }
}

impl fmt::Display for VariableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn looks_like_hcl(line: &str) -> bool {
    let line = line.trim();
    if line.starts_with("variable \"") {
        return true;
    }
    let Some((name, _)) = line.split_once('=') else {
        return false;
    };
    let name = name.trim_end();
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Extension first, content second
pub fn detect_format(path: &Path, content: &str) -> VariableFormat {
    VariableFormat::from_extension(path).unwrap_or_else(|| VariableFormat::sniff(content))
}

/// A parser for one variable file syntax.
pub trait VariableSource: Send + Sync {
    fn format(&self) -> VariableFormat;

    /// Parse file content; `path` is only used for error reporting
    fn parse(&self, path: &Path, content: &str) -> Result<VariableSet>;

    fn load(&self, path: &Path) -> Result<VariableSet> {
        let content = read_file(path)?;
        self.parse(path, &content)
    }
}

/// YAML variable files. The root must be a mapping; an empty document is an empty set.
pub struct YamlSource;

impl VariableSource for YamlSource {
    fn format(&self) -> VariableFormat {
        VariableFormat::Yaml
    }

    fn parse(&self, path: &Path, content: &str) -> Result<VariableSet> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        match yaml_to_json(path, document)? {
            JsonValue::Null => Ok(VariableSet::new()),
            JsonValue::Object(mapping) => Ok(VariableSet::from_mapping(&mapping)),
            _ => Err(not_a_mapping(path)),
        }
    }
}

/// HCL variable files.
///
/// Top-level attributes are variables. `variable "name" { default = ... }`
/// blocks declare `name` with the value of `default`; other blocks are
/// flattened like nested mappings.
pub struct HclSource;

impl VariableSource for HclSource {
    fn format(&self) -> VariableFormat {
        VariableFormat::Hcl
    }

    fn parse(&self, path: &Path, content: &str) -> Result<VariableSet> {
        let document: JsonValue = hcl::from_str(content).map_err(|source| LoadError::Hcl {
            path: path.to_path_buf(),
            source,
        })?;

        let JsonValue::Object(mut mapping) = document else {
            return Err(not_a_mapping(path));
        };

        let declarations = mapping.remove("variable");
        let mut set = VariableSet::new();

        // Declared defaults first so explicit assignments in the same file win
        if let Some(declarations) = declarations {
            let JsonValue::Object(declarations) = declarations else {
                return Err(LoadError::InvalidFormat {
                    path: path.to_path_buf(),
                    reason: "variable blocks must carry a name label".to_string(),
                });
            };
            for (name, declaration) in declarations {
                if let Some(default) = declaration.get("default") {
                    set.insert_flattened(name, default);
                }
            }
        }
        set.overlay(&VariableSet::from_mapping(&mapping));

        Ok(set)
    }
}

/// JSON variable files, same shape rules as YAML.
pub struct JsonSource;

impl VariableSource for JsonSource {
    fn format(&self) -> VariableFormat {
        VariableFormat::Json
    }

    fn parse(&self, path: &Path, content: &str) -> Result<VariableSet> {
        let document: JsonValue =
            serde_json::from_str(content).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        match document {
            JsonValue::Object(mapping) => Ok(VariableSet::from_mapping(&mapping)),
            _ => Err(not_a_mapping(path)),
        }
    }
}

/// Read one variable file, detect its format and parse it
pub fn load_file(path: &Path) -> Result<VariableSet> {
    let content = read_file(path)?;
    let format = detect_format(path, &content);
    let set = format.source().parse(path, &content)?;
    debug!(
        "Loaded {} variables from {} ({})",
        set.len(),
        path.display(),
        format
    );
    Ok(set)
}

/// Load variable files in the order given; the first failure aborts
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<VariableSet>> {
    paths.iter().map(|p| load_file(p.as_ref())).collect()
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn not_a_mapping(path: &Path) -> LoadError {
    LoadError::InvalidFormat {
        path: PathBuf::from(path),
        reason: "top level must be a mapping of variable names to values".to_string(),
    }
}

fn yaml_to_json(path: &Path, value: serde_yaml::Value) -> Result<JsonValue> {
    use serde_yaml::Value as Yaml;

    let json = match value {
        Yaml::Null => JsonValue::Null,
        Yaml::Bool(b) => JsonValue::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
                    .ok_or_else(|| LoadError::InvalidFormat {
                        path: path.to_path_buf(),
                        reason: format!("number '{}' is not finite", n),
                    })?
            }
        }
        Yaml::String(s) => JsonValue::String(s),
        Yaml::Sequence(items) => JsonValue::Array(
            items
                .into_iter()
                .map(|item| yaml_to_json(path, item))
                .collect::<Result<_>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(yaml_key(key), yaml_to_json(path, value)?);
            }
            JsonValue::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(path, tagged.value)?,
    };
    Ok(json)
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
