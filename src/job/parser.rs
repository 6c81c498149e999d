// ABOUTME: Job specification parser turning rendered HCL into a structured job
// ABOUTME: Defines the JobParser seam and the default HCL job spec implementation

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use super::error::{JobParseError, Result};
use super::model::{Job, Task, TaskGroup};
use crate::template::context::display_value;

/// Turns rendered job descriptor text into a [`Job`].
pub trait JobParser: Send + Sync {
    fn parse(&self, rendered: &str) -> Result<Job>;
}

/// Parser for HCL job specifications.
///
/// ```hcl
/// job "example" {
///   datacenters = ["dc1"]
///   group "cache" {
///     task "redis" {
///       driver = "docker"
///       config { image = "redis:7" }
///     }
///   }
/// }
/// ```
///
/// Exactly one `job` block is accepted. Groups and tasks keep document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HclJobParser;

impl HclJobParser {
    pub fn new() -> Self {
        Self
    }
}

impl JobParser for HclJobParser {
    fn parse(&self, rendered: &str) -> Result<Job> {
        let document: JsonValue = hcl::from_str(rendered)?;

        let jobs = document
            .get("job")
            .map(labeled_blocks)
            .transpose()?
            .unwrap_or_default();

        let (label, body) = match jobs.as_slice() {
            [single] => single,
            [] => return Err(JobParseError::MissingField("job".to_string())),
            _ => {
                return Err(JobParseError::InvalidJob(format!(
                    "expected exactly one job block, found {}",
                    jobs.len()
                )))
            }
        };

        parse_job(label, body)
    }
}

fn parse_job(label: &str, body: &Map<String, JsonValue>) -> Result<Job> {
    let name = optional_string(body, "name")?.unwrap_or_else(|| label.to_string());
    if name.trim().is_empty() {
        return Err(JobParseError::InvalidJob("job name cannot be empty".to_string()));
    }
    let id = optional_string(body, "id")?.unwrap_or_else(|| label.to_string());

    let mut task_groups = Vec::new();
    if let Some(groups) = body.get("group") {
        for (group_name, group_body) in labeled_blocks(groups)? {
            task_groups.push(parse_group(group_name, group_body)?);
        }
    }

    Ok(Job {
        id,
        name,
        region: optional_string(body, "region")?,
        namespace: optional_string(body, "namespace")?,
        job_type: optional_string(body, "type")?,
        priority: optional_integer(body, "priority")?,
        datacenters: string_list(body, "datacenters")?,
        meta: string_map(body, "meta")?,
        task_groups,
    })
}

fn parse_group(label: &str, body: &Map<String, JsonValue>) -> Result<TaskGroup> {
    if label.trim().is_empty() {
        return Err(JobParseError::InvalidJob("group name cannot be empty".to_string()));
    }

    let count = optional_integer(body, "count")?
        .map(|count| {
            u64::try_from(count).map_err(|_| {
                JobParseError::InvalidJob(format!("group '{}' has negative count", label))
            })
        })
        .transpose()?;

    let mut tasks = Vec::new();
    if let Some(task_blocks) = body.get("task") {
        for (task_name, task_body) in labeled_blocks(task_blocks)? {
            tasks.push(parse_task(label, task_name, task_body)?);
        }
    }

    Ok(TaskGroup {
        name: label.to_string(),
        count,
        meta: string_map(body, "meta")?,
        tasks,
    })
}

fn parse_task(group: &str, label: &str, body: &Map<String, JsonValue>) -> Result<Task> {
    let driver = optional_string(body, "driver")?.ok_or_else(|| {
        JobParseError::MissingField(format!("group.{}.task.{}.driver", group, label))
    })?;

    Ok(Task {
        name: label.to_string(),
        driver,
        config: body
            .get("config")
            .cloned()
            .unwrap_or_else(|| JsonValue::Object(Map::new())),
        env: string_map(body, "env")?,
        meta: string_map(body, "meta")?,
    })
}

/// Labeled blocks deserialize as `{label: body}`; repeated identifiers may
/// arrive as a list of such objects.
fn labeled_blocks(value: &JsonValue) -> Result<Vec<(&str, &Map<String, JsonValue>)>> {
    let mut blocks = Vec::new();
    match value {
        JsonValue::Object(labels) => {
            for (label, body) in labels {
                let body = body.as_object().ok_or_else(|| {
                    JobParseError::InvalidJob(format!("block '{}' must have a body", label))
                })?;
                blocks.push((label.as_str(), body));
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                blocks.extend(labeled_blocks(item)?);
            }
        }
        _ => {
            return Err(JobParseError::InvalidJob(
                "expected a labeled block".to_string(),
            ))
        }
    }
    Ok(blocks)
}

fn optional_string(body: &Map<String, JsonValue>, key: &str) -> Result<Option<String>> {
    match body.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(JobParseError::InvalidJob(format!(
            "'{}' must be a string",
            key
        ))),
    }
}

fn optional_integer(body: &Map<String, JsonValue>, key: &str) -> Result<Option<i64>> {
    match body.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n.as_i64().map(Some).ok_or_else(|| {
            JobParseError::InvalidJob(format!("'{}' must be an integer", key))
        }),
        Some(JsonValue::String(s)) => s.trim().parse().map(Some).map_err(|_| {
            JobParseError::InvalidJob(format!("'{}' must be an integer, got '{}'", key, s))
        }),
        Some(_) => Err(JobParseError::InvalidJob(format!(
            "'{}' must be an integer",
            key
        ))),
    }
}

fn string_list(body: &Map<String, JsonValue>, key: &str) -> Result<Vec<String>> {
    match body.get(key) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s.clone()),
                _ => Err(JobParseError::InvalidJob(format!(
                    "'{}' must be a list of strings",
                    key
                ))),
            })
            .collect(),
        Some(_) => Err(JobParseError::InvalidJob(format!("'{}' must be a list", key))),
    }
}

/// Maps may be written as an attribute (`meta = {...}`) or a block (`meta {...}`)
fn string_map(body: &Map<String, JsonValue>, key: &str) -> Result<IndexMap<String, String>> {
    match body.get(key) {
        None | Some(JsonValue::Null) => Ok(IndexMap::new()),
        Some(JsonValue::Object(entries)) => Ok(entries
            .iter()
            .map(|(k, v)| (k.clone(), display_value(v)))
            .collect()),
        Some(JsonValue::Array(items)) => {
            let mut merged = IndexMap::new();
            for item in items {
                let JsonValue::Object(entries) = item else {
                    return Err(JobParseError::InvalidJob(format!(
                        "'{}' must be a map",
                        key
                    )));
                };
                merged.extend(entries.iter().map(|(k, v)| (k.clone(), display_value(v))));
            }
            Ok(merged)
        }
        Some(_) => Err(JobParseError::InvalidJob(format!("'{}' must be a map", key))),
    }
}
