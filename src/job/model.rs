// ABOUTME: Structured job model produced from a rendered job specification
// ABOUTME: Mirrors the subset of the scheduler's job object that rendering callers inspect

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub region: Option<String>,
    pub namespace: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub priority: Option<i64>,
    #[serde(default)]
    pub datacenters: Vec<String>,
    #[serde(default)]
    pub meta: IndexMap<String, String>,
    #[serde(default)]
    pub task_groups: Vec<TaskGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub name: String,
    pub count: Option<u64>,
    #[serde(default)]
    pub meta: IndexMap<String, String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub driver: String,
    #[serde(default)]
    pub config: JsonValue,
    #[serde(default)]
    pub env: IndexMap<String, String>,
    #[serde(default)]
    pub meta: IndexMap<String, String>,
}

impl Job {
    pub fn get_task_group(&self, name: &str) -> Option<&TaskGroup> {
        self.task_groups.iter().find(|group| group.name == name)
    }

    /// Total number of tasks across all groups
    pub fn task_count(&self) -> usize {
        self.task_groups.iter().map(|group| group.tasks.len()).sum()
    }
}

impl TaskGroup {
    pub fn get_task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }
}
