use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One task previously declared in a tasks file, retained so a later run
/// can detect its removal and clean up what it provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedTask {
    #[serde(default)]
    pub logical_name: String,
    #[serde(default)]
    pub physical_id_for_cleanup: String,
    #[serde(rename = "type", default)]
    pub task_type: String,
}

/// Previously declared tasks, keyed by tasks file name.
///
/// Lists are replaced wholesale per file, never merged: a run's
/// declarations fully supersede the previous run's, so tasks removed
/// from the file show up as a set difference in the consumer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedTaskRegistry {
    tasks: BTreeMap<String, Vec<TrackedTask>>,
}

impl TrackedTaskRegistry {
    pub(crate) fn get(&self, tasks_file_name: &str) -> &[TrackedTask] {
        self.tasks
            .get(tasks_file_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn set(&mut self, tasks_file_name: &str, tasks: Vec<TrackedTask>) {
        self.tasks.insert(tasks_file_name.to_string(), tasks);
    }
}
