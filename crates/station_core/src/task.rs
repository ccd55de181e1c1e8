use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type TaskId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Waiting,
    Downloading,
    Paused,
    Finishing,
    Finished,
    Seeding,
    Error,
}

impl TaskStatus {
    /// Finished for notification purposes: the download itself is complete,
    /// whether or not the task keeps seeding afterwards.
    pub fn is_complete(self) -> bool {
        matches!(self, TaskStatus::Finished | TaskStatus::Seeding)
    }
}

/// One task record as reported by the download service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
}

/// Ids of all tasks that have reached a complete status.
pub fn finished_ids(tasks: &[Task]) -> BTreeSet<TaskId> {
    tasks
        .iter()
        .filter(|task| task.status.is_complete())
        .map(|task| task.id.clone())
        .collect()
}

/// Ids present in `current` but absent from `prior`, in stable order.
pub fn newly_finished(prior: &BTreeSet<TaskId>, current: &BTreeSet<TaskId>) -> Vec<TaskId> {
    current.difference(prior).cloned().collect()
}
