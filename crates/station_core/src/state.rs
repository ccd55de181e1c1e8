use std::collections::BTreeSet;

use crate::settings::{BadgeDisplayMode, Settings};
use crate::task::{Task, TaskId};
use crate::view_model::{BadgeColor, BadgeView, IconState};

/// State owned by the background coordination loop.
///
/// Time enters as epoch milliseconds carried by messages, never read from a
/// clock here, so every transition stays reproducible in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorState {
    started_at_ms: u64,
    applied: Option<Settings>,
    tasks: Vec<Task>,
    fetch_failed: bool,
    last_failure: Option<String>,
    last_success_at_ms: Option<u64>,
    /// Ids seen finished/seeding as of the last processed snapshot.
    /// `None` until the first snapshot seeds it; never persisted.
    finished_baseline: Option<BTreeSet<TaskId>>,
}

impl CoordinatorState {
    pub fn new(started_at_ms: u64) -> Self {
        Self {
            started_at_ms,
            applied: None,
            tasks: Vec::new(),
            fetch_failed: false,
            last_failure: None,
            last_success_at_ms: None,
            finished_baseline: None,
        }
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn applied_settings(&self) -> Option<&Settings> {
        self.applied.as_ref()
    }

    /// Whether user-initiated actions should surface success/failure toasts.
    pub fn feedback_enabled(&self) -> bool {
        self.applied
            .as_ref()
            .map(|settings| settings.notifications.feedback_enabled)
            .unwrap_or(false)
    }

    pub fn completion_enabled(&self) -> bool {
        self.applied
            .as_ref()
            .map(|settings| settings.notifications.completion_enabled)
            .unwrap_or(false)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_title(&self, id: &str) -> Option<&str> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.title.as_str())
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn last_success_at_ms(&self) -> Option<u64> {
        self.last_success_at_ms
    }

    pub fn finished_baseline(&self) -> Option<&BTreeSet<TaskId>> {
        self.finished_baseline.as_ref()
    }

    pub(crate) fn apply_settings(&mut self, settings: Settings) {
        self.applied = Some(settings);
    }

    /// Drops everything derived from the previous connection. A reconfigured
    /// client may point at a different server, so old ids mean nothing.
    pub(crate) fn invalidate_tasks(&mut self) {
        self.tasks.clear();
        self.fetch_failed = false;
        self.last_failure = None;
        self.last_success_at_ms = None;
        self.finished_baseline = None;
    }

    pub(crate) fn record_success(&mut self, tasks: Vec<Task>, fetched_at_ms: u64) {
        self.tasks = tasks;
        self.fetch_failed = false;
        self.last_failure = None;
        self.last_success_at_ms = Some(fetched_at_ms);
    }

    pub(crate) fn record_failure(&mut self, message: String) {
        self.fetch_failed = true;
        self.last_failure = Some(message);
    }

    pub(crate) fn set_finished_baseline(&mut self, ids: BTreeSet<TaskId>) {
        self.finished_baseline = Some(ids);
    }

    /// Computes the browser-action rendering for the current state.
    pub fn badge_view(&self) -> BadgeView {
        if self.fetch_failed {
            return BadgeView {
                icon: IconState::Disabled,
                text: String::new(),
                color: BadgeColor::Failure,
            };
        }
        let mode = self
            .applied
            .as_ref()
            .map(|settings| settings.badge_display)
            .unwrap_or(BadgeDisplayMode::Total);
        let count = match mode {
            BadgeDisplayMode::Total => self.tasks.len(),
            BadgeDisplayMode::Filtered => self
                .tasks
                .iter()
                .filter(|task| !task.status.is_complete())
                .count(),
        };
        BadgeView {
            icon: IconState::Active,
            text: if count == 0 {
                String::new()
            } else {
                count.to_string()
            },
            color: BadgeColor::Success,
        }
    }
}
