use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use station_api::{ApiError, StationApi};
use station_core::{extract_download_urls, DOWNLOADABLE_PROTOCOLS};
use station_logging::station_warn;

use crate::coordinator::CoordinatorHandle;
use crate::platform::{NotificationKind, Notifier};

const NO_VALID_URL: &str = "No valid URL to download.";

/// Inbound action request, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    AddTasks {
        urls: Vec<String>,
        #[serde(default)]
        destination: Option<String>,
    },
    PollTasks,
    PauseTask {
        id: String,
    },
    ResumeTask {
        id: String,
    },
    DeleteTasks {
        ids: Vec<String>,
    },
}

/// Uniform result shape returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ActionOutcome {
    Success,
    Failed { message: String },
}

/// Payload of a context-menu click: exactly one of these is usually set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextClick {
    pub link_url: Option<String>,
    pub src_url: Option<String>,
    pub selection_text: Option<String>,
}

/// Routes inbound action requests to the API client.
pub struct Dispatcher {
    api: Arc<dyn StationApi>,
    notifier: Arc<dyn Notifier>,
    /// Cached by the coordination loop from the latest settings snapshot.
    feedback_enabled: Arc<AtomicBool>,
    coordinator: CoordinatorHandle,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn StationApi>,
        notifier: Arc<dyn Notifier>,
        feedback_enabled: Arc<AtomicBool>,
        coordinator: CoordinatorHandle,
    ) -> Self {
        Self {
            api,
            notifier,
            feedback_enabled,
            coordinator,
        }
    }

    /// Parses and dispatches a raw inbound message. Unrecognized message
    /// types are logged and ignored; `None` means no response should be sent.
    pub async fn dispatch_json(&self, raw: &str) -> Option<ActionOutcome> {
        match serde_json::from_str::<Request>(raw) {
            Ok(request) => Some(self.dispatch(request).await),
            Err(err) => {
                station_warn!("ignoring unrecognized inbound message: {}", err);
                None
            }
        }
    }

    pub async fn dispatch(&self, request: Request) -> ActionOutcome {
        match request {
            Request::AddTasks { urls, destination } => self.add_tasks(urls, destination).await,
            Request::PollTasks => {
                self.coordinator.request_poll();
                ActionOutcome::Success
            }
            Request::PauseTask { id } => {
                let result = self.api.pause_task(&id).await;
                self.complete_mutation(result)
            }
            Request::ResumeTask { id } => {
                let result = self.api.resume_task(&id).await;
                self.complete_mutation(result)
            }
            Request::DeleteTasks { ids } => {
                let result = self.api.delete_tasks(&ids).await;
                self.complete_mutation(result)
            }
        }
    }

    /// Adds download tasks by URL. A re-poll runs regardless of the outcome
    /// because the server may accept a subset of the URLs.
    pub async fn add_tasks(
        &self,
        urls: Vec<String>,
        destination: Option<String>,
    ) -> ActionOutcome {
        if urls.is_empty() {
            return ActionOutcome::Failed {
                message: NO_VALID_URL.to_string(),
            };
        }
        let mut failures = Vec::new();
        for url in &urls {
            if let Err(err) = self.api.add_task(url, destination.as_deref()).await {
                station_warn!("adding task failed for {}: {}", url, err);
                failures.push(err.user_message());
            }
        }
        self.coordinator.request_poll();

        let outcome = if failures.is_empty() {
            ActionOutcome::Success
        } else {
            ActionOutcome::Failed {
                message: failures.join(" "),
            }
        };
        self.send_feedback(&outcome, urls.len());
        outcome
    }

    /// Bulk add from selected text: one URL per line, unrecognized schemes
    /// filtered out. Zero survivors fail without touching the network.
    pub async fn add_selection_text(
        &self,
        selection: &str,
        destination: Option<String>,
    ) -> ActionOutcome {
        let urls = extract_download_urls(selection, DOWNLOADABLE_PROTOCOLS);
        if urls.is_empty() {
            return ActionOutcome::Failed {
                message: NO_VALID_URL.to_string(),
            };
        }
        self.add_tasks(urls, destination).await
    }

    /// Entry point for context-menu clicks: prefer the link URL, then the
    /// media source URL, then fall back to splitting the selected text.
    pub async fn add_from_context_click(&self, click: ContextClick) -> ActionOutcome {
        if let Some(url) = click.link_url.or(click.src_url) {
            return self.add_tasks(vec![url], None).await;
        }
        match click.selection_text {
            Some(text) => self.add_selection_text(&text, None).await,
            None => ActionOutcome::Failed {
                message: NO_VALID_URL.to_string(),
            },
        }
    }

    /// Pause/resume/delete share one shape: re-poll only on success, return
    /// the translated failure otherwise.
    fn complete_mutation(&self, result: Result<(), ApiError>) -> ActionOutcome {
        match result {
            Ok(()) => {
                self.coordinator.request_poll();
                ActionOutcome::Success
            }
            Err(err) => ActionOutcome::Failed {
                message: err.user_message(),
            },
        }
    }

    fn send_feedback(&self, outcome: &ActionOutcome, count: usize) {
        if !self.feedback_enabled.load(Ordering::Relaxed) {
            return;
        }
        match outcome {
            ActionOutcome::Success => self.notifier.notify(
                "Tasks added",
                &format!("Added {count} download task(s)."),
                NotificationKind::Success,
            ),
            ActionOutcome::Failed { message } => {
                self.notifier
                    .notify("Adding tasks failed", message, NotificationKind::Failure)
            }
        }
    }
}
