use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use station_api::{
    ApiError, ConfigCallback, Directory, ErrorDomain, ObserverRegistry, Share, StationApi,
    SubscriptionToken,
};
use station_app::{
    ActionOutcome, ContextClick, CoordinatorHandle, Dispatcher, NotificationKind, Notifier,
    Request,
};
use station_core::{ConnectionSettings, Msg, Task};
use tokio::sync::mpsc;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(station_logging::initialize_for_tests);
}

/// API double with scripted mutation results.
struct ActionMock {
    registry: ObserverRegistry,
    added: Mutex<Vec<String>>,
    /// URLs whose add should fail.
    rejected_urls: Mutex<Vec<String>>,
    pause_error: Mutex<Option<ApiError>>,
}

impl ActionMock {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            registry: ObserverRegistry::new(),
            added: Mutex::new(Vec::new()),
            rejected_urls: Mutex::new(Vec::new()),
            pause_error: Mutex::new(None),
        })
    }

    fn reject_url(&self, url: &str) {
        self.rejected_urls
            .lock()
            .expect("lock rejections")
            .push(url.to_string());
    }

    fn fail_pause_with(&self, error: ApiError) {
        *self.pause_error.lock().expect("lock pause error") = Some(error);
    }

    fn added(&self) -> Vec<String> {
        self.added.lock().expect("lock added").clone()
    }
}

#[async_trait]
impl StationApi for ActionMock {
    fn reconfigure(&self, _settings: &ConnectionSettings) -> bool {
        false
    }

    fn subscribe_config_changes(&self, callback: ConfigCallback) -> SubscriptionToken {
        self.registry.subscribe(callback)
    }

    fn unsubscribe(&self, token: SubscriptionToken) {
        self.registry.unsubscribe(token);
    }

    async fn list_shares(&self) -> Result<Vec<Share>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_directory(&self, _path: &str) -> Result<Vec<Directory>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        Ok(Vec::new())
    }

    async fn add_task(&self, url: &str, _destination: Option<&str>) -> Result<(), ApiError> {
        if self
            .rejected_urls
            .lock()
            .expect("lock rejections")
            .iter()
            .any(|rejected| rejected == url)
        {
            return Err(ApiError::Protocol {
                domain: ErrorDomain::Task,
                code: 401,
            });
        }
        self.added.lock().expect("lock added").push(url.to_string());
        Ok(())
    }

    async fn pause_task(&self, _id: &str) -> Result<(), ApiError> {
        match self.pause_error.lock().expect("lock pause error").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn resume_task(&self, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete_tasks(&self, _ids: &[String]) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notes: Mutex<Vec<(String, String, NotificationKind)>>,
}

impl RecordingNotifier {
    fn count(&self) -> usize {
        self.notes.lock().expect("lock notes").len()
    }

    fn last_kind(&self) -> Option<NotificationKind> {
        self.notes
            .lock()
            .expect("lock notes")
            .last()
            .map(|(_, _, kind)| *kind)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str, kind: NotificationKind) {
        self.notes
            .lock()
            .expect("lock notes")
            .push((title.to_string(), body.to_string(), kind));
    }
}

struct Harness {
    api: Arc<ActionMock>,
    notifier: Arc<RecordingNotifier>,
    feedback: Arc<AtomicBool>,
    poll_rx: mpsc::UnboundedReceiver<Msg>,
    dispatcher: Dispatcher,
}

fn harness() -> Harness {
    init_logging();
    let api = ActionMock::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let feedback = Arc::new(AtomicBool::new(false));
    let (poll_tx, poll_rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(
        api.clone(),
        notifier.clone(),
        feedback.clone(),
        CoordinatorHandle::new(poll_tx),
    );
    Harness {
        api,
        notifier,
        feedback,
        poll_rx,
        dispatcher,
    }
}

fn polls_requested(rx: &mut mpsc::UnboundedReceiver<Msg>) -> usize {
    let mut count = 0;
    while let Ok(msg) = rx.try_recv() {
        assert_eq!(msg, Msg::PollRequested);
        count += 1;
    }
    count
}

#[tokio::test]
async fn pause_success_triggers_an_immediate_poll() {
    let mut h = harness();
    let outcome = h
        .dispatcher
        .dispatch(Request::PauseTask {
            id: "dbid_1".to_string(),
        })
        .await;

    assert_eq!(outcome, ActionOutcome::Success);
    assert_eq!(polls_requested(&mut h.poll_rx), 1);
}

#[tokio::test]
async fn pause_failure_returns_the_message_and_skips_the_poll() {
    let mut h = harness();
    h.api.fail_pause_with(ApiError::Protocol {
        domain: ErrorDomain::Task,
        code: 404,
    });

    let outcome = h
        .dispatcher
        .dispatch(Request::PauseTask {
            id: "dbid_9".to_string(),
        })
        .await;

    assert_eq!(
        outcome,
        ActionOutcome::Failed {
            message: "No such task.".to_string()
        }
    );
    assert_eq!(polls_requested(&mut h.poll_rx), 0);
}

#[tokio::test]
async fn add_tasks_polls_even_on_partial_failure() {
    let mut h = harness();
    h.api.reject_url("http://bad");

    let outcome = h
        .dispatcher
        .add_tasks(
            vec!["http://good".to_string(), "http://bad".to_string()],
            Some("/video".to_string()),
        )
        .await;

    assert!(matches!(outcome, ActionOutcome::Failed { .. }));
    assert_eq!(h.api.added(), vec!["http://good".to_string()]);
    assert_eq!(polls_requested(&mut h.poll_rx), 1);
}

#[tokio::test]
async fn selection_text_is_split_and_filtered() {
    let mut h = harness();
    let outcome = h
        .dispatcher
        .add_selection_text("http://a\n not-a-url\nftp://b", None)
        .await;

    assert_eq!(outcome, ActionOutcome::Success);
    assert_eq!(
        h.api.added(),
        vec!["http://a".to_string(), "ftp://b".to_string()]
    );
    assert_eq!(polls_requested(&mut h.poll_rx), 1);
}

#[tokio::test]
async fn selection_without_valid_urls_fails_without_network() {
    let mut h = harness();
    let outcome = h
        .dispatcher
        .add_selection_text("just words\nmore words", None)
        .await;

    assert!(matches!(outcome, ActionOutcome::Failed { .. }));
    assert!(h.api.added().is_empty());
    assert_eq!(polls_requested(&mut h.poll_rx), 0);
}

#[tokio::test]
async fn context_click_prefers_the_link_url() {
    let h = harness();
    let outcome = h
        .dispatcher
        .add_from_context_click(ContextClick {
            link_url: Some("http://linked".to_string()),
            src_url: Some("http://media".to_string()),
            selection_text: Some("http://selected".to_string()),
        })
        .await;

    assert_eq!(outcome, ActionOutcome::Success);
    assert_eq!(h.api.added(), vec!["http://linked".to_string()]);
}

#[tokio::test]
async fn unrecognized_message_types_are_ignored() {
    let h = harness();
    let response = h
        .dispatcher
        .dispatch_json(r#"{"type":"frobnicate","id":"x"}"#)
        .await;
    assert_eq!(response, None);

    let response = h
        .dispatcher
        .dispatch_json(r#"{"type":"pause-task","id":"dbid_1"}"#)
        .await;
    assert_eq!(response, Some(ActionOutcome::Success));
}

#[tokio::test]
async fn feedback_toasts_follow_the_cached_flag() {
    let h = harness();

    // Flag off: silent success.
    h.dispatcher
        .add_tasks(vec!["http://a".to_string()], None)
        .await;
    assert_eq!(h.notifier.count(), 0);

    // Flag on: one toast per user action.
    h.feedback.store(true, Ordering::Relaxed);
    h.dispatcher
        .add_tasks(vec!["http://b".to_string()], None)
        .await;
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.notifier.last_kind(), Some(NotificationKind::Success));
}
