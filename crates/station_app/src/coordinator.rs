use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use station_api::StationApi;
use station_core::{update, CoordinatorState, Effect, Msg, Settings};
use station_logging::station_info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::platform::{BadgeRenderer, NotificationKind, Notifier};

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Cheap handle for feeding messages into the coordination loop.
#[derive(Clone)]
pub struct CoordinatorHandle {
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl CoordinatorHandle {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self { msg_tx }
    }

    /// Requests an immediate task-list poll.
    pub fn request_poll(&self) {
        let _ = self.msg_tx.send(Msg::PollRequested);
    }
}

/// The background coordination loop.
///
/// Owns the one long-lived API client, reacts to settings snapshots, drives
/// the poll timer, and turns pure-core effects into platform side effects.
/// The poll timer is the only unprompted source of network calls and is
/// cancelled and recreated as one step, never left dangling. In-flight polls
/// are never cancelled; a late result simply replaces the snapshot wholesale.
pub struct Coordinator {
    api: Arc<dyn StationApi>,
    badge: Arc<dyn BadgeRenderer>,
    notifier: Arc<dyn Notifier>,
    state: CoordinatorState,
    started_at_ms: u64,
    feedback_enabled: Arc<AtomicBool>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    poll_timer: Option<JoinHandle<()>>,
}

impl Coordinator {
    pub fn new(
        api: Arc<dyn StationApi>,
        badge: Arc<dyn BadgeRenderer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_start_time(api, badge, notifier, now_ms())
    }

    pub fn with_start_time(
        api: Arc<dyn StationApi>,
        badge: Arc<dyn BadgeRenderer>,
        notifier: Arc<dyn Notifier>,
        started_at_ms: u64,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            api,
            badge,
            notifier,
            state: CoordinatorState::new(started_at_ms),
            started_at_ms,
            feedback_enabled: Arc::new(AtomicBool::new(false)),
            msg_tx,
            msg_rx,
            poll_timer: None,
        }
    }

    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle::new(self.msg_tx.clone())
    }

    /// Shared flag read by action handlers to decide whether to show toasts.
    pub fn feedback_flag(&self) -> Arc<AtomicBool> {
        self.feedback_enabled.clone()
    }

    /// Runs until the settings stream closes.
    pub async fn run(mut self, mut settings_rx: mpsc::UnboundedReceiver<Settings>) {
        loop {
            tokio::select! {
                maybe_settings = settings_rx.recv() => {
                    match maybe_settings {
                        Some(settings) => {
                            let config_changed = self.api.reconfigure(&settings.connection);
                            self.apply(Msg::SettingsChanged { settings, config_changed });
                        }
                        None => break,
                    }
                }
                maybe_msg = self.msg_rx.recv() => {
                    if let Some(msg) = maybe_msg {
                        self.apply(msg);
                    }
                }
            }
        }
        self.cancel_timer();
    }

    fn apply(&mut self, msg: Msg) {
        let state = std::mem::replace(&mut self.state, CoordinatorState::new(self.started_at_ms));
        let (state, effects) = update(state, msg);
        self.state = state;
        self.feedback_enabled
            .store(self.state.feedback_enabled(), Ordering::Relaxed);
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PollTasks => self.spawn_poll(),
            Effect::RestartPollTimer { interval } => {
                self.cancel_timer();
                let msg_tx = self.msg_tx.clone();
                self.poll_timer = Some(tokio::spawn(async move {
                    let mut timer = tokio::time::interval(interval);
                    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    // An interval yields immediately once; the first poll
                    // should wait a full period.
                    timer.tick().await;
                    loop {
                        timer.tick().await;
                        if msg_tx.send(Msg::PollRequested).is_err() {
                            break;
                        }
                    }
                }));
            }
            Effect::CancelPollTimer => self.cancel_timer(),
            Effect::RenderBadge(view) => self.badge.render(&view),
            Effect::Notify { task_id, title } => {
                station_info!("task {} reached a finished state", task_id);
                let body = if title.is_empty() { task_id } else { title };
                self.notifier
                    .notify("Download finished", &body, NotificationKind::Completion);
            }
        }
    }

    fn spawn_poll(&self) {
        let api = self.api.clone();
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let msg = match api.list_tasks().await {
                Ok(tasks) => Msg::TasksFetched {
                    tasks,
                    fetched_at_ms: now_ms(),
                },
                Err(err) => Msg::FetchFailed {
                    message: err.user_message(),
                },
            };
            let _ = msg_tx.send(msg);
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.poll_timer.take() {
            timer.abort();
        }
    }
}
