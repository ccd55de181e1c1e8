use std::time::Duration;

use crate::task::{finished_ids, newly_finished};
use crate::{CoordinatorState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: CoordinatorState, msg: Msg) -> (CoordinatorState, Vec<Effect>) {
    let effects = match msg {
        Msg::SettingsChanged {
            settings,
            config_changed,
        } => {
            let first = state.applied_settings().is_none();
            let notifications_changed = state
                .applied_settings()
                .map(|applied| applied.notifications != settings.notifications)
                .unwrap_or(true);

            let mut effects = Vec::new();
            if config_changed {
                state.invalidate_tasks();
                // The first snapshot only primes state; polling on it would
                // hit the network every time the extension starts passively.
                if !first {
                    effects.push(Effect::PollTasks);
                }
            }
            if notifications_changed {
                if settings.notifications.completion_enabled {
                    // A zero interval would spin; one second is the floor.
                    effects.push(Effect::RestartPollTimer {
                        interval: Duration::from_secs(
                            settings.notifications.poll_interval_secs.max(1),
                        ),
                    });
                } else {
                    effects.push(Effect::CancelPollTimer);
                }
            }
            state.apply_settings(settings);
            effects.push(Effect::RenderBadge(state.badge_view()));
            effects
        }
        Msg::PollRequested => vec![Effect::PollTasks],
        Msg::TasksFetched {
            tasks,
            fetched_at_ms,
        } => {
            state.record_success(tasks, fetched_at_ms);
            let mut effects = Vec::new();
            // Only diff snapshots fetched after this process started, so
            // pre-existing finished tasks never produce notifications.
            if fetched_at_ms > state.started_at_ms() {
                let current = finished_ids(state.tasks());
                if let Some(prior) = state.finished_baseline() {
                    if state.completion_enabled() {
                        for task_id in newly_finished(prior, &current) {
                            let title = state
                                .task_title(&task_id)
                                .unwrap_or_default()
                                .to_string();
                            effects.push(Effect::Notify { task_id, title });
                        }
                    }
                }
                // The baseline advances even while notifications are off;
                // enabling them later must not replay old completions.
                state.set_finished_baseline(current);
            }
            effects.push(Effect::RenderBadge(state.badge_view()));
            effects
        }
        Msg::FetchFailed { message } => {
            state.record_failure(message);
            vec![Effect::RenderBadge(state.badge_view())]
        }
    };

    (state, effects)
}
