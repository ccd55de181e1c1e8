use crate::settings::Settings;
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The persisted settings store emitted a new snapshot. `config_changed`
    /// is the API client's own did-configuration-change signal, reported by
    /// the runtime after reconfiguring it with the snapshot's connection
    /// settings (raw input equality would miss that derived fields, like the
    /// session name, are fixed).
    SettingsChanged {
        settings: Settings,
        config_changed: bool,
    },
    /// Poll timer tick or an explicit re-poll request from an action handler.
    PollRequested,
    /// A task-list fetch resolved.
    TasksFetched { tasks: Vec<Task>, fetched_at_ms: u64 },
    /// A task-list fetch failed (connection or protocol), already translated
    /// to a user-facing message.
    FetchFailed { message: String },
}
