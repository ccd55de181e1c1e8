use serde::{Deserialize, Serialize};

/// How the browser-action badge counts tasks.
///
/// Exhaustive by construction: an unrecognized mode cannot exist past
/// deserialization, so badge computation never needs a fallback arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeDisplayMode {
    /// Count every task in the snapshot.
    Total,
    /// Count only tasks that are not yet finished or seeding.
    Filtered,
}

/// Connection half of the persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Notification half of the persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Emit a desktop notification when a task reaches finished/seeding.
    pub completion_enabled: bool,
    /// Show success/failure toasts for user-initiated actions.
    pub feedback_enabled: bool,
    /// Periodic poll cadence while completion notifications are on.
    pub poll_interval_secs: u64,
}

/// One immutable snapshot of the persisted settings store.
///
/// Snapshots are compared by value (`PartialEq`) to decide which side effects
/// a change requires; they are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub notifications: NotificationSettings,
    pub badge_display: BadgeDisplayMode,
}
