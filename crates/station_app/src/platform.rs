use station_core::BadgeView;

/// Why a notification is being shown; platforms may pick icons per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A download task finished.
    Completion,
    /// A user-initiated action succeeded.
    Success,
    /// A user-initiated action failed.
    Failure,
}

/// Desktop notification delivery, provided by the embedding platform.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str, kind: NotificationKind);
}

/// Browser-action icon/badge rendering, provided by the embedding platform.
pub trait BadgeRenderer: Send + Sync {
    fn render(&self, badge: &BadgeView);
}
