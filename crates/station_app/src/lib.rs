//! Station app: runtime wiring between the pure core, the API client, and
//! the embedding platform.
mod coordinator;
mod dispatcher;
mod logging;
mod platform;
mod selector;

pub use coordinator::{now_ms, Coordinator, CoordinatorHandle};
pub use dispatcher::{ActionOutcome, ContextClick, Dispatcher, Request};
pub use logging::{initialize as initialize_logging, LogConfig, LogDestination};
pub use platform::{BadgeRenderer, NotificationKind, Notifier};
pub use selector::PathSelector;
