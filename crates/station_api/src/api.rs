use std::sync::Arc;

use async_trait::async_trait;
use station_core::{ConnectionSettings, Task};

use crate::error::ApiError;
use crate::observer::SubscriptionToken;
use crate::types::{Directory, Share};

/// Callback fired when the client's effective configuration changes.
pub type ConfigCallback = Arc<dyn Fn() + Send + Sync>;

/// The full capability surface of the download-station client.
///
/// Controllers hold `Arc<dyn StationApi>` so tests can substitute mocks with
/// scripted responses and resolution order.
#[async_trait]
pub trait StationApi: Send + Sync {
    /// Applies new connection settings to the one long-lived client.
    /// Returns true iff the effective configuration actually changed
    /// (derived fields such as the session name never count).
    fn reconfigure(&self, settings: &ConnectionSettings) -> bool;

    /// Registers a configuration-change observer. Each call returns a fresh
    /// token; callers enforce single-subscription by replacing their stored
    /// token and unsubscribing the old one.
    fn subscribe_config_changes(&self, callback: ConfigCallback) -> SubscriptionToken;

    /// Releases an observer registration. Unknown tokens are a no-op.
    fn unsubscribe(&self, token: SubscriptionToken);

    /// Lists the server's top-level shared folders.
    async fn list_shares(&self) -> Result<Vec<Share>, ApiError>;

    /// Lists the directories directly under `path`.
    async fn list_directory(&self, path: &str) -> Result<Vec<Directory>, ApiError>;

    /// Fetches the task list wholesale.
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// Creates a download task for `url`, optionally into `destination`.
    async fn add_task(&self, url: &str, destination: Option<&str>) -> Result<(), ApiError>;

    async fn pause_task(&self, id: &str) -> Result<(), ApiError>;

    async fn resume_task(&self, id: &str) -> Result<(), ApiError>;

    /// Deletes tasks by id, never force-removing incomplete data.
    async fn delete_tasks(&self, ids: &[String]) -> Result<(), ApiError>;
}
