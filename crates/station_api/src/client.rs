use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use station_core::{ConnectionSettings, Task};
use station_logging::station_debug;
use url::Url;

use crate::api::{ConfigCallback, StationApi};
use crate::config::{ApiConfig, SESSION_NAME};
use crate::error::{ApiError, ErrorDomain};
use crate::observer::{ObserverRegistry, SubscriptionToken};
use crate::types::{Directory, Share};

const AUTH_PATH: &str = "auth.cgi";
const TASK_PATH: &str = "DownloadStation/task.cgi";
const FILE_PATH: &str = "entry.cgi";

const AUTH_API: &str = "SYNO.API.Auth";
const TASK_API: &str = "SYNO.DownloadStation.Task";
const FILE_API: &str = "SYNO.FileStation.List";

/// Protocol codes meaning the cached session id is no longer valid.
const SESSION_EXPIRED_CODES: &[u32] = &[105, 106, 107, 119];

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: u32,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TaskListData {
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct ShareListData {
    shares: Vec<Share>,
}

#[derive(Debug, Deserialize)]
struct DirectoryListData {
    files: Vec<Directory>,
}

#[derive(Debug, Deserialize)]
struct DeleteResult {
    #[allow(dead_code)]
    id: String,
    error: u32,
}

#[derive(Debug, Default)]
struct ClientState {
    config: Option<ApiConfig>,
    sid: Option<String>,
}

/// The one long-lived API client.
///
/// Consumers share a single instance; it is reconfigured in place, never
/// replaced. The inner lock is only held across synchronous sections, never
/// across an await.
pub struct StationClient {
    http: reqwest::Client,
    state: Mutex<ClientState>,
    observers: ObserverRegistry,
}

impl StationClient {
    pub fn new() -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ApiError::Connection(err.to_string()))?;
        Ok(Self {
            http,
            state: Mutex::new(ClientState::default()),
            observers: ObserverRegistry::default(),
        })
    }

    fn config(&self) -> Result<ApiConfig, ApiError> {
        self.state
            .lock()
            .expect("lock client state")
            .config
            .clone()
            .ok_or_else(|| ApiError::Connection("client is not configured".to_string()))
    }

    fn cached_sid(&self) -> Option<String> {
        self.state.lock().expect("lock client state").sid.clone()
    }

    fn store_sid(&self, sid: Option<String>) {
        self.state.lock().expect("lock client state").sid = sid;
    }

    fn endpoint(&self, config: &ApiConfig, path: &str) -> Result<Url, ApiError> {
        let raw = format!(
            "{}://{}:{}/webapi/{}",
            config.scheme, config.host, config.port, path
        );
        Url::parse(&raw).map_err(|err| ApiError::Connection(format!("invalid server address: {err}")))
    }

    /// One request/response round trip: build the URL, send, unwrap the
    /// `{ success, data, error }` envelope.
    async fn call_raw(
        &self,
        path: &str,
        domain: ErrorDomain,
        params: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let config = self.config()?;
        let url = self.endpoint(&config, path)?;
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|err| ApiError::Connection(err.to_string()))?;
        let envelope: Envelope = response
            .json()
            .await
            .map_err(|err| ApiError::Connection(format!("invalid response: {err}")))?;
        if envelope.success {
            Ok(envelope.data.unwrap_or(Value::Null))
        } else {
            let code = envelope.error.map(|body| body.code).unwrap_or(100);
            Err(ApiError::Protocol { domain, code })
        }
    }

    async fn ensure_sid(&self) -> Result<String, ApiError> {
        if let Some(sid) = self.cached_sid() {
            return Ok(sid);
        }
        let config = self.config()?;
        let params = [
            ("api", AUTH_API.to_string()),
            ("version", "2".to_string()),
            ("method", "login".to_string()),
            ("account", config.username.clone()),
            ("passwd", config.password.clone()),
            ("session", SESSION_NAME.to_string()),
            ("format", "sid".to_string()),
        ];
        let data = self.call_raw(AUTH_PATH, ErrorDomain::Auth, &params).await?;
        let login: LoginData = serde_json::from_value(data)
            .map_err(|err| ApiError::Connection(format!("invalid login response: {err}")))?;
        self.store_sid(Some(login.sid.clone()));
        Ok(login.sid)
    }

    /// Authenticated request with one transparent re-login when the server
    /// reports an expired session.
    async fn call_authed(
        &self,
        path: &str,
        domain: ErrorDomain,
        params: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let mut retried = false;
        loop {
            let sid = self.ensure_sid().await?;
            let mut query = params.to_vec();
            query.push(("_sid", sid));
            match self.call_raw(path, domain, &query).await {
                Err(ApiError::Protocol { code, .. })
                    if !retried && SESSION_EXPIRED_CODES.contains(&code) =>
                {
                    station_debug!("session expired (code {}); re-authenticating", code);
                    self.store_sid(None);
                    retried = true;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl StationApi for StationClient {
    fn reconfigure(&self, settings: &ConnectionSettings) -> bool {
        let next = ApiConfig::from_settings(settings);
        let changed = {
            let mut state = self.state.lock().expect("lock client state");
            if state.config.as_ref() == Some(&next) {
                false
            } else {
                state.config = Some(next);
                // A different server or account invalidates the session.
                state.sid = None;
                true
            }
        };
        if changed {
            station_debug!("client configuration changed; notifying observers");
            self.observers.notify_all();
        }
        changed
    }

    fn subscribe_config_changes(&self, callback: ConfigCallback) -> SubscriptionToken {
        self.observers.subscribe(callback)
    }

    fn unsubscribe(&self, token: SubscriptionToken) {
        self.observers.unsubscribe(token);
    }

    async fn list_shares(&self) -> Result<Vec<Share>, ApiError> {
        let params = [
            ("api", FILE_API.to_string()),
            ("version", "2".to_string()),
            ("method", "list_share".to_string()),
        ];
        let data = self
            .call_authed(FILE_PATH, ErrorDomain::FileStation, &params)
            .await?;
        let listing: ShareListData = serde_json::from_value(data)
            .map_err(|err| ApiError::Connection(format!("invalid share listing: {err}")))?;
        Ok(listing.shares)
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<Directory>, ApiError> {
        let params = [
            ("api", FILE_API.to_string()),
            ("version", "2".to_string()),
            ("method", "list".to_string()),
            ("folder_path", path.to_string()),
            ("filetype", "dir".to_string()),
        ];
        let data = self
            .call_authed(FILE_PATH, ErrorDomain::FileStation, &params)
            .await?;
        let listing: DirectoryListData = serde_json::from_value(data)
            .map_err(|err| ApiError::Connection(format!("invalid directory listing: {err}")))?;
        Ok(listing.files)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let params = [
            ("api", TASK_API.to_string()),
            ("version", "1".to_string()),
            ("method", "list".to_string()),
        ];
        let data = self.call_authed(TASK_PATH, ErrorDomain::Task, &params).await?;
        let listing: TaskListData = serde_json::from_value(data)
            .map_err(|err| ApiError::Connection(format!("invalid task listing: {err}")))?;
        Ok(listing.tasks)
    }

    async fn add_task(&self, url: &str, destination: Option<&str>) -> Result<(), ApiError> {
        let mut params = vec![
            ("api", TASK_API.to_string()),
            ("version", "1".to_string()),
            ("method", "create".to_string()),
            ("uri", url.to_string()),
        ];
        if let Some(destination) = destination {
            params.push(("destination", destination.to_string()));
        }
        self.call_authed(TASK_PATH, ErrorDomain::Task, &params)
            .await?;
        Ok(())
    }

    async fn pause_task(&self, id: &str) -> Result<(), ApiError> {
        let params = [
            ("api", TASK_API.to_string()),
            ("version", "1".to_string()),
            ("method", "pause".to_string()),
            ("id", id.to_string()),
        ];
        self.call_authed(TASK_PATH, ErrorDomain::Task, &params)
            .await?;
        Ok(())
    }

    async fn resume_task(&self, id: &str) -> Result<(), ApiError> {
        let params = [
            ("api", TASK_API.to_string()),
            ("version", "1".to_string()),
            ("method", "resume".to_string()),
            ("id", id.to_string()),
        ];
        self.call_authed(TASK_PATH, ErrorDomain::Task, &params)
            .await?;
        Ok(())
    }

    async fn delete_tasks(&self, ids: &[String]) -> Result<(), ApiError> {
        let params = [
            ("api", TASK_API.to_string()),
            ("version", "1".to_string()),
            ("method", "delete".to_string()),
            ("id", ids.join(",")),
            ("force_complete", "false".to_string()),
        ];
        let data = self.call_authed(TASK_PATH, ErrorDomain::Task, &params).await?;
        // Delete reports per-id results inside a successful envelope.
        let results: Vec<DeleteResult> = serde_json::from_value(data).unwrap_or_default();
        if let Some(failed) = results.iter().find(|result| result.error != 0) {
            return Err(ApiError::Protocol {
                domain: ErrorDomain::Task,
                code: failed.error,
            });
        }
        Ok(())
    }
}
