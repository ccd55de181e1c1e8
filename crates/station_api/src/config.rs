use station_core::ConnectionSettings;

/// Session name registered with the auth endpoint. Fixed for the lifetime of
/// the process, so it never participates in change detection.
pub const SESSION_NAME: &str = "DownloadStation";

/// Effective client configuration, derived from [`ConnectionSettings`].
///
/// Compared by value inside `reconfigure` to produce the
/// did-configuration-change signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ApiConfig {
    pub(crate) fn from_settings(settings: &ConnectionSettings) -> Self {
        Self {
            scheme: settings.scheme.clone(),
            host: settings.host.clone(),
            port: settings.port,
            username: settings.username.clone(),
            password: settings.password.clone(),
        }
    }
}
