use std::collections::HashMap;

/// Proof that a request was begun for a path at a specific version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    path: String,
    version: u64,
}

impl RequestToken {
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Per-path monotonically increasing request counters.
///
/// A fetch records a token before dispatch and checks it after resolution;
/// a token that is no longer current means a newer request superseded the
/// fetch and its response must be discarded without touching state.
#[derive(Debug, Default)]
pub struct RequestVersions {
    by_path: HashMap<String, u64>,
}

impl RequestVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next version for `path` and returns its token.
    pub fn begin(&mut self, path: &str) -> RequestToken {
        let version = self.by_path.entry(path.to_string()).or_insert(0);
        *version += 1;
        RequestToken {
            path: path.to_string(),
            version: *version,
        }
    }

    /// True iff no newer request was begun for the token's path.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.by_path.get(&token.path) == Some(&token.version)
    }
}
