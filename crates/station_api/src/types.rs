use serde::Deserialize;

/// A top-level shared folder on the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Share {
    pub name: String,
    pub path: String,
}

/// A directory inside a share.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Directory {
    pub name: String,
    pub path: String,
}
