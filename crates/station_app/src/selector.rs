use std::sync::{Arc, Mutex};

use station_api::StationApi;
use station_core::{
    present_node, ChildState, DirectoryNode, NodePresentation, RequestVersions,
};
use station_logging::{station_debug, station_warn};

const ROOT_PATH: &str = "/";

struct SelectorState {
    tree: DirectoryNode,
    versions: RequestVersions,
    subscription: Option<station_api::SubscriptionToken>,
}

/// Drives on-demand loading of the remote directory tree.
///
/// All mutation happens in synchronous sections under the inner lock; the
/// lock is never held across an await, so multiple fetches may be in flight
/// while state stays consistent. Per-path request versions guarantee that
/// only the response to the newest request for a path is ever applied.
pub struct PathSelector {
    api: Arc<dyn StationApi>,
    inner: Mutex<SelectorState>,
}

impl PathSelector {
    pub fn new(api: Arc<dyn StationApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            inner: Mutex::new(SelectorState {
                tree: DirectoryNode::root(),
                versions: RequestVersions::new(),
                subscription: None,
            }),
        })
    }

    /// Subscribes to the client's configuration-change stream (replacing any
    /// previous subscription) and loads the top-level listing.
    pub async fn activate(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let token = self.api.subscribe_config_changes(Arc::new(move || {
            let Some(selector) = weak.upgrade() else {
                return;
            };
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move { selector.load_top_level().await });
                }
                Err(_) => {
                    station_warn!("configuration changed outside the runtime; skipping reload");
                }
            }
        }));
        let previous = self
            .inner
            .lock()
            .expect("lock selector state")
            .subscription
            .replace(token);
        if let Some(previous) = previous {
            self.api.unsubscribe(previous);
        }
        self.load_top_level().await;
    }

    /// Releases the configuration-change subscription.
    pub fn deactivate(&self) {
        let token = self
            .inner
            .lock()
            .expect("lock selector state")
            .subscription
            .take();
        if let Some(token) = token {
            self.api.unsubscribe(token);
        }
    }

    /// Reloads the top-level shares. The root resets to `Unloaded` before the
    /// fetch is issued so the UI shows a spinner right away.
    pub async fn load_top_level(&self) {
        let token = {
            let mut inner = self.inner.lock().expect("lock selector state");
            inner.tree = inner.tree.with_children(ROOT_PATH, ChildState::Unloaded);
            inner.versions.begin(ROOT_PATH)
        };

        let result = self.api.list_shares().await;

        let mut inner = self.inner.lock().expect("lock selector state");
        if !inner.versions.is_current(&token) {
            station_debug!("discarding stale share listing");
            return;
        }
        let children = match result {
            Ok(shares) => ChildState::Loaded(
                shares
                    .into_iter()
                    .map(|share| Arc::new(DirectoryNode::leaf(share.name, share.path)))
                    .collect(),
            ),
            Err(err) => ChildState::Failed {
                message: err.user_message(),
            },
        };
        inner.tree = inner.tree.with_children(ROOT_PATH, children);
    }

    /// Loads the directories under `path`. Calling this before the top-level
    /// listing has completed is a caller error: it is logged and ignored.
    pub async fn load_nested(&self, path: &str) {
        let token = {
            let mut inner = self.inner.lock().expect("lock selector state");
            if !inner.tree.children.is_loaded() {
                station_warn!(
                    "load_nested({}) called before the top-level listing completed",
                    path
                );
                return;
            }
            inner.tree = inner.tree.with_children(path, ChildState::Unloaded);
            inner.versions.begin(path)
        };

        let result = self.api.list_directory(path).await;

        let mut inner = self.inner.lock().expect("lock selector state");
        if !inner.versions.is_current(&token) {
            station_debug!("discarding stale directory listing for {}", path);
            return;
        }
        let children = match result {
            Ok(directories) => ChildState::Loaded(
                directories
                    .into_iter()
                    .map(|dir| Arc::new(DirectoryNode::leaf(dir.name, dir.path)))
                    .collect(),
            ),
            Err(err) => ChildState::Failed {
                message: err.user_message(),
            },
        };
        inner.tree = inner.tree.with_children(path, children);
    }

    /// Snapshot of the current tree.
    pub fn tree(&self) -> DirectoryNode {
        self.inner.lock().expect("lock selector state").tree.clone()
    }

    /// Presentation of the node at `path`, if it exists in the tree.
    pub fn presentation(&self, path: &str) -> Option<NodePresentation> {
        self.inner
            .lock()
            .expect("lock selector state")
            .tree
            .find(path)
            .map(present_node)
    }
}
