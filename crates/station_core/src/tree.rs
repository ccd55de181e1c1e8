use std::sync::Arc;

/// Load state of a directory node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildState {
    /// Never fetched (or reset pending a fresh fetch).
    Unloaded,
    /// The most recent applied fetch for this node failed.
    Failed { message: String },
    /// The most recent applied fetch succeeded.
    Loaded(Vec<Arc<DirectoryNode>>),
}

impl ChildState {
    pub fn is_unloaded(&self) -> bool {
        matches!(self, ChildState::Unloaded)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ChildState::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChildState::Failed { .. })
    }
}

/// A node in the lazily-loaded remote directory tree.
///
/// The tree is immutable: [`DirectoryNode::with_children`] produces a new root
/// that shallow-copies only the nodes on the path from the root to the target,
/// sharing every untouched subtree with the previous snapshot via `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub name: String,
    /// Absolute, slash-delimited, unique within the tree.
    pub path: String,
    pub children: ChildState,
}

impl DirectoryNode {
    /// The initial tree: a single root at `/` with nothing fetched yet.
    pub fn root() -> Self {
        Self {
            name: "/".to_string(),
            path: "/".to_string(),
            children: ChildState::Unloaded,
        }
    }

    /// A freshly discovered directory whose own contents are not fetched yet.
    pub fn leaf(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: ChildState::Unloaded,
        }
    }

    /// Returns a new tree where the node at `target_path` has `children`
    /// replaced by `state`. If `target_path` is not present the tree is
    /// returned unchanged; the node may have been pruned by a concurrent
    /// higher-level reload, so this is not an error.
    pub fn with_children(&self, target_path: &str, state: ChildState) -> Self {
        self.updated(target_path, &state)
            .unwrap_or_else(|| self.clone())
    }

    fn updated(&self, target_path: &str, state: &ChildState) -> Option<Self> {
        if self.path == target_path {
            return Some(Self {
                name: self.name.clone(),
                path: self.path.clone(),
                children: state.clone(),
            });
        }
        let ChildState::Loaded(children) = &self.children else {
            return None;
        };
        for (index, child) in children.iter().enumerate() {
            if let Some(replacement) = child.updated(target_path, state) {
                // Shallow-copy this level; siblings keep their Arc identity.
                let mut next = children.clone();
                next[index] = Arc::new(replacement);
                return Some(Self {
                    name: self.name.clone(),
                    path: self.path.clone(),
                    children: ChildState::Loaded(next),
                });
            }
        }
        None
    }

    /// Looks up the node at `path`, if present.
    pub fn find(&self, path: &str) -> Option<&DirectoryNode> {
        if self.path == path {
            return Some(self);
        }
        let ChildState::Loaded(children) = &self.children else {
            return None;
        };
        children.iter().find_map(|child| child.find(path))
    }
}
