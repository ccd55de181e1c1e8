use crate::tree::{ChildState, DirectoryNode};

/// Browser-action icon variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Active,
    Disabled,
}

/// Badge background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Success,
    Failure,
}

/// Everything the platform needs to render the browser action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    pub icon: IconState,
    /// Empty string renders as no badge at all.
    pub text: String,
    pub color: BadgeColor,
}

/// One selectable, independently expandable row of the directory picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub name: String,
    pub path: String,
}

/// What to present for a node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePresentation {
    /// Fetch pending; show a spinner.
    Loading,
    /// Last applied fetch failed; show the message with a retry affordance.
    Failed(String),
    /// Loaded and empty.
    Empty,
    /// Loaded with contents.
    Rows(Vec<RowView>),
}

/// Maps a node's child state onto its presentation.
pub fn present_node(node: &DirectoryNode) -> NodePresentation {
    match &node.children {
        ChildState::Unloaded => NodePresentation::Loading,
        ChildState::Failed { message } => NodePresentation::Failed(message.clone()),
        ChildState::Loaded(children) if children.is_empty() => NodePresentation::Empty,
        ChildState::Loaded(children) => NodePresentation::Rows(
            children
                .iter()
                .map(|child| RowView {
                    name: child.name.clone(),
                    path: child.path.clone(),
                })
                .collect(),
        ),
    }
}
