//! Station core: pure state machine for the download-station front end.
mod effect;
mod msg;
mod settings;
mod state;
mod task;
mod tree;
mod update;
mod urls;
mod versions;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use settings::{BadgeDisplayMode, ConnectionSettings, NotificationSettings, Settings};
pub use state::CoordinatorState;
pub use task::{finished_ids, newly_finished, Task, TaskId, TaskStatus};
pub use tree::{ChildState, DirectoryNode};
pub use update::update;
pub use urls::{extract_download_urls, DOWNLOADABLE_PROTOCOLS};
pub use versions::{RequestToken, RequestVersions};
pub use view_model::{present_node, BadgeColor, BadgeView, IconState, NodePresentation, RowView};
