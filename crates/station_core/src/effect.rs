use std::time::Duration;

use crate::task::TaskId;
use crate::view_model::BadgeView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the task list now and feed back `TasksFetched`/`FetchFailed`.
    PollTasks,
    /// Cancel any existing poll timer and start a new one. Cancel and start
    /// happen as one step so a timer is never left dangling.
    RestartPollTimer { interval: Duration },
    /// Cancel the poll timer without starting a new one.
    CancelPollTimer,
    /// Render the browser-action icon and badge.
    RenderBadge(BadgeView),
    /// Emit one desktop notification for a newly finished task.
    Notify { task_id: TaskId, title: String },
}
