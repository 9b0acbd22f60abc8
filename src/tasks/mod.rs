//! Task sessions: explicit state machines behind the create-task form and
//! the task-detail screen.

pub mod create;
pub mod detail;

pub use create::CreateTaskSession;
pub use detail::{AssignmentRow, TaskDetailSession};
