//! Domain model for tracked tasks.
//!
//! Tasks live inside exactly one project, may be assigned to one user, and
//! may hang under a parent task of the same project. Every mutation bumps a
//! version counter that persistence uses for optimistic concurrency.

mod error;
mod ids;
mod sort;
mod status;
mod task;

pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, TaskVersion};
pub use sort::TaskSortField;
pub use status::{TaskPriority, TaskStatus};
pub use task::{FieldChange, NewTaskData, PersistedTaskData, Task, TaskChanges, TaskTitle};
