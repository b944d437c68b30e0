//! Application services for task tracking.

mod requests;
mod tracking;
mod view;

pub use requests::{CreateTaskRequest, UpdateTaskRequest, UpdateTaskStatusRequest};
pub use tracking::{TaskService, TaskServiceError, TaskServiceResult};
pub use view::TaskView;
