pub mod check;
pub mod manager;
pub mod task_ops;

pub use manager::{LoadReport, TaskManager};
pub use task_ops::{RemovedTask, TaskError};
