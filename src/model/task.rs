use serde::{Deserialize, Serialize};

/// Identifier of a top-level task. Assigned by the store, never by the user.
pub type TaskId = i64;

/// Identifier of a subtask. Its own sequence, unrelated to task ids.
pub type SubtaskId = i64;

/// A top-level checklist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

impl Task {
    /// Create a new, incomplete task
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            completed: false,
        }
    }

    pub fn mark_complete(&mut self) {
        self.completed = true;
    }

    pub fn unmark_complete(&mut self) {
        self.completed = false;
    }
}

/// A checklist entry nested under a task.
///
/// `task_id` is a plain foreign key: nothing guarantees the owning task exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub task_id: TaskId,
    pub title: String,
    pub completed: bool,
}

impl Subtask {
    /// Create a new, incomplete subtask owned by `task_id`
    pub fn new(id: SubtaskId, task_id: TaskId, title: impl Into<String>) -> Self {
        Subtask {
            id,
            task_id,
            title: title.into(),
            completed: false,
        }
    }

    pub fn mark_complete(&mut self) {
        self.completed = true;
    }

    pub fn unmark_complete(&mut self) {
        self.completed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_incomplete() {
        let task = Task::new(3, "Buy milk");
        assert_eq!(task.id, 3);
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn toggle_subtask_completion() {
        let mut sub = Subtask::new(1, 7, "2% milk");
        sub.mark_complete();
        assert!(sub.completed);
        sub.unmark_complete();
        assert!(!sub.completed);
        assert_eq!(sub.task_id, 7);
    }
}
