use super::task::{Subtask, SubtaskId, Task, TaskId};

/// The in-memory state of a checklist: both collections in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub tasks: Vec<Task>,
    pub subtasks: Vec<Subtask>,
}

impl Board {
    pub fn new(tasks: Vec<Task>, subtasks: Vec<Subtask>) -> Self {
        Board { tasks, subtasks }
    }

    /// First task with the given id (linear scan)
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// First subtask with the given id (linear scan)
    pub fn subtask(&self, id: SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }

    pub fn subtask_mut(&mut self, id: SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == id)
    }

    /// Subtasks owned by `task_id`, in subtask-list order
    pub fn subtasks_of(&self, task_id: TaskId) -> impl Iterator<Item = &Subtask> {
        self.subtasks.iter().filter(move |s| s.task_id == task_id)
    }

    /// Subtasks whose owning task does not exist
    pub fn orphan_subtasks(&self) -> impl Iterator<Item = &Subtask> {
        self.subtasks
            .iter()
            .filter(|s| self.task(s.task_id).is_none())
    }
}
