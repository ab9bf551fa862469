use crate::model::board::Board;
use crate::model::task::{Subtask, SubtaskId, Task, TaskId};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Store(#[from] crate::io::record_store::StoreError),
    #[error("no {kind} id left after {last}")]
    IdsExhausted { kind: &'static str, last: i64 },
}

/// A task removed together with the subtasks that pointed at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedTask {
    pub task: Task,
    pub subtasks: Vec<Subtask>,
}

// ---------------------------------------------------------------------------
// Id assignment
// ---------------------------------------------------------------------------

/// One past the largest id in use, or 1 when there are none.
fn next_id(ids: impl Iterator<Item = i64>, kind: &'static str) -> Result<i64, TaskError> {
    match ids.max() {
        None => Ok(1),
        Some(last) => last
            .checked_add(1)
            .ok_or(TaskError::IdsExhausted { kind, last }),
    }
}

pub fn next_task_id(tasks: &[Task]) -> Result<TaskId, TaskError> {
    next_id(tasks.iter().map(|t| t.id), "task")
}

pub fn next_subtask_id(subtasks: &[Subtask]) -> Result<SubtaskId, TaskError> {
    next_id(subtasks.iter().map(|s| s.id), "subtask")
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Append a new task. The title is taken as given, empty included.
pub fn add_task(board: &mut Board, title: String) -> Result<Task, TaskError> {
    let task = Task::new(next_task_id(&board.tasks)?, title);
    board.tasks.push(task.clone());
    Ok(task)
}

/// Append a new subtask. `task_id` is not checked against existing tasks.
pub fn add_subtask(board: &mut Board, task_id: TaskId, title: String) -> Result<Subtask, TaskError> {
    let subtask = Subtask::new(next_subtask_id(&board.subtasks)?, task_id, title);
    board.subtasks.push(subtask.clone());
    Ok(subtask)
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Set a task's completion flag. Returns false if no such task exists.
pub fn set_task_completed(board: &mut Board, id: TaskId, completed: bool) -> bool {
    match board.task_mut(id) {
        Some(task) => {
            if completed {
                task.mark_complete();
            } else {
                task.unmark_complete();
            }
            true
        }
        None => false,
    }
}

/// Set a subtask's completion flag. Returns false if no such subtask exists.
pub fn set_subtask_completed(board: &mut Board, id: SubtaskId, completed: bool) -> bool {
    match board.subtask_mut(id) {
        Some(subtask) => {
            if completed {
                subtask.mark_complete();
            } else {
                subtask.unmark_complete();
            }
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Remove a task and every subtask whose `task_id` matches it.
/// Remaining entries keep their relative order.
pub fn remove_task(board: &mut Board, id: TaskId) -> Option<RemovedTask> {
    let idx = board.tasks.iter().position(|t| t.id == id)?;
    let task = board.tasks.remove(idx);

    let (subtasks, kept): (Vec<Subtask>, Vec<Subtask>) = std::mem::take(&mut board.subtasks)
        .into_iter()
        .partition(|s| s.task_id == id);
    board.subtasks = kept;

    Some(RemovedTask { task, subtasks })
}

/// Remove a single subtask.
pub fn remove_subtask(board: &mut Board, id: SubtaskId) -> Option<Subtask> {
    let idx = board.subtasks.iter().position(|s| s.id == id)?;
    Some(board.subtasks.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board() -> Board {
        Board::new(
            vec![Task::new(1, "One"), Task::new(2, "Two"), Task::new(5, "Five")],
            vec![
                Subtask::new(1, 2, "two-a"),
                Subtask::new(2, 1, "one-a"),
                Subtask::new(3, 2, "two-b"),
                Subtask::new(4, 5, "five-a"),
            ],
        )
    }

    #[test]
    fn first_id_is_one() {
        let mut board = Board::default();
        assert_eq!(add_task(&mut board, "a".into()).unwrap().id, 1);
        assert_eq!(add_subtask(&mut board, 1, "b".into()).unwrap().id, 1);
    }

    #[test]
    fn ids_follow_max_not_last_or_len() {
        let mut board = Board::new(
            vec![Task::new(7, "seven"), Task::new(3, "three")],
            vec![],
        );
        assert_eq!(add_task(&mut board, "next".into()).unwrap().id, 8);
    }

    #[test]
    fn ids_are_not_reused_after_deleting_a_middle_task() {
        let mut board = sample_board();
        remove_task(&mut board, 2);
        assert_eq!(add_task(&mut board, "new".into()).unwrap().id, 6);
    }

    #[test]
    fn ids_restart_when_list_empties() {
        let mut board = Board::new(vec![Task::new(4, "only")], vec![]);
        remove_task(&mut board, 4);
        assert_eq!(add_task(&mut board, "again".into()).unwrap().id, 1);
    }

    #[test]
    fn subtask_ids_are_independent_of_task_ids() {
        let mut board = sample_board();
        let sub = add_subtask(&mut board, 1, "x".into()).unwrap();
        assert_eq!(sub.id, 5);
        assert_eq!(sub.task_id, 1);
        let task = add_task(&mut board, "y".into()).unwrap();
        assert_eq!(task.id, 6);
    }

    #[test]
    fn exhausted_ids_error() {
        let mut board = Board::new(vec![Task::new(i64::MAX, "last")], vec![]);
        assert!(matches!(
            add_task(&mut board, "overflow".into()),
            Err(TaskError::IdsExhausted { kind: "task", .. })
        ));
        assert_eq!(board.tasks.len(), 1);
    }

    #[test]
    fn empty_title_and_orphan_subtask_accepted() {
        let mut board = Board::default();
        let task = add_task(&mut board, String::new()).unwrap();
        assert_eq!(task.title, "");
        let orphan = add_subtask(&mut board, 99, "nobody".into()).unwrap();
        assert_eq!(orphan.task_id, 99);
        assert_eq!(board.subtasks.len(), 1);
    }

    #[test]
    fn completion_toggles_and_reports_missing() {
        let mut board = sample_board();
        assert!(set_task_completed(&mut board, 2, true));
        assert!(board.task(2).unwrap().completed);
        assert!(set_task_completed(&mut board, 2, false));
        assert!(!board.task(2).unwrap().completed);

        let before = board.clone();
        assert!(!set_task_completed(&mut board, 42, true));
        assert!(!set_subtask_completed(&mut board, 42, true));
        assert_eq!(board, before);

        assert!(set_subtask_completed(&mut board, 3, true));
        assert!(board.subtask(3).unwrap().completed);
    }

    #[test]
    fn remove_task_cascades_to_its_subtasks_only() {
        let mut board = sample_board();
        let removed = remove_task(&mut board, 2).unwrap();
        assert_eq!(removed.task.id, 2);
        assert_eq!(
            removed.subtasks.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(
            board.tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 5]
        );
        assert_eq!(
            board.subtasks.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![2, 4]
        );
    }

    #[test]
    fn remove_missing_is_none() {
        let mut board = sample_board();
        assert!(remove_task(&mut board, 3).is_none());
        assert!(remove_subtask(&mut board, 9).is_none());
        assert_eq!(board, sample_board());
    }

    #[test]
    fn remove_subtask_keeps_order() {
        let mut board = sample_board();
        assert_eq!(remove_subtask(&mut board, 2).unwrap().title, "one-a");
        assert_eq!(
            board.subtasks.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 3, 4]
        );
        assert_eq!(board.tasks.len(), 3);
    }
}
