use std::path::Path;

use crate::io::record_store::{RecordStore, StoreError};
use crate::io::recovery::{log_deletion, log_skipped_rows};
use crate::model::board::Board;
use crate::model::config::StoreConfig;
use crate::model::task::{Subtask, SubtaskId, Task, TaskId};
use crate::ops::task_ops::{self, RemovedTask, TaskError};
use crate::parse::{SUBTASK_HEADER, SkippedRow, TASK_HEADER, serialize_records};

/// What the last load had to drop
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub tasks_skipped: Vec<SkippedRow>,
    pub subtasks_skipped: Vec<SkippedRow>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.tasks_skipped.len() + self.subtasks_skipped.len()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped_count() == 0
    }
}

/// Owns the checklist state and keeps the record files in step with it.
///
/// Every mutating call changes memory first, then rewrites the affected
/// file(s) before returning. Calls naming an unknown id do nothing and
/// report `false` / `None`.
#[derive(Debug)]
pub struct TaskManager {
    config: StoreConfig,
    store: RecordStore,
    board: Board,
    report: LoadReport,
    /// Skipped rows still present on disk, logged when a save drops them
    tasks_skips_pending: bool,
    subtasks_skips_pending: bool,
}

impl TaskManager {
    /// Create missing record files, then load both.
    pub fn open(config: StoreConfig) -> Result<Self, TaskError> {
        let store = RecordStore::new(&config.data_dir);
        let mut manager = TaskManager {
            config,
            store,
            board: Board::default(),
            report: LoadReport::default(),
            tasks_skips_pending: false,
            subtasks_skips_pending: false,
        };
        manager.reload()?;
        Ok(manager)
    }

    /// Re-read both files, replacing the in-memory state.
    pub fn reload(&mut self) -> Result<&LoadReport, TaskError> {
        self.store
            .ensure_initialized(&self.config.tasks_path, TASK_HEADER)?;
        self.store
            .ensure_initialized(&self.config.subtasks_path, SUBTASK_HEADER)?;

        let tasks = self.store.load::<Task>(&self.config.tasks_path)?;
        let subtasks = self.store.load::<Subtask>(&self.config.subtasks_path)?;

        self.board = Board::new(tasks.records, subtasks.records);
        self.tasks_skips_pending = !tasks.skipped.is_empty();
        self.subtasks_skips_pending = !subtasks.skipped.is_empty();
        self.report = LoadReport {
            tasks_skipped: tasks.skipped,
            subtasks_skipped: subtasks.skipped,
        };
        Ok(&self.report)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn list_tasks(&self) -> &[Task] {
        &self.board.tasks
    }

    pub fn list_subtasks(&self) -> &[Subtask] {
        &self.board.subtasks
    }

    pub fn get_task(&self, id: TaskId) -> Option<&Task> {
        self.board.task(id)
    }

    pub fn get_subtask(&self, id: SubtaskId) -> Option<&Subtask> {
        self.board.subtask(id)
    }

    pub fn subtasks_of(&self, task_id: TaskId) -> impl Iterator<Item = &Subtask> {
        self.board.subtasks_of(task_id)
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub fn add_task(&mut self, title: impl Into<String>) -> Result<Task, TaskError> {
        let task = task_ops::add_task(&mut self.board, title.into())?;
        self.save_tasks()?;
        Ok(task)
    }

    pub fn add_subtask(
        &mut self,
        task_id: TaskId,
        title: impl Into<String>,
    ) -> Result<Subtask, TaskError> {
        let subtask = task_ops::add_subtask(&mut self.board, task_id, title.into())?;
        self.save_subtasks()?;
        Ok(subtask)
    }

    pub fn mark_task_complete(&mut self, id: TaskId) -> Result<bool, TaskError> {
        self.set_task_completed(id, true)
    }

    pub fn unmark_task_complete(&mut self, id: TaskId) -> Result<bool, TaskError> {
        self.set_task_completed(id, false)
    }

    pub fn mark_subtask_complete(&mut self, id: SubtaskId) -> Result<bool, TaskError> {
        self.set_subtask_completed(id, true)
    }

    pub fn unmark_subtask_complete(&mut self, id: SubtaskId) -> Result<bool, TaskError> {
        self.set_subtask_completed(id, false)
    }

    /// Flip a task's flag. Returns the new value, or `None` if it does not exist.
    pub fn toggle_task(&mut self, id: TaskId) -> Result<Option<bool>, TaskError> {
        let Some(completed) = self.get_task(id).map(|t| !t.completed) else {
            return Ok(None);
        };
        self.set_task_completed(id, completed)?;
        Ok(Some(completed))
    }

    /// Flip a subtask's flag. Returns the new value, or `None` if it does not exist.
    pub fn toggle_subtask(&mut self, id: SubtaskId) -> Result<Option<bool>, TaskError> {
        let Some(completed) = self.get_subtask(id).map(|s| !s.completed) else {
            return Ok(None);
        };
        self.set_subtask_completed(id, completed)?;
        Ok(Some(completed))
    }

    /// Delete a task and its subtasks, rewriting both files.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Option<RemovedTask>, TaskError> {
        let Some(removed) = task_ops::remove_task(&mut self.board, id) else {
            return Ok(None);
        };
        self.save_tasks()?;
        self.save_subtasks()?;

        let mut rows = serialize_records(std::slice::from_ref(&removed.task));
        if !removed.subtasks.is_empty() {
            rows.push_str(&serialize_records(&removed.subtasks));
        }
        log_deletion(
            self.data_dir(),
            format!(
                "task {} deleted with {} subtask(s)",
                id,
                removed.subtasks.len()
            ),
            &rows,
        );
        Ok(Some(removed))
    }

    /// Delete one subtask, rewriting only the subtasks file.
    pub fn delete_subtask(&mut self, id: SubtaskId) -> Result<Option<Subtask>, TaskError> {
        let Some(removed) = task_ops::remove_subtask(&mut self.board, id) else {
            return Ok(None);
        };
        self.save_subtasks()?;
        log_deletion(
            self.data_dir(),
            format!("subtask {} deleted", id),
            &serialize_records(std::slice::from_ref(&removed)),
        );
        Ok(Some(removed))
    }

    fn set_task_completed(&mut self, id: TaskId, completed: bool) -> Result<bool, TaskError> {
        if !task_ops::set_task_completed(&mut self.board, id, completed) {
            return Ok(false);
        }
        self.save_tasks()?;
        Ok(true)
    }

    fn set_subtask_completed(&mut self, id: SubtaskId, completed: bool) -> Result<bool, TaskError> {
        if !task_ops::set_subtask_completed(&mut self.board, id, completed) {
            return Ok(false);
        }
        self.save_subtasks()?;
        Ok(true)
    }

    fn save_tasks(&mut self) -> Result<(), StoreError> {
        self.store.save(&self.config.tasks_path, &self.board.tasks)?;
        if self.tasks_skips_pending {
            log_skipped_rows(
                &self.config.data_dir,
                &self.config.tasks_path,
                &self.report.tasks_skipped,
            );
            self.tasks_skips_pending = false;
        }
        Ok(())
    }

    fn save_subtasks(&mut self) -> Result<(), StoreError> {
        self.store
            .save(&self.config.subtasks_path, &self.board.subtasks)?;
        if self.subtasks_skips_pending {
            log_skipped_rows(
                &self.config.data_dir,
                &self.config.subtasks_path,
                &self.report.subtasks_skipped,
            );
            self.subtasks_skips_pending = false;
        }
        Ok(())
    }
}
