use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::io::record_store::StoreError;
use crate::model::board::Board;
use crate::model::config::StoreConfig;
use crate::model::task::{Subtask, Task};
use crate::parse::{Record, SkippedRow, parse_records};

/// Structured result from `tl check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (something that should be fixed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// A record file does not exist
    #[serde(rename = "missing_file")]
    MissingFile { path: String },
    /// Two tasks share an id
    #[serde(rename = "duplicate_task_id")]
    DuplicateTaskId { id: i64, count: usize },
    /// Two subtasks share an id
    #[serde(rename = "duplicate_subtask_id")]
    DuplicateSubtaskId { id: i64, count: usize },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// A row that the next save will drop
    #[serde(rename = "malformed_row")]
    MalformedRow {
        file: String,
        line: usize,
        reason: String,
    },
    /// A subtask whose task does not exist. It is never shown and never
    /// removed by a cascade delete.
    #[serde(rename = "orphan_subtask")]
    OrphanSubtask { subtask_id: i64, task_id: i64 },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate the record files named by `config`.
///
/// Read-only: nothing is written, not even the recovery log.
pub fn check_files(config: &StoreConfig) -> Result<CheckResult, StoreError> {
    let mut result = CheckResult::default();

    let tasks = read_file::<Task>(&config.tasks_path, &mut result)?;
    let subtasks = read_file::<Subtask>(&config.subtasks_path, &mut result)?;

    check_board(&Board::new(tasks, subtasks), &mut result);

    result.valid = result.errors.is_empty();
    Ok(result)
}

fn read_file<T: Record>(path: &Path, result: &mut CheckResult) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        result.errors.push(CheckError::MissingFile {
            path: path.display().to_string(),
        });
        return Ok(Vec::new());
    }
    let source = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (records, skipped) = parse_records::<T>(&source);
    push_skipped(path, &skipped, result);
    Ok(records)
}

fn push_skipped(path: &Path, skipped: &[SkippedRow], result: &mut CheckResult) {
    for row in skipped {
        result.warnings.push(CheckWarning::MalformedRow {
            file: path.display().to_string(),
            line: row.line,
            reason: row.reason.to_string(),
        });
    }
}

/// Checks that only need the parsed entities
pub fn check_board(board: &Board, result: &mut CheckResult) {
    for (id, count) in duplicates(board.tasks.iter().map(|t| t.id)) {
        result.errors.push(CheckError::DuplicateTaskId { id, count });
    }
    for (id, count) in duplicates(board.subtasks.iter().map(|s| s.id)) {
        result.errors.push(CheckError::DuplicateSubtaskId { id, count });
    }
    for sub in board.orphan_subtasks() {
        result.warnings.push(CheckWarning::OrphanSubtask {
            subtask_id: sub.id,
            task_id: sub.task_id,
        });
    }
}

fn duplicates(ids: impl Iterator<Item = i64>) -> Vec<(i64, usize)> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for id in ids {
        *counts.entry(id).or_default() += 1;
    }
    counts.into_iter().filter(|(_, n)| *n > 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_files(dir: &Path, tasks: &str, subtasks: &str) -> StoreConfig {
        fs::write(dir.join("tasks.csv"), tasks).unwrap();
        fs::write(dir.join("subtasks.csv"), subtasks).unwrap();
        StoreConfig::in_dir(dir)
    }

    #[test]
    fn clean_files_are_valid() {
        let tmp = TempDir::new().unwrap();
        let config = write_files(
            tmp.path(),
            "id,title,completed\n1,a,False\n",
            "id,task_id,title,completed\n1,1,b,True\n",
        );
        let result = check_files(&config).unwrap();
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn duplicates_are_errors() {
        let tmp = TempDir::new().unwrap();
        let config = write_files(
            tmp.path(),
            "id,title,completed\n1,a,False\n1,b,False\n2,c,False\n",
            "id,task_id,title,completed\n3,1,x,False\n3,2,y,False\n3,2,z,False\n",
        );
        let result = check_files(&config).unwrap();
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                CheckError::DuplicateTaskId { id: 1, count: 2 },
                CheckError::DuplicateSubtaskId { id: 3, count: 3 },
            ]
        );
    }

    #[test]
    fn orphans_and_malformed_rows_are_warnings() {
        let tmp = TempDir::new().unwrap();
        let config = write_files(
            tmp.path(),
            "id,title,completed\n1,a,False\nbad,row,True\n",
            "id,task_id,title,completed\n1,7,lost,False\n",
        );
        let result = check_files(&config).unwrap();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(matches!(
            &result.warnings[0],
            CheckWarning::MalformedRow { line: 3, .. }
        ));
        assert_eq!(
            result.warnings[1],
            CheckWarning::OrphanSubtask { subtask_id: 1, task_id: 7 }
        );
    }

    #[test]
    fn check_does_not_create_files() {
        let tmp = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(tmp.path());
        let result = check_files(&config).unwrap();
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert!(!config.tasks_path.exists());
    }

    #[test]
    fn json_shape() {
        let warning = CheckWarning::OrphanSubtask { subtask_id: 2, task_id: 9 };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["type"], "orphan_subtask");
        assert_eq!(json["task_id"], 9);
    }
}
