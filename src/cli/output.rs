use serde::Serialize;

use crate::model::task::{Subtask, Task};
use crate::ops::check::{CheckError, CheckResult, CheckWarning};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub subtasks: Vec<SubtaskJson>,
}

#[derive(Serialize)]
pub struct SubtaskJson {
    pub id: i64,
    pub task_id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct CreatedJson {
    pub id: i64,
}

#[derive(Serialize)]
pub struct ChangedJson {
    pub id: i64,
    pub found: bool,
}

#[derive(Serialize)]
pub struct RemovedJson {
    pub id: i64,
    pub found: bool,
    /// Subtasks removed along with a task
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn subtask_to_json(sub: &Subtask) -> SubtaskJson {
    SubtaskJson {
        id: sub.id,
        task_id: sub.task_id,
        title: sub.title.clone(),
        completed: sub.completed,
    }
}

pub fn task_to_json<'a>(task: &Task, subtasks: impl Iterator<Item = &'a Subtask>) -> TaskJson {
    TaskJson {
        id: task.id,
        title: task.title.clone(),
        completed: task.completed,
        subtasks: subtasks.map(subtask_to_json).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn check_char(completed: bool) -> char {
    if completed { 'x' } else { ' ' }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    format!("[{}] {} {}", check_char(task.completed), task.id, task.title)
}

pub fn format_subtask_line(sub: &Subtask) -> String {
    format!("[{}] {}.{} {}", check_char(sub.completed), sub.task_id, sub.id, sub.title)
}

/// Format a task with its subtasks, indented
pub fn format_task_tree<'a>(task: &Task, subtasks: impl Iterator<Item = &'a Subtask>) -> Vec<String> {
    let mut lines = vec![format_task_line(task)];
    for sub in subtasks {
        lines.push(format!("  {}", format_subtask_line(sub)));
    }
    lines
}

/// Format detailed task view
pub fn format_task_detail(task: &Task, subtasks: &[&Subtask]) -> Vec<String> {
    let mut lines = vec![format_task_line(task)];
    let done = subtasks.iter().filter(|s| s.completed).count();
    if subtasks.is_empty() {
        lines.push("  (no subtasks)".to_string());
    } else {
        lines.push(format!("  subtasks: {}/{} done", done, subtasks.len()));
        for sub in subtasks {
            lines.push(format!("  {}", format_subtask_line(sub)));
        }
    }
    lines
}

pub fn format_check_error(err: &CheckError) -> String {
    match err {
        CheckError::MissingFile { path } => format!("{} does not exist", path),
        CheckError::DuplicateTaskId { id, count } => {
            format!("task id {} is used {} times", id, count)
        }
        CheckError::DuplicateSubtaskId { id, count } => {
            format!("subtask id {} is used {} times", id, count)
        }
    }
}

pub fn format_check_warning(warn: &CheckWarning) -> String {
    match warn {
        CheckWarning::MalformedRow { file, line, reason } => {
            format!("{}:{} will be dropped on next save: {}", file, line, reason)
        }
        CheckWarning::OrphanSubtask {
            subtask_id,
            task_id,
        } => format!("subtask {} points at missing task {}", subtask_id, task_id),
    }
}

/// Human-readable report for `tl check`
pub fn format_check_result(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();
    if !result.errors.is_empty() {
        lines.push("Errors:".to_string());
        for err in &result.errors {
            lines.push(format!("  {}", format_check_error(err)));
        }
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            lines.push(String::new());
        }
        lines.push("Warnings:".to_string());
        for warn in &result.warnings {
            lines.push(format!("  {}", format_check_warning(warn)));
        }
    }
    if result.valid {
        lines.push("✓ task files are valid".to_string());
    } else {
        lines.push("✗ task files have errors".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn task_line_shows_checkbox_and_id() {
        let mut task = Task::new(3, "Buy milk");
        assert_eq!(format_task_line(&task), "[ ] 3 Buy milk");
        task.mark_complete();
        assert_eq!(format_task_line(&task), "[x] 3 Buy milk");
    }

    #[test]
    fn tree_indents_subtasks() {
        let task = Task::new(1, "Trip");
        let mut sub = Subtask::new(4, 1, "Passport");
        sub.mark_complete();
        let lines = format_task_tree(&task, [&sub].into_iter());
        assert_eq!(lines, vec!["[ ] 1 Trip", "  [x] 1.4 Passport"]);
    }

    #[test]
    fn detail_counts_done_subtasks() {
        let task = Task::new(1, "Trip");
        let a = Subtask::new(1, 1, "a");
        let mut b = Subtask::new(2, 1, "b");
        b.mark_complete();
        let lines = format_task_detail(&task, &[&a, &b]);
        assert_eq!(lines[1], "  subtasks: 1/2 done");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn task_json_nests_subtasks() {
        let task = Task::new(2, "a, \"b\"");
        let sub = Subtask::new(1, 2, "c");
        let json = serde_json::to_value(task_to_json(&task, [&sub].into_iter())).unwrap();
        assert_eq!(json["title"], "a, \"b\"");
        assert_eq!(json["subtasks"][0]["task_id"], 2);
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn check_report_lists_errors_then_warnings() {
        let result = CheckResult {
            valid: false,
            errors: vec![CheckError::DuplicateTaskId { id: 1, count: 2 }],
            warnings: vec![CheckWarning::OrphanSubtask {
                subtask_id: 3,
                task_id: 9,
            }],
        };
        let lines = format_check_result(&result);
        assert_eq!(lines[0], "Errors:");
        assert!(lines[1].contains("task id 1 is used 2 times"));
        assert_eq!(lines[3], "Warnings:");
        assert!(lines[4].contains("missing task 9"));
        assert_eq!(lines.last().unwrap(), "✗ task files have errors");
    }
}
