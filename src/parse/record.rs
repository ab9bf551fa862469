use crate::model::task::{Subtask, Task};

/// Literal written for `completed = true`
pub const TRUE_LITERAL: &str = "True";

/// Literal written for `completed = false`
pub const FALSE_LITERAL: &str = "False";

/// Header of the tasks file
pub const TASK_HEADER: &[&str] = &["id", "title", "completed"];

/// Header of the subtasks file
pub const SUBTASK_HEADER: &[&str] = &["id", "task_id", "title", "completed"];

/// Why a row could not be turned into an entity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("column {column}: {value:?} is not a valid id")]
    InvalidInteger { column: &'static str, value: String },
}

/// An entity stored as one row of a delimited file
pub trait Record: Sized {
    /// Column names, written as the first row
    const HEADER: &'static [&'static str];

    /// Build an entity from a row that may be malformed
    fn from_fields(fields: &[String]) -> Result<Self, RowError>;

    /// Columns in header order
    fn to_fields(&self) -> Vec<String>;
}

impl Record for Task {
    const HEADER: &'static [&'static str] = TASK_HEADER;

    fn from_fields(fields: &[String]) -> Result<Self, RowError> {
        let [id, title, completed] = fields else {
            return Err(column_count(Self::HEADER, fields));
        };
        Ok(Task {
            id: parse_id("id", id)?,
            title: title.clone(),
            completed: parse_completed(completed),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            format_completed(self.completed).to_string(),
        ]
    }
}

impl Record for Subtask {
    const HEADER: &'static [&'static str] = SUBTASK_HEADER;

    fn from_fields(fields: &[String]) -> Result<Self, RowError> {
        let [id, task_id, title, completed] = fields else {
            return Err(column_count(Self::HEADER, fields));
        };
        Ok(Subtask {
            id: parse_id("id", id)?,
            task_id: parse_id("task_id", task_id)?,
            title: title.clone(),
            completed: parse_completed(completed),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.task_id.to_string(),
            self.title.clone(),
            format_completed(self.completed).to_string(),
        ]
    }
}

fn column_count(header: &[&str], fields: &[String]) -> RowError {
    RowError::ColumnCount {
        expected: header.len(),
        found: fields.len(),
    }
}

/// Parse an id column. Any integer is kept, negative ones included, so a
/// hand-edited id survives the next save. Surrounding whitespace and a
/// leading `+` are tolerated.
pub fn parse_id(column: &'static str, value: &str) -> Result<i64, RowError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| RowError::InvalidInteger {
            column,
            value: value.to_string(),
        })
}

/// Only the exact literal `True` means completed
pub fn parse_completed(value: &str) -> bool {
    value == TRUE_LITERAL
}

pub fn format_completed(completed: bool) -> &'static str {
    if completed {
        TRUE_LITERAL
    } else {
        FALSE_LITERAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn task_from_well_formed_row() {
        let task = Task::from_fields(&row(&["4", "Buy milk", "True"])).unwrap();
        assert_eq!(task, Task { id: 4, title: "Buy milk".into(), completed: true });
    }

    #[test]
    fn completed_is_exact_literal() {
        assert!(parse_completed("True"));
        assert!(!parse_completed("true"));
        assert!(!parse_completed("False"));
        assert!(!parse_completed("TRUE"));
        assert!(!parse_completed(""));
        assert!(!parse_completed(" True"));
    }

    #[test]
    fn wrong_column_count() {
        assert_eq!(
            Task::from_fields(&row(&["1", "a", "b", "True"])),
            Err(RowError::ColumnCount { expected: 3, found: 4 })
        );
        assert_eq!(
            Subtask::from_fields(&row(&["1", "2", "x"])),
            Err(RowError::ColumnCount { expected: 4, found: 3 })
        );
    }

    #[test]
    fn bad_ids() {
        assert!(matches!(
            Task::from_fields(&row(&["one", "a", "True"])),
            Err(RowError::InvalidInteger { column: "id", .. })
        ));
        assert!(matches!(
            Subtask::from_fields(&row(&["1", "x", "a", "True"])),
            Err(RowError::InvalidInteger { column: "task_id", .. })
        ));
        assert!(Task::from_fields(&row(&["", "a", "True"])).is_err());
        assert!(Task::from_fields(&row(&["1.0", "a", "True"])).is_err());
    }

    #[test]
    fn id_whitespace_and_sign_tolerated() {
        assert_eq!(parse_id("id", " 12 "), Ok(12));
        assert_eq!(parse_id("id", "+3"), Ok(3));
    }

    #[test]
    fn negative_and_zero_ids_are_kept() {
        let task = Task::from_fields(&row(&["-2", "a", "True"])).unwrap();
        assert_eq!(task.id, -2);
        let sub = Subtask::from_fields(&row(&["0", "-7", "b", "False"])).unwrap();
        assert_eq!((sub.id, sub.task_id), (0, -7));
        assert_eq!(sub.to_fields(), row(&["0", "-7", "b", "False"]));
    }

    #[test]
    fn subtask_fields_in_header_order() {
        let sub = Subtask { id: 2, task_id: 9, title: "x".into(), completed: false };
        assert_eq!(sub.to_fields(), row(&["2", "9", "x", "False"]));
        assert_eq!(Subtask::from_fields(&sub.to_fields()), Ok(sub));
    }
}
