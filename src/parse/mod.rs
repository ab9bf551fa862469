pub mod csv;
pub mod record;
pub mod record_parser;
pub mod record_serializer;

pub use record::{Record, RowError, SUBTASK_HEADER, TASK_HEADER};
pub use record_parser::{SkippedRow, parse_records};
pub use record_serializer::{serialize_header, serialize_records};
