use clap::{Args, Parser, Subcommand};

use crate::model::task::TaskId;

#[derive(Parser)]
#[command(name = "tl", about = concat!("[x] tasklist v", env!("CARGO_PKG_VERSION"), " - tasks and subtasks in two CSV files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the task files (default: current directory)
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write tasklist.toml and empty task files in the data directory
    Init(InitArgs),
    /// List tasks with their subtasks
    List(ListArgs),
    /// Show one task and its subtasks
    Show(ShowArgs),
    /// Add a task
    Add(AddArgs),
    /// Add a subtask to a task
    Sub(SubArgs),
    /// Mark a task (or subtask with --sub) complete
    Done(IdArgs),
    /// Mark a task (or subtask with --sub) not complete
    Undo(IdArgs),
    /// Delete a task with its subtasks (or a single subtask with --sub)
    Rm(IdArgs),
    /// Validate the task files without changing them
    Check,
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing tasklist.toml
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Hide completed tasks and subtasks
    #[arg(long)]
    pub open: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID
    #[arg(allow_negative_numbers = true)]
    pub id: TaskId,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
}

#[derive(Args)]
pub struct SubArgs {
    /// Task the subtask belongs to
    #[arg(allow_negative_numbers = true)]
    pub task_id: TaskId,
    /// Subtask title
    pub title: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID, or subtask ID with --sub
    #[arg(allow_negative_numbers = true)]
    pub id: i64,
    /// Treat ID as a subtask ID
    #[arg(long)]
    pub sub: bool,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Show entries after this timestamp (ISO-8601)
    #[arg(long)]
    pub since: Option<String>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
