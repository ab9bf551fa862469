mod init;

pub use init::cmd_init;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, recovery};
use crate::model::task::{Subtask, SubtaskId};
use crate::ops::TaskManager;
use crate::ops::check;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;

    match cli.command {
        None => {
            eprintln!("no subcommand given (try `tl --help`)");
            Ok(())
        }
        Some(cmd) => match cmd {
            // Init is handled in main.rs since the directory may not exist yet
            Commands::Init(args) => cmd_init(args, &data_dir),

            // Read commands
            Commands::List(args) => cmd_list(args, &data_dir, json),
            Commands::Show(args) => cmd_show(args, &data_dir, json),
            Commands::Check => cmd_check(&data_dir, json),
            Commands::Recovery(args) => cmd_recovery(args, &data_dir, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, &data_dir, json),
            Commands::Sub(args) => cmd_sub(args, &data_dir, json),
            Commands::Done(args) => cmd_set_completed(args, true, &data_dir, json),
            Commands::Undo(args) => cmd_set_completed(args, false, &data_dir, json),
            Commands::Rm(args) => cmd_rm(args, &data_dir, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The `-C` directory, or the current directory when none is given
pub fn resolve_data_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn open_manager(data_dir: &Path) -> Result<TaskManager, Box<dyn std::error::Error>> {
    let (_, store_config) = config_io::load_store_config(data_dir)?;
    let manager = TaskManager::open(store_config)?;
    let skipped = manager.load_report().skipped_count();
    if skipped > 0 {
        eprintln!(
            "warning: skipped {} malformed row(s); they will be dropped on the next save (see `tl recovery`)",
            skipped
        );
    }
    Ok(manager)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn kind(sub: bool) -> &'static str {
    if sub { "subtask" } else { "task" }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid timestamp '{}' (expected ISO-8601)", s))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(naive) => Ok(naive.and_utc()),
        None => Err(format!("invalid timestamp '{}'", s).into()),
    }
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let manager = open_manager(data_dir)?;
    let visible = |completed: bool| !args.open || !completed;
    let tasks = manager.list_tasks().iter().filter(|t| visible(t.completed));

    if json {
        let out: Vec<TaskJson> = tasks
            .map(|task| {
                task_to_json(
                    task,
                    manager.subtasks_of(task.id).filter(|s| visible(s.completed)),
                )
            })
            .collect();
        return print_json(&out);
    }

    let mut any = false;
    for task in tasks {
        any = true;
        let subs = manager.subtasks_of(task.id).filter(|s| visible(s.completed));
        for line in format_task_tree(task, subs) {
            println!("{}", line);
        }
    }
    if !any {
        println!("no tasks");
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let manager = open_manager(data_dir)?;
    let Some(task) = manager.get_task(args.id) else {
        eprintln!("no task {}", args.id);
        return Ok(());
    };
    let subtasks: Vec<&Subtask> = manager.subtasks_of(task.id).collect();

    if json {
        return print_json(&task_to_json(task, subtasks.iter().copied()));
    }
    for line in format_task_detail(task, &subtasks) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_check(data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, store_config) = config_io::load_store_config(data_dir)?;
    let result = check::check_files(&store_config)?;

    if json {
        return print_json(&result);
    }
    for line in format_check_result(&result) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_recovery(
    args: RecoveryCmd,
    data_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(data_dir).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = prune.before.as_deref().map(parse_timestamp).transpose()?;
            let removed = recovery::prune_recovery(data_dir, before, prune.all)?;
            if json {
                print_json(&serde_json::json!({ "removed": removed }))
            } else {
                println!("pruned {} entr{}", removed, if removed == 1 { "y" } else { "ies" });
                Ok(())
            }
        }
        None => {
            let since = args.since.as_deref().map(parse_timestamp).transpose()?;
            let entries =
                recovery::read_recovery_entries(data_dir, Some(args.limit.unwrap_or(10)), since);
            if json {
                let out: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                return print_json(&out);
            }
            if entries.is_empty() {
                println!("recovery log is empty");
                return Ok(());
            }
            for entry in &entries {
                println!("{}", entry.to_markdown());
            }
            if let Some(summary) = recovery::recovery_summary(data_dir)
                && summary.entry_count > entries.len()
            {
                let oldest = summary
                    .oldest
                    .map(|t| t.format(" (oldest %Y-%m-%d)").to_string())
                    .unwrap_or_default();
                println!(
                    "showing {} of {} entries{}; use --limit to see more",
                    entries.len(),
                    summary.entry_count,
                    oldest
                );
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = open_manager(data_dir)?;
    let task = manager.add_task(args.title)?;
    if json {
        return print_json(&CreatedJson { id: task.id });
    }
    println!("{}", task.id);
    Ok(())
}

fn cmd_sub(args: SubArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = open_manager(data_dir)?;
    if manager.get_task(args.task_id).is_none() {
        eprintln!("warning: task {} does not exist", args.task_id);
    }
    let sub = manager.add_subtask(args.task_id, args.title)?;
    if json {
        return print_json(&CreatedJson { id: sub.id });
    }
    println!("{}", sub.id);
    Ok(())
}

fn cmd_set_completed(
    args: IdArgs,
    completed: bool,
    data_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = open_manager(data_dir)?;
    let found = match (args.sub, completed) {
        (false, true) => manager.mark_task_complete(args.id)?,
        (false, false) => manager.unmark_task_complete(args.id)?,
        (true, true) => manager.mark_subtask_complete(args.id)?,
        (true, false) => manager.unmark_subtask_complete(args.id)?,
    };
    if json {
        return print_json(&ChangedJson { id: args.id, found });
    }
    if !found {
        eprintln!("no {} {}", kind(args.sub), args.id);
    }
    Ok(())
}

fn cmd_rm(args: IdArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = open_manager(data_dir)?;
    let (found, subtasks): (bool, Vec<SubtaskId>) = if args.sub {
        (manager.delete_subtask(args.id)?.is_some(), Vec::new())
    } else {
        match manager.delete_task(args.id)? {
            Some(removed) => (true, removed.subtasks.iter().map(|s| s.id).collect()),
            None => (false, Vec::new()),
        }
    };

    if json {
        return print_json(&RemovedJson {
            id: args.id,
            found,
            subtasks,
        });
    }
    if !found {
        eprintln!("no {} {}", kind(args.sub), args.id);
    } else if !subtasks.is_empty() {
        println!("deleted task {} and {} subtask(s)", args.id, subtasks.len());
    } else {
        println!("deleted {} {}", kind(args.sub), args.id);
    }
    Ok(())
}
