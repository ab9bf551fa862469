use std::path::PathBuf;

use clap::Parser;
use tasklist::cli::commands::{Cli, Commands};
use tasklist::cli::handlers;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let result = handlers::resolve_data_dir(cli.data_dir.as_deref())
                .and_then(|dir| tasklist::tui::run(&dir).map_err(Into::into));
            if let Err(e) = result {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            // Init may create the data directory, so it skips -C resolution
            let dir = match cli.data_dir {
                Some(dir) => Ok(PathBuf::from(dir)),
                None => std::env::current_dir(),
            };
            let result = dir
                .map_err(Into::into)
                .and_then(|dir| handlers::cmd_init(args, &dir));
            if let Err(e) = result {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
