use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod utils;

use commands::setup::SetupCommands;
use commands::users::{EditArgs, ListArgs, UserArgs};

/// profiles - search and manage the user-profile directory
#[derive(Parser)]
#[command(name = "profiles")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Load configuration from this file instead of the search path
    #[arg(long, global = true, value_name = "PATH", env = "PROFILES_CONFIG")]
    config: Option<PathBuf>,

    /// Store document to read and write (overrides storage.path)
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "memory")]
    store: Option<PathBuf>,

    /// Keep the directory in memory for this run only
    #[arg(long, global = true)]
    memory: bool,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List users, optionally filtered by a search term
    List(ListArgs),

    /// Add a new user
    Add(UserArgs),

    /// Edit an existing user; omitted fields keep their current values
    Edit(EditArgs),

    /// Delete a user after confirmation
    Delete {
        /// Id of the user to delete
        #[arg(value_name = "ID")]
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Forget the stored list; the sample users are restored on next load
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Setup and configuration commands
    Setup {
        #[command(subcommand)]
        command: SetupCommands,
    },
}

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    let result = commands::run(&cli);

    // Handle result
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            // Show context if available
            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}
