//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::ThemeColor;

/// TaskMaster - lists, tasks and AI breakdowns
#[derive(Parser, Debug)]
#[command(
    name = "tm",
    author,
    version,
    about = "Local list and task manager with AI-assisted task breakdown",
    after_help = "Logs are written to: ~/.local/share/taskmaster/logs/taskmaster.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute (default: show the active list)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show all lists
    Lists,

    /// Manage lists
    List {
        #[command(subcommand)]
        command: ListCommand,
    },

    /// Show the tasks of the active list
    Tasks,

    /// Add a task to the active list
    Add {
        /// Task title
        #[arg(required = true)]
        title: String,
    },

    /// Toggle a task between open and done
    Done {
        /// Task ID (or unique prefix)
        #[arg(required = true)]
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task ID (or unique prefix)
        #[arg(required = true)]
        id: String,
    },

    /// Ask the AI to split a task into subtasks
    Breakdown {
        /// Task ID (or unique prefix)
        #[arg(required = true)]
        id: String,
    },
}

/// List subcommands
#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Create a list and make it active
    Add {
        /// List name
        #[arg(required = true)]
        name: String,

        /// Color tag (random if omitted)
        #[arg(long)]
        color: Option<ThemeColor>,
    },

    /// Delete a list and all of its tasks
    Rm {
        /// List ID (or unique prefix)
        #[arg(required = true)]
        id: String,
    },

    /// Rename a list
    Rename {
        /// List ID (or unique prefix)
        #[arg(required = true)]
        id: String,

        /// New name
        #[arg(required = true)]
        name: String,
    },

    /// Make a list active
    Select {
        /// List ID (or unique prefix)
        #[arg(required = true)]
        id: String,
    },
}
