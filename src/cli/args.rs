//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Manage discovery trees of tickets stored as JSON
#[derive(Parser, Debug)]
#[command(name = "discotree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Node paths are dotted child indices from the root: `""` is the root,
/// `0` its first child, `0.2` the third child of that child.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a tree file with a single root ticket
    Init {
        /// Tree file to create
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Title of the root ticket
        #[arg(short, long)]
        title: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Append a ticket below a node
    Add {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Title of the new ticket
        #[arg(short, long)]
        title: String,
        /// Path of the parent node (default: root)
        #[arg(short, long, default_value = "")]
        under: String,
    },

    /// Insert a new node above a node, taking its position
    InsertAbove {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Path of the node to wrap
        path: String,
        /// Title of the inserted ticket (default: no ticket)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Remove a node and its subtree
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Path of the node to remove
        path: String,
    },

    /// Print the tree
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Validate tree invariants and print statistics
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Print the global config file location
    Path,
}
