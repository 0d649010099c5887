//! CLI layer: argument parsing, command dispatch and tree file storage

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod store;

pub use args::{Cli, Commands, ConfigCommands};
pub use error::{CliError, CliResult};
