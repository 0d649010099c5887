use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::store::{load_tree, resolve_path, save_tree};
use crate::config::{global_config_path, Settings};
use crate::ticket::Ticket;
use crate::tree::Tree;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::Init { file, title, force }) => _init(&settings, file, title, *force),
        Some(Commands::Add { file, title, under }) => _add(&settings, file, title, under),
        Some(Commands::InsertAbove { file, path, title }) => {
            _insert_above(&settings, file, path, title.as_deref())
        }
        Some(Commands::Remove { file, path }) => _remove(&settings, file, path),
        Some(Commands::Show { file }) => _show(&settings, file),
        Some(Commands::Check { file }) => _check(file),
        Some(Commands::Config { command }) => _config(&settings, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

#[instrument(skip(settings))]
fn _init(settings: &Settings, file: &Path, title: &str, force: bool) -> CliResult<()> {
    if file.exists() && !force {
        return Err(CliError::InvalidArgs(format!(
            "{} already exists, use --force to overwrite",
            file.display()
        )));
    }
    let root = Tree::with_content(Ticket::new(title));
    save_tree(file, &root, settings.pretty)?;
    output::action("Created", &file.display());
    Ok(())
}

#[instrument(skip(settings))]
fn _add(settings: &Settings, file: &Path, title: &str, under: &str) -> CliResult<()> {
    let root = load_tree(file)?;
    let parent = resolve_path(&root, under)?;
    let child = Tree::with_content(Ticket::new(title));
    parent.append_child(&child)?;
    save_tree(file, &root, settings.pretty)?;
    output::action("Added", &format!("{} at depth {}", title, child.depth_from_root()));
    Ok(())
}

#[instrument(skip(settings))]
fn _insert_above(
    settings: &Settings,
    file: &Path,
    path: &str,
    title: Option<&str>,
) -> CliResult<()> {
    let root = load_tree(file)?;
    let node = resolve_path(&root, path)?;
    let above = node.insert_new_tree_above()?;
    if let Some(title) = title {
        above.set_content(Some(Ticket::new(title)));
    }
    // Wrapping the root yields a new root.
    save_tree(file, &above.root(), settings.pretty)?;
    output::action("Inserted", &format!("node {} above {}", above.id(), node.id()));
    Ok(())
}

#[instrument(skip(settings))]
fn _remove(settings: &Settings, file: &Path, path: &str) -> CliResult<()> {
    let root = load_tree(file)?;
    let node = resolve_path(&root, path)?;
    if node.is_root() {
        return Err(CliError::InvalidArgs("cannot remove the root node".to_string()));
    }
    node.remove_from_parent();
    save_tree(file, &root, settings.pretty)?;
    output::action("Removed", &format!("{} nodes", node.size()));
    Ok(())
}

#[instrument(skip(settings))]
fn _show(settings: &Settings, file: &Path) -> CliResult<()> {
    let root = load_tree(file)?;
    output::info(&root.to_tree_string_with(settings.show_ids));
    Ok(())
}

#[instrument]
fn _check(file: &Path) -> CliResult<()> {
    let root = load_tree(file)?;
    output::success(&format!("{} is a valid tree", file.display()));
    output::detail(&format!("nodes:  {}", root.size()));
    output::detail(&format!("height: {}", root.height()));
    output::detail(&format!("leaves: {}", root.leaves().len()));
    Ok(())
}

fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::info("no config directory available"),
        },
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
