//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::SessionOptions;
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{DecisionArena, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::TerminalConsole;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, try `twentyq play` or `twentyq --help`".into(),
        ));
    };

    // completions must work even with a broken config
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Play { load, save } => _play(
            &container,
            SessionOptions {
                load: load.clone(),
                save: save.clone(),
            },
        ),
        Commands::Show { file } => _show(&container, file),
        Commands::Check { file } => _check(&container, file),
        Commands::Config { command } => _config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn read_tree(container: &ServiceContainer, file: &Path) -> CliResult<DecisionArena> {
    let content = container
        .fs
        .read_to_string(file)
        .with_path_context("read tree file", file)?;
    Ok(crate::domain::read_transcript(content.as_bytes())?)
}

#[instrument(skip(container))]
fn _play(container: &ServiceContainer, options: SessionOptions) -> CliResult<()> {
    let mut service = container.game_service();
    let mut console = TerminalConsole::stdio();
    let stats = service.run(&mut console, &options)?;
    debug!("session finished: {:?}", stats);
    Ok(())
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = read_tree(container, file)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn _check(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = read_tree(container, file)?;
    let questions = tree.question_count();
    output::success(&format!("{}: valid transcript", file.display()));
    output::detail(&format!("questions: {}", questions));
    output::detail(&format!("items:     {}", tree.len() - questions));
    output::detail(&format!("depth:     {}", tree.depth()));
    Ok(())
}

#[instrument(skip(container))]
fn _config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("# effective settings");
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let state = if container.fs.exists(&path) {
                    "exists"
                } else {
                    "not found"
                };
                output::action("global", &format!("{} ({})", path.display(), state));
            }
            None => output::action("global", "no config directory on this system"),
        },
    }
    Ok(())
}
