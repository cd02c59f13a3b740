//! Game session service
//!
//! Runs the interactive session around the decision tree: optional load,
//! rounds until the player stops, statistics, optional save.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{Console, DecisionTree, DomainError, GameStats};
use crate::infrastructure::traits::FileSystem;

pub const WELCOME_MESSAGE: &str = "Welcome to the game of 20 Questions!";
pub const BANNER_MESSAGE: &str = "Think of an item, and I will guess it.";
pub const LOAD_MESSAGE: &str = "Shall I recall our previous games?";
pub const SAVE_MESSAGE: &str = "Shall I remember these games?";
pub const FILENAME_MESSAGE: &str = "What is the file name?";
pub const PLAY_AGAIN_MESSAGE: &str = "Challenge me again?";

/// Files named on the command line; they take precedence over settings.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub load: Option<PathBuf>,
    pub save: Option<PathBuf>,
}

/// Service owning the tree for one interactive session.
pub struct GameService {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    tree: DecisionTree,
}

impl GameService {
    /// Create a game service with a fresh single-guess tree.
    pub fn new(settings: Arc<Settings>, fs: Arc<dyn FileSystem>) -> Self {
        let tree = DecisionTree::with_guess(settings.initial_guess.clone());
        Self { settings, fs, tree }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Replace the tree with the transcript at `path`.
    ///
    /// The file is read completely before parsing; on any error the
    /// current tree is kept.
    #[instrument(level = "debug", skip(self))]
    pub fn load_file(&mut self, path: &Path) -> ApplicationResult<()> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree file", path)?;
        self.tree.load(content.as_bytes())?;
        info!("loaded tree from {}", path.display());
        Ok(())
    }

    /// Write the tree as a transcript to `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn save_file(&self, path: &Path) -> ApplicationResult<()> {
        let mut buf = Vec::new();
        self.tree.save(&mut buf)?;
        let content = String::from_utf8(buf).map_err(|e| ApplicationError::OperationFailed {
            context: "encode transcript".to_string(),
            source: Box::new(e),
        })?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write tree file", path)?;
        info!("saved tree to {}", path.display());
        Ok(())
    }

    /// Run a full session and return the statistics of its rounds.
    ///
    /// Failed loads and saves are reported on the console and the session
    /// goes on with the tree it had; console failures end the session.
    #[instrument(level = "debug", skip(self, console))]
    pub fn run(
        &mut self,
        console: &mut dyn Console,
        options: &SessionOptions,
    ) -> ApplicationResult<GameStats> {
        console.print_line(WELCOME_MESSAGE).map_err(console_err)?;
        self.offer_load(console, options)?;

        console.print_blank_line().map_err(console_err)?;
        console.print_line(BANNER_MESSAGE).map_err(console_err)?;
        loop {
            console.print_blank_line().map_err(console_err)?;
            self.tree.play(console)?;
            console.print(PLAY_AGAIN_MESSAGE).map_err(console_err)?;
            if !console.read_yes_no().map_err(console_err)? {
                break;
            }
        }

        let stats = self.tree.stats();
        console.print_blank_line().map_err(console_err)?;
        console
            .print_line(&format!("Games played: {}", stats.played))
            .map_err(console_err)?;
        console
            .print_line(&format!("I have won: {}", stats.won))
            .map_err(console_err)?;

        self.offer_save(console, options)?;
        Ok(stats)
    }

    fn offer_load(
        &mut self,
        console: &mut dyn Console,
        options: &SessionOptions,
    ) -> ApplicationResult<()> {
        let path = match (&options.load, &self.settings.tree_file) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(path)) if self.fs.exists(path) => Some(path.clone()),
            _ => {
                console.print(LOAD_MESSAGE).map_err(console_err)?;
                if console.read_yes_no().map_err(console_err)? {
                    Some(self.ask_file_name(console)?)
                } else {
                    None
                }
            }
        };
        if let Some(path) = path {
            if let Err(e) = self.load_file(&path) {
                warn!("load failed: {}", e);
                console
                    .print_line(&format!("Error: {}", e))
                    .map_err(console_err)?;
            }
        }
        Ok(())
    }

    fn offer_save(
        &self,
        console: &mut dyn Console,
        options: &SessionOptions,
    ) -> ApplicationResult<()> {
        let path = match (&options.save, &self.settings.tree_file) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(path)) if self.settings.auto_save => Some(path.clone()),
            _ => {
                console.print(SAVE_MESSAGE).map_err(console_err)?;
                if console.read_yes_no().map_err(console_err)? {
                    Some(self.ask_file_name(console)?)
                } else {
                    None
                }
            }
        };
        if let Some(path) = path {
            if let Err(e) = self.save_file(&path) {
                warn!("save failed: {}", e);
                console
                    .print_line(&format!("Error: {}", e))
                    .map_err(console_err)?;
            }
        }
        Ok(())
    }

    /// An empty answer picks the configured tree file, if there is one.
    fn ask_file_name(&self, console: &mut dyn Console) -> ApplicationResult<PathBuf> {
        loop {
            let prompt = match &self.settings.tree_file {
                Some(default) => format!("{} [{}]", FILENAME_MESSAGE, default.display()),
                None => FILENAME_MESSAGE.to_string(),
            };
            console.print(&prompt).map_err(console_err)?;
            let answer = console.read_line().map_err(console_err)?;
            let answer = answer.trim();
            debug!("file name answer: {:?}", answer);
            match (answer.is_empty(), &self.settings.tree_file) {
                (false, _) => return Ok(PathBuf::from(crate::config::expand_path(answer))),
                (true, Some(default)) => return Ok(default.clone()),
                (true, None) => continue,
            }
        }
    }
}

fn console_err(e: std::io::Error) -> ApplicationError {
    DomainError::Console(e).into()
}
