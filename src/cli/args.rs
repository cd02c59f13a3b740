//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// 20 Questions: a yes/no decision tree that learns from every game it loses
#[derive(Parser, Debug)]
#[command(name = "twentyq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play interactively
    Play {
        /// Transcript to start from (skips the load prompt)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        load: Option<PathBuf>,
        /// Transcript to save to at the end (skips the save prompt)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        save: Option<PathBuf>,
    },

    /// Print a transcript as a tree
    Show {
        /// Transcript file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Validate a transcript and summarize it
    Check {
        /// Transcript file
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
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
