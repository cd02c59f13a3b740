//! twentyq: the 20 Questions game as a self-learning binary decision tree.
//!
//! Layers, inner to outer:
//! - [`domain`]: the tree, play/learn, and the `Q:`/`A:` transcript format
//! - [`application`]: the interactive game session and file handling
//! - [`infrastructure`]: real filesystem and terminal console, service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
