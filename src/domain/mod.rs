//! Domain layer: the decision tree and its transcript format
//!
//! This layer is independent of external concerns (no files, no CLI, no config loading).
//! User interaction goes through the [`Console`] trait.

pub mod arena;
pub mod console;
pub mod display;
pub mod error;
pub mod node;
pub mod transcript;
pub mod tree;

pub use arena::{DecisionArena, Edge, PreOrderIterator, Visit};
pub use console::{parse_yes_no, Console};
pub use display::TreeNodeConvert;
pub use error::{DomainError, DomainResult};
pub use node::{Branches, DecisionNode};
pub use transcript::{read_transcript, to_transcript, write_transcript};
pub use tree::{DecisionTree, GameStats, Round, DEFAULT_GUESS};
