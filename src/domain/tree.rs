use std::io::{BufRead, Write};

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::domain::arena::DecisionArena;
use crate::domain::console::Console;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::transcript::{read_transcript, write_transcript};

/// The guess a fresh tree starts with.
pub const DEFAULT_GUESS: &str = "computer";

/// Result of one round of play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Round {
    /// The guess at the leaf was confirmed.
    Won { item: String },
    /// The guess was wrong and the tree learned a new question.
    Learned { item: String, question: String },
}

/// Games played and won since the tree was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub played: u32,
    pub won: u32,
}

/// A self-learning 20 Questions tree.
///
/// The cursor of each operation is local to that operation, so every
/// completed `play`, `save` or `load` leaves the tree positioned at its root.
/// `play` and `load` borrow the tree mutably, which rules out overlapping operations.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: DecisionArena,
    stats: GameStats,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self::with_guess(DEFAULT_GUESS)
    }

    /// A single-leaf tree guessing `guess`.
    pub fn with_guess(guess: impl Into<String>) -> Self {
        Self {
            nodes: DecisionArena::new(guess),
            stats: GameStats::default(),
        }
    }

    pub fn nodes(&self) -> &DecisionArena {
        &self.nodes
    }

    pub fn root(&self) -> Index {
        self.nodes.root()
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn total_games(&self) -> u32 {
        self.stats.played
    }

    pub fn games_won(&self) -> u32 {
        self.stats.won
    }

    /// Plays one round: asks questions down to a leaf, guesses, and learns on a miss.
    #[instrument(level = "debug", skip(self, console))]
    pub fn play(&mut self, console: &mut dyn Console) -> DomainResult<Round> {
        let mut cursor = self.nodes.root();

        loop {
            let node = self.nodes.node(cursor)?;
            let Some(branches) = node.branches() else {
                break;
            };
            console.print(node.text()).map_err(DomainError::Console)?;
            let yes = console.read_yes_no().map_err(DomainError::Console)?;
            debug!("'{}' -> {}", node.text(), if yes { "yes" } else { "no" });
            cursor = if yes { branches.yes } else { branches.no };
        }

        let guess = self.nodes.node(cursor)?.text().to_string();
        console
            .print(&format!("Would your object happen to be {}?", guess))
            .map_err(DomainError::Console)?;
        let round = if console.read_yes_no().map_err(DomainError::Console)? {
            console.print_line("I win!").map_err(DomainError::Console)?;
            self.stats.won += 1;
            Round::Won { item: guess }
        } else {
            self.learn(console, cursor, guess)?
        };

        self.stats.played += 1;
        info!(
            "round finished: {:?} (played {}, won {})",
            round, self.stats.played, self.stats.won
        );
        Ok(round)
    }

    fn learn(
        &mut self,
        console: &mut dyn Console,
        leaf: Index,
        guess: String,
    ) -> DomainResult<Round> {
        let mut ask = |prompt: &str| -> DomainResult<String> {
            console.print(prompt).map_err(DomainError::Console)?;
            console.read_line().map_err(DomainError::Console)
        };
        let item = ask("I lose. What is your object?")?;
        let question = ask(&format!(
            "Type a yes/no question to distinguish your item from {}:",
            guess
        ))?;
        console
            .print("And what is the answer for your object?")
            .map_err(DomainError::Console)?;
        let item_is_yes = console.read_yes_no().map_err(DomainError::Console)?;

        let new_leaf = self.nodes.insert_leaf(item.clone());
        let old_leaf = self.nodes.insert_leaf(guess);
        let (yes, no) = if item_is_yes {
            (new_leaf, old_leaf)
        } else {
            (old_leaf, new_leaf)
        };
        self.nodes.attach(leaf, question.clone(), yes, no)?;

        Ok(Round::Learned { item, question })
    }

    /// Writes the whole tree as a transcript.
    pub fn save<W: Write>(&self, out: &mut W) -> DomainResult<()> {
        self.save_from(self.nodes.root(), out)
    }

    /// Writes the subtree rooted at `from` as a transcript.
    #[instrument(level = "debug", skip(self, out))]
    pub fn save_from<W: Write>(&self, from: Index, out: &mut W) -> DomainResult<()> {
        write_transcript(&self.nodes, from, out)
    }

    /// Replaces the tree with one read from a transcript.
    ///
    /// The new tree is parsed completely before it is swapped in; on any
    /// error the current tree is left as it was. Statistics are kept.
    #[instrument(level = "debug", skip(self, input))]
    pub fn load<R: BufRead>(&mut self, input: R) -> DomainResult<()> {
        let nodes = read_transcript(input)?;
        info!(
            "loaded tree with {} question(s) and {} item(s)",
            nodes.question_count(),
            nodes.len() - nodes.question_count()
        );
        self.nodes = nodes;
        Ok(())
    }
}
