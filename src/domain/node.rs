use generational_arena::Index;
use std::fmt;

/// The two children of a question node.
///
/// `yes` is followed when the player answers yes, `no` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branches {
    pub yes: Index,
    pub no: Index,
}

/// A node of the decision tree.
///
/// A node without branches is a leaf and its text is a guess ("computer").
/// A node with branches is a question ("Does it have wheels?").
/// Both children are stored together, so a node can never have exactly one.
#[derive(Debug, Clone)]
pub struct DecisionNode {
    text: String,
    branches: Option<Branches>,
}

impl DecisionNode {
    pub fn leaf(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            branches: None,
        }
    }

    pub fn question(text: impl Into<String>, yes: Index, no: Index) -> Self {
        Self {
            text: text.into(),
            branches: Some(Branches { yes, no }),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_leaf(&self) -> bool {
        self.branches.is_none()
    }

    pub fn branches(&self) -> Option<Branches> {
        self.branches
    }

    pub fn yes(&self) -> Option<Index> {
        self.branches.map(|b| b.yes)
    }

    pub fn no(&self) -> Option<Index> {
        self.branches.map(|b| b.no)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    // Child mutation goes through `DecisionArena`, which checks the indices.
    pub(crate) fn set_branches(&mut self, branches: Branches) {
        self.branches = Some(branches);
    }

    pub(crate) fn branches_mut(&mut self) -> Option<&mut Branches> {
        self.branches.as_mut()
    }
}

impl fmt::Display for DecisionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
