use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Branches, DecisionNode};

/// How a node was reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Root,
    Yes,
    No,
}

/// A node visited by [`PreOrderIterator`].
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub index: Index,
    pub node: &'a DecisionNode,
    pub edge: Edge,
    /// Number of questions above this node; the root has depth 0
    pub depth: usize,
}

/// Arena-based storage for a binary decision tree.
///
/// Nodes live in a generational arena and refer to their children by index,
/// so stale indices are detected instead of dangling.
/// Every node reachable from `root` is owned by exactly one parent.
#[derive(Debug, Clone)]
pub struct DecisionArena {
    arena: Arena<DecisionNode>,
    root: Index,
}

impl DecisionArena {
    /// A tree consisting of a single leaf.
    pub fn new(root_text: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(DecisionNode::leaf(root_text));
        Self { arena, root }
    }

    /// Wraps an arena assembled elsewhere in the crate (the transcript reader).
    pub(crate) fn from_parts(arena: Arena<DecisionNode>, root: Index) -> Self {
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&DecisionNode> {
        self.arena.get(idx)
    }

    /// Like [`get_node`](Self::get_node), but a stale index is an error.
    pub fn node(&self, idx: Index) -> DomainResult<&DecisionNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::InvalidArgument(format!("no node at {:?}", idx)))
    }

    fn node_mut(&mut self, idx: Index) -> DomainResult<&mut DecisionNode> {
        self.arena
            .get_mut(idx)
            .ok_or_else(|| DomainError::InvalidArgument(format!("no node at {:?}", idx)))
    }

    /// Inserts a detached leaf. It becomes part of the tree once attached.
    ///
    /// A detached node is stored until it is attached or passed to
    /// [`discard`](Self::discard); `len` and the iterators never see it.
    #[instrument(level = "trace", skip(self, text))]
    pub fn insert_leaf(&mut self, text: impl Into<String>) -> Index {
        self.arena.insert(DecisionNode::leaf(text))
    }

    /// Inserts a detached question over two detached subtrees.
    ///
    /// Like [`insert_leaf`](Self::insert_leaf), the result must be attached
    /// or discarded.
    #[instrument(level = "trace", skip(self, text))]
    pub fn insert_question(
        &mut self,
        text: impl Into<String>,
        yes: Index,
        no: Index,
    ) -> DomainResult<Index> {
        self.check_free_pair(None, yes, no)?;
        Ok(self.arena.insert(DecisionNode::question(text, yes, no)))
    }

    #[instrument(level = "trace", skip(self, text))]
    pub fn set_text(&mut self, idx: Index, text: impl Into<String>) -> DomainResult<()> {
        self.node_mut(idx)?.set_text(text);
        Ok(())
    }

    /// Replaces the yes-branch of a question; the old subtree is dropped.
    pub fn set_yes(&mut self, idx: Index, child: Index) -> DomainResult<()> {
        self.replace_branch(idx, child, Edge::Yes)
    }

    /// Replaces the no-branch of a question; the old subtree is dropped.
    pub fn set_no(&mut self, idx: Index, child: Index) -> DomainResult<()> {
        self.replace_branch(idx, child, Edge::No)
    }

    /// Turns the leaf at `idx` into a question with the given children.
    ///
    /// This is the only way a leaf gains children, and it always gains two.
    #[instrument(level = "debug", skip(self, text))]
    pub fn attach(
        &mut self,
        idx: Index,
        text: impl Into<String>,
        yes: Index,
        no: Index,
    ) -> DomainResult<()> {
        if !self.node(idx)?.is_leaf() {
            return Err(DomainError::InvalidArgument(format!(
                "node {:?} is already a question",
                idx
            )));
        }
        self.check_free_pair(Some(idx), yes, no)?;
        let node = self.node_mut(idx)?;
        node.set_text(text);
        node.set_branches(Branches { yes, no });
        Ok(())
    }

    /// Frees a detached subtree that will not be attached.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, idx: Index) -> DomainResult<()> {
        self.check_free(None, idx)?;
        self.remove_subtree(idx);
        Ok(())
    }

    fn replace_branch(&mut self, idx: Index, child: Index, edge: Edge) -> DomainResult<()> {
        let branches = self.node(idx)?.branches().ok_or_else(|| {
            DomainError::InvalidArgument(format!(
                "node {:?} is a leaf; attach both branches at once",
                idx
            ))
        })?;
        self.check_free(Some(idx), child)?;

        let old = match edge {
            Edge::No => branches.no,
            _ => branches.yes,
        };
        if let Some(b) = self.node_mut(idx)?.branches_mut() {
            match edge {
                Edge::No => b.no = child,
                _ => b.yes = child,
            }
        }
        self.remove_subtree(old);
        Ok(())
    }

    fn check_free_pair(&self, parent: Option<Index>, yes: Index, no: Index) -> DomainResult<()> {
        if yes == no {
            return Err(DomainError::InvalidArgument(
                "yes and no branches must be different nodes".into(),
            ));
        }
        self.check_free(parent, yes)?;
        self.check_free(parent, no)
    }

    /// A child must be a live node that is neither the root nor owned by another node.
    fn check_free(&self, parent: Option<Index>, child: Index) -> DomainResult<()> {
        self.node(child)?;
        if Some(child) == parent {
            return Err(DomainError::InvalidArgument(
                "a node cannot be its own child".into(),
            ));
        }
        if child == self.root || self.is_owned(child) {
            return Err(DomainError::InvalidArgument(format!(
                "node {:?} already belongs to the tree",
                child
            )));
        }
        Ok(())
    }

    fn is_owned(&self, child: Index) -> bool {
        self.arena.iter().any(|(_, n)| {
            n.branches()
                .is_some_and(|b| b.yes == child || b.no == child)
        })
    }

    fn remove_subtree(&mut self, idx: Index) {
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                trace!("reclaimed node {:?}", current);
                if let Some(b) = node.branches() {
                    stack.push(b.yes);
                    stack.push(b.no);
                }
            }
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `idx`.
    pub fn iter_from(&self, idx: Index) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, idx)
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels, counting the root; a single leaf has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|v| v.depth + 1).max().unwrap_or(0)
    }

    /// The items the tree can guess, in pre-order.
    pub fn leaf_texts(&self) -> Vec<String> {
        self.iter()
            .filter(|v| v.node.is_leaf())
            .map(|v| v.node.text().to_string())
            .collect()
    }

    pub fn question_count(&self) -> usize {
        self.iter().filter(|v| !v.node.is_leaf()).count()
    }
}

pub struct PreOrderIterator<'a> {
    arena: &'a DecisionArena,
    stack: Vec<(Index, Edge, usize)>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a DecisionArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![(start, Edge::Root, 0)],
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, edge, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(index) {
                // no-branch pushed first so the yes-branch is visited first
                if let Some(b) = node.branches() {
                    self.stack.push((b.no, Edge::No, depth + 1));
                    self.stack.push((b.yes, Edge::Yes, depth + 1));
                }
                return Some(Visit {
                    index,
                    node,
                    edge,
                    depth,
                });
            }
        }
        None
    }
}
