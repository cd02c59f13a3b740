use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{DecisionArena, Edge};
use crate::domain::tree::DecisionTree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(arena: &DecisionArena, idx: Index, edge: Edge) -> String {
    let text = arena
        .get_node(idx)
        .map(|n| n.text().to_string())
        .unwrap_or_default();
    match edge {
        Edge::Root => text,
        Edge::Yes => format!("[yes] {}", text),
        Edge::No => format!("[no] {}", text),
    }
}

impl TreeNodeConvert for DecisionArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        // Completed subtrees are collected per depth and folded into their
        // parent when the traversal leaves it, avoiding recursion.
        let visits: Vec<_> = self.iter().collect();
        let mut open: Vec<(Tree<String>, usize)> = Vec::new();

        for visit in visits {
            while open.len() > visit.depth {
                fold_last(&mut open);
            }
            open.push((Tree::new(label(self, visit.index, visit.edge)), visit.depth));
        }
        while open.len() > 1 {
            fold_last(&mut open);
        }
        open.pop()
            .map(|(tree, _)| tree)
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

fn fold_last(open: &mut Vec<(Tree<String>, usize)>) {
    if let Some((child, _)) = open.pop() {
        if let Some((parent, _)) = open.last_mut() {
            parent.push(child);
        }
    }
}

impl TreeNodeConvert for DecisionTree {
    fn to_tree_string(&self) -> Tree<String> {
        self.nodes().to_tree_string()
    }
}
