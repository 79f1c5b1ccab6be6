//! Trees paired with pending edits

use std::ops::Range;

use tracing::warn;

use super::{Node, Tree};
use crate::base::InputEdit;

/// An old tree plus the edit that turned its text into the next version.
///
/// Several edits fold into one covering edit expressed in the old tree's
/// coordinates, so a reparse sees a single changed region.
#[derive(Debug, Clone)]
pub struct EditedTree {
    tree: Tree,
    edit: InputEdit,
}

/// A subtree outside the edited region and its range in the new text
#[derive(Debug, Clone)]
pub struct ReusableNode {
    pub node: Node,
    pub new_range: Range<usize>,
}

impl EditedTree {
    pub(crate) fn new(tree: Tree, edit: &InputEdit) -> Self {
        let edit = checked(edit, tree.len());
        Self { tree, edit }
    }

    /// Fold a further edit, expressed in the current new text's coordinates
    pub fn edit(&self, next: &InputEdit) -> EditedTree {
        let next = checked(next, self.new_len());
        Self {
            tree: self.tree.clone(),
            edit: self.edit.compose(&next),
        }
    }

    pub fn old_tree(&self) -> &Tree {
        &self.tree
    }

    pub fn input_edit(&self) -> &InputEdit {
        &self.edit
    }

    /// Expected length of the new text
    pub fn new_len(&self) -> usize {
        self.edit.apply_len(self.tree.len())
    }

    /// Maximal subtrees that do not touch the edited region
    pub fn reusable_nodes(&self) -> Vec<ReusableNode> {
        let mut reusable = Vec::new();
        self.walk(&self.tree.root_node(), &mut |node, clear| {
            if !clear {
                return;
            }
            if let Some(new_range) = self.edit.translate(node.byte_range()) {
                reusable.push(ReusableNode { node, new_range });
            }
        });
        reusable
    }

    /// Nodes that overlap or touch the edited region, outermost first
    pub fn invalidated_nodes(&self) -> Vec<Node> {
        let mut invalidated = Vec::new();
        self.walk(&self.tree.root_node(), &mut |node, clear| {
            if !clear {
                invalidated.push(node);
            }
        });
        invalidated
    }

    fn walk(&self, node: &Node, visit: &mut impl FnMut(Node, bool)) {
        let clear = node.parent().is_some() && self.edit.is_clear_of(node.byte_range());
        visit(node.clone(), clear);
        if !clear {
            for child in node.children() {
                self.walk(&child, visit);
            }
        }
    }
}

fn checked(edit: &InputEdit, len: usize) -> InputEdit {
    if edit.is_valid_for(len) {
        return *edit;
    }
    let clamped = edit.clamped(len);
    warn!(?edit, ?clamped, len, "edit does not fit the text; clamping");
    clamped
}
