//! Nested operation trees.
//!
//! Decompositions and syntheses produce an [`OperationTree`]: instructions at
//! the leaves, ordered sequences of subtrees at the inner nodes. Trees are
//! finite and acyclic by construction since each node owns its children.

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;

/// A nested sequence of instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperationTree {
    /// A single instruction.
    Leaf(Instruction),
    /// An ordered sequence of subtrees.
    Node(Vec<OperationTree>),
}

impl OperationTree {
    /// An inner node over `children`.
    pub fn node(children: impl IntoIterator<Item = OperationTree>) -> Self {
        OperationTree::Node(children.into_iter().collect())
    }

    /// The immediate children of this tree, one level deep.
    ///
    /// A leaf is its own only child. The returned iterator is `Clone`, so it
    /// can be restarted.
    pub fn children(&self) -> std::slice::Iter<'_, OperationTree> {
        match self {
            OperationTree::Leaf(_) => std::slice::from_ref(self).iter(),
            OperationTree::Node(children) => children.iter(),
        }
    }

    /// All leaves, depth first, in order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![std::slice::from_ref(self).iter()],
        }
    }

    /// Consume the tree into its leaves, in order.
    pub fn into_leaves(self) -> Vec<Instruction> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(self, out: &mut Vec<Instruction>) {
        match self {
            OperationTree::Leaf(inst) => out.push(inst),
            OperationTree::Node(children) => {
                for child in children {
                    child.collect_into(out);
                }
            }
        }
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.leaves().count()
    }

    /// Get the instruction if this is a leaf.
    pub fn as_leaf(&self) -> Option<&Instruction> {
        match self {
            OperationTree::Leaf(inst) => Some(inst),
            OperationTree::Node(_) => None,
        }
    }
}

impl From<Instruction> for OperationTree {
    fn from(inst: Instruction) -> Self {
        OperationTree::Leaf(inst)
    }
}

impl From<Vec<Instruction>> for OperationTree {
    fn from(insts: Vec<Instruction>) -> Self {
        OperationTree::node(insts.into_iter().map(OperationTree::Leaf))
    }
}

impl FromIterator<OperationTree> for OperationTree {
    fn from_iter<I: IntoIterator<Item = OperationTree>>(iter: I) -> Self {
        OperationTree::node(iter)
    }
}

/// Depth-first iterator over the leaves of an [`OperationTree`].
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, OperationTree>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Instruction;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(OperationTree::Leaf(inst)) => return Some(inst),
                Some(OperationTree::Node(children)) => self.stack.push(children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
