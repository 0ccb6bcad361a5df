use fnv::{FnvHashMap, FnvHashSet};

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Index;

use super::expression::Expression;
use crate::error::{Error, Result};

// A label is an unsigned integer, used to identify a block.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// What an instruction does, as far as available expressions are concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect<O, V> {
    /// Computes `op(operands)` without touching memory.
    Pure(Expression<O, V>),

    /// Computes `op(operands)` by reading memory, so any write may invalidate it.
    Load(Expression<O, V>),

    /// Writes memory.
    Store,

    /// Calls, intrinsics, anything else that may write memory.
    Opaque,

    /// Computes nothing the analysis tracks and leaves memory alone: copies,
    /// constants, branches.
    Other,
}

pub trait Instruction: Clone + Debug {
    type Var: Copy + Eq + Hash + Debug;
    type Op: Copy + Eq + Hash + Debug;

    fn effect(&self) -> Effect<Self::Op, Self::Var>;

    // The variable this instruction (re)defines, if any. In an SSA host this is
    //   the instruction's own value.
    fn defines(&self) -> Option<Self::Var>;
}

#[derive(Debug, Clone)]
pub struct Block<I> {
    label: Label,
    successors: Vec<Label>,
    code: Vec<I>,
}

impl<I: Instruction> Block<I> {
    pub fn new(label: Label, code: Vec<I>, successors: Vec<Label>) -> Block<I> {
        Block { label, successors, code }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn successors(&self) -> &[Label] {
        &self.successors
    }

    pub fn code(&self) -> &[I] {
        &self.code
    }
}

/// A procedure's control-flow graph. The first block is the entry.
#[derive(Debug, Clone)]
pub struct Graph<I> {
    blocks: Vec<Block<I>>,
    index: FnvHashMap<Label, usize>,
    predecessors: FnvHashMap<Label, Vec<Label>>,
}

impl<I: Instruction> Graph<I> {
    pub fn from_blocks(blocks: Vec<Block<I>>) -> Result<Graph<I>> {
        if blocks.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut index = FnvHashMap::default();
        let mut predecessors: FnvHashMap<Label, Vec<Label>> = FnvHashMap::default();
        for (position, block) in blocks.iter().enumerate() {
            if index.insert(block.label(), position).is_some() {
                return Err(Error::DuplicateBlock(block.label()));
            }
            predecessors.insert(block.label(), vec![]);
        }

        for block in &blocks {
            for successor in block.successors() {
                let preds = predecessors
                    .get_mut(successor)
                    .ok_or(Error::UnknownBlock(*successor))?;
                // A conditional branch with both arms on the same block is still one edge.
                if !preds.contains(&block.label()) {
                    preds.push(block.label());
                }
            }
        }

        Ok(Graph { blocks, index, predecessors })
    }

    pub fn entry(&self) -> Label {
        self.blocks[0].label()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, label: Label) -> bool {
        self.index.contains_key(&label)
    }

    // Blocks in layout order.
    pub fn blocks(&self) -> &[Block<I>] {
        &self.blocks
    }

    pub fn block(&self, label: Label) -> Result<&Block<I>> {
        self.index
            .get(&label)
            .map(|position| &self.blocks[*position])
            .ok_or(Error::UnknownBlock(label))
    }

    pub fn predecessors(&self, label: Label) -> Result<&[Label]> {
        self.predecessors
            .get(&label)
            .map(Vec::as_slice)
            .ok_or(Error::UnknownBlock(label))
    }

    pub fn successors(&self, label: Label) -> Result<&[Label]> {
        self.block(label).map(Block::successors)
    }

    // Roots for a full walk: the entry first, then every block in layout order so that
    //   blocks unreachable from the entry still get analyzed.
    fn roots(&self) -> impl Iterator<Item = Label> + '_ {
        std::iter::once(self.entry()).chain(self.blocks.iter().map(Block::label))
    }

    /// Depth-first pre-order, first successor first. This is the discovery order the
    /// reference traversal visits blocks in.
    pub fn pre_order_traversal(&self) -> Vec<Label> {
        let mut output = vec![];
        let mut visited = FnvHashSet::default();
        for root in self.roots() {
            let mut stack = vec![root];
            while let Some(label) = stack.pop() {
                if !visited.insert(label) {
                    continue;
                }
                output.push(label);
                for successor in self[label].successors().iter().rev() {
                    if !visited.contains(successor) {
                        stack.push(*successor);
                    }
                }
            }
        }
        output
    }

    pub fn post_order_traversal(&self) -> Vec<Label> {
        fn go<I: Instruction>(graph: &Graph<I>, output: &mut Vec<Label>, visited: &mut FnvHashSet<Label>, label: Label) {
            if !visited.insert(label) {
                return;
            }
            for successor in graph[label].successors() {
                go(graph, output, visited, *successor);
            }
            output.push(label);
        }

        let mut output = vec![];
        let mut visited = FnvHashSet::default();
        for root in self.roots() {
            go(self, &mut output, &mut visited, root);
        }
        output
    }
}

// Only valid for labels that came out of this graph.
impl<I> Index<Label> for Graph<I> {
    type Output = Block<I>;

    fn index(&self, label: Label) -> &Self::Output {
        &self.blocks[self.index[&label]]
    }
}
