use fnv::FnvHashMap;

use super::fact::{Available, Fact, InstructionFact};
use super::graph::{Instruction, Label};
use super::lattice::Lattice;
use crate::error::Result;

/// Identifies one instruction: its block and its position inside the block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstLocation {
    pub block: Label,
    pub index: usize,
}

impl InstLocation {
    pub fn new(block: Label, index: usize) -> Self {
        InstLocation { block, index }
    }
}

/// Everything one analysis run knows: the facts of every visited block, in
/// instruction order, and the order blocks were first visited in.
///
/// Facts are created the first time a block is visited and overwritten in place
/// on every later visit.
#[derive(Clone, Debug)]
pub struct FactBase<'g, I: Instruction> {
    facts: FnvHashMap<Label, Vec<InstructionFact<'g, I>>>,
    order: Vec<Label>,
    visits: usize,
}

impl<'g, I: Instruction> Default for FactBase<'g, I> {
    fn default() -> Self {
        FactBase {
            facts: FnvHashMap::default(),
            order: vec![],
            visits: 0,
        }
    }
}

impl<'g, I: Instruction> FactBase<'g, I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facts(&self, label: Label) -> &[InstructionFact<'g, I>] {
        self.facts.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn facts_mut(&mut self, label: Label) -> &mut Vec<InstructionFact<'g, I>> {
        self.facts.entry(label).or_default()
    }

    pub fn fact(&self, location: InstLocation) -> Option<&InstructionFact<'g, I>> {
        self.facts(location.block).get(location.index)
    }

    pub fn incoming(&self, location: InstLocation) -> Option<&Fact<I>> {
        self.fact(location).map(InstructionFact::incoming)
    }

    pub fn outgoing(&self, location: InstLocation) -> Option<&Fact<I>> {
        self.fact(location).and_then(|fact| fact.outgoing().ok())
    }

    pub fn available_before(&self, location: InstLocation, expression: &Available<I>) -> bool {
        self.incoming(location)
            .map_or(false, |fact| fact.contains(expression))
    }

    pub fn available_after(&self, location: InstLocation, expression: &Available<I>) -> bool {
        self.outgoing(location)
            .map_or(false, |fact| fact.contains(expression))
    }

    // What a block hands its successors: the outgoing fact of its last instruction.
    //   A block with no facts (unvisited, or visited but empty) contributes Bottom.
    pub fn latest_outgoing(&self, label: Label) -> Result<Fact<I>> {
        match self.facts(label).last() {
            Some(fact) => fact.outgoing().cloned(),
            None => Ok(Lattice::Bottom),
        }
    }

    pub fn block_order(&self) -> &[Label] {
        &self.order
    }

    pub fn position(&self, label: Label) -> Option<usize> {
        self.order.iter().position(|visited| *visited == label)
    }

    pub(crate) fn record_visit(&mut self, label: Label) -> usize {
        self.order.push(label);
        self.order.len() - 1
    }

    // Block visits over the whole run, loop sweeps included.
    pub fn visits(&self) -> usize {
        self.visits
    }

    pub(crate) fn count_visit(&mut self) -> usize {
        self.visits += 1;
        self.visits
    }
}
