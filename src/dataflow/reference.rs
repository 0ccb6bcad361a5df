use fnv::FnvHashSet;
use tracing::{debug, trace};

use super::analysis::{extend_block, merge_predecessors};
use super::fact_base::FactBase;
use super::graph::{Graph, Instruction, Label};
use crate::error::{Error, Result};

/// Walks blocks in discovery order, visiting each once, and re-iterates a range of
/// blocks whenever a successor turns out to be visited already.
///
/// A re-iteration stops at the first instruction whose outgoing fact comes out the
/// same as before. It does not wait for the whole range to settle.
pub(crate) struct ReferenceWalk<'g, I: Instruction> {
    graph: &'g Graph<I>,
    fact_base: FactBase<'g, I>,
    visited: FnvHashSet<Label>,
    iteration_limit: usize,
}

impl<'g, I: Instruction> ReferenceWalk<'g, I> {
    pub(crate) fn new(graph: &'g Graph<I>, iteration_limit: usize) -> Self {
        ReferenceWalk {
            graph,
            fact_base: FactBase::new(),
            visited: FnvHashSet::default(),
            iteration_limit,
        }
    }

    pub(crate) fn run(mut self) -> Result<FactBase<'g, I>> {
        for label in self.graph.pre_order_traversal() {
            self.visit(label)?;
        }
        Ok(self.fact_base)
    }

    fn visit(&mut self, label: Label) -> Result<()> {
        let graph = self.graph;
        let incoming = merge_predecessors(graph, &self.fact_base, label)?;
        debug!(block = %label, ?incoming, "begin block");

        self.visited.insert(label);
        self.fact_base.record_visit(label);
        self.fact_base.count_visit();
        extend_block(graph, &mut self.fact_base, label, incoming);

        for successor in graph.successors(label)? {
            if self.visited.contains(successor) {
                debug!(from = %label, to = %successor, "successor visited before, loop");
                self.reiterate(*successor, label)?;
            }
        }
        Ok(())
    }

    fn reiterate(&mut self, start: Label, end: Label) -> Result<()> {
        let graph = self.graph;
        let start_index = self.fact_base.position(start).ok_or(Error::UnknownBlock(start))?;
        let end_index = self.fact_base.position(end).ok_or(Error::UnknownBlock(end))?;
        let range = self
            .fact_base
            .block_order()
            .get(start_index..=end_index)
            .unwrap_or(&[])
            .to_vec();

        // Blocks swept so far in this pass; an edge back into one of them is a nested loop.
        let mut visited = FnvHashSet::default();
        let mut sweeps = 0;
        loop {
            if sweeps == self.iteration_limit {
                return Err(Error::ConvergenceTimeout { start, end, sweeps });
            }
            sweeps += 1;
            trace!(start = %start, end = %end, sweeps, "loop sweep");

            for &label in &range {
                let mut running = merge_predecessors(graph, &self.fact_base, label)?;
                visited.insert(label);
                self.fact_base.count_visit();

                for fact in self.fact_base.facts_mut(label).iter_mut() {
                    let previous = fact.outgoing()?.clone();
                    fact.set_incoming(running);
                    running = fact.apply_flow_function().clone();
                    trace!(block = %label, instruction = ?fact.instruction(), outgoing = ?running, "loop fact");
                    if previous.equal(&running) {
                        debug!(start = %start, end = %end, sweeps, "fixed dataflow fact, ending loop");
                        return Ok(());
                    }
                }

                for successor in graph.successors(label)? {
                    // The edge closing this very range is the sweep itself.
                    if visited.contains(successor) && (*successor, label) != (start, end) {
                        debug!(from = %label, to = %successor, "nested loop");
                        self.reiterate(*successor, label)?;
                    }
                }
            }
            visited.clear();
        }
    }
}
