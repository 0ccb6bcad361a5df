use fnv::{FnvHashMap, FnvHashSet};
use tracing::{debug, info, trace};

use super::expression::ExpressionSet;
use super::fact::{Fact, InstructionFact};
use super::fact_base::FactBase;
use super::graph::{Graph, Instruction, Label};
use super::lattice::Lattice;
use super::reference::ReferenceWalk;
use crate::config::{AnalysisConfig, Strategy};
use crate::error::{Error, Result};

/// Computes the available expressions before and after every instruction of `graph`.
///
/// The returned fact base belongs to this call alone; nothing is cached between runs.
pub fn forward_analysis<'g, I: Instruction>(
    graph: &'g Graph<I>,
    config: &AnalysisConfig,
) -> Result<FactBase<'g, I>> {
    let fact_base = match config.strategy {
        Strategy::Reference => ReferenceWalk::new(graph, config.iteration_limit).run()?,
        Strategy::Worklist => fixed_point_forward_graph(graph, config.iteration_limit)?,
    };

    info!(
        strategy = ?config.strategy,
        blocks = graph.len(),
        visits = fact_base.visits(),
        "available expressions computed"
    );
    Ok(fact_base)
}

// Meets the outgoing facts of every predecessor, in predecessor order. A block with
//   no predecessors gets Bottom, and so does any predecessor without a fact yet.
//   Entering the procedure is an edge too: an entry block that is also a loop header
//   meets Top for it, since nothing is available on the way in.
pub(crate) fn merge_predecessors<I: Instruction>(
    graph: &Graph<I>,
    fact_base: &FactBase<I>,
    label: Label,
) -> Result<Fact<I>> {
    let predecessors = graph.predecessors(label)?;
    debug!(block = %label, ?predecessors, "merging predecessors");

    let mut edges = Vec::with_capacity(predecessors.len());
    for predecessor in predecessors {
        let edge = fact_base.latest_outgoing(*predecessor)?;
        if edge == Lattice::Bottom {
            trace!(block = %label, predecessor = %predecessor, "no incoming edge, using bottom");
        }
        edges.push(edge);
    }
    if label == graph.entry() && !predecessors.is_empty() {
        edges.push(Lattice::Top);
    }

    Ok(Lattice::meet_all(&edges))
}

// Runs the flow function down a block that has never been visited, creating its facts.
pub(crate) fn extend_block<'g, I: Instruction>(
    graph: &'g Graph<I>,
    fact_base: &mut FactBase<'g, I>,
    label: Label,
    incoming: Fact<I>,
) -> Fact<I> {
    let facts = fact_base.facts_mut(label);
    let mut running = incoming;
    for instruction in graph[label].code() {
        let mut fact = InstructionFact::new(instruction, running);
        running = fact.apply_flow_function().clone();
        trace!(block = %label, ?instruction, outgoing = ?running, "fact");
        facts.push(fact);
    }
    running
}

// Replays a block's existing facts against a new incoming fact.
fn fixed_point_forward_block<I: Instruction>(
    fact_base: &mut FactBase<I>,
    label: Label,
    incoming: Fact<I>,
) -> Fact<I> {
    let mut running = incoming;
    for fact in fact_base.facts_mut(label).iter_mut() {
        fact.set_incoming(running);
        running = fact.apply_flow_function().clone();
        trace!(block = %label, instruction = ?fact.instruction(), outgoing = ?running, "fact");
    }
    running
}

fn fixed_point_forward_graph<'g, I: Instruction>(
    graph: &'g Graph<I>,
    iteration_limit: usize,
) -> Result<FactBase<'g, I>> {
    let mut fact_base = FactBase::new();
    let mut out_facts: FnvHashMap<Label, Fact<I>> = graph
        .blocks()
        .iter()
        .map(|block| (block.label(), Lattice::Bottom))
        .collect();
    let mut seen = FnvHashSet::default();
    let limit = iteration_limit.saturating_mul(graph.len());
    let procedure_entry = Lattice::Top;

    // Popping off the end of a post-order walks blocks in reverse post-order.
    let mut to_visit = graph.post_order_traversal();

    while let Some(label) = to_visit.pop() {
        let visits = fact_base.count_visit();
        if visits > limit {
            return Err(Error::ConvergenceTimeout {
                start: graph.entry(),
                end: label,
                sweeps: visits - 1,
            });
        }

        let mut edges = vec![];
        for predecessor in graph.predecessors(label)? {
            let edge = out_facts
                .get(predecessor)
                .ok_or(Error::UnknownBlock(*predecessor))?;
            edges.push(edge);
        }
        if label == graph.entry() && !edges.is_empty() {
            edges.push(&procedure_entry);
        }
        let incoming = Lattice::meet_all(edges);
        debug!(block = %label, ?incoming, "begin block");

        let outgoing = if seen.insert(label) {
            fact_base.record_visit(label);
            extend_block(graph, &mut fact_base, label, incoming)
        } else {
            fixed_point_forward_block(&mut fact_base, label, incoming)
        };
        // Only an empty block can hand on Bottom. No instruction produced it, so
        //   successors must see nothing available rather than the meet identity.
        let outgoing = match outgoing {
            Lattice::Bottom => Lattice::Value(ExpressionSet::new()),
            fact => fact,
        };

        let old_fact = out_facts.entry(label).or_insert(Lattice::Bottom);
        if old_fact.equal(&outgoing) {
            // We didn't change so we don't need to re-examine the successors
            continue;
        }
        *old_fact = outgoing;

        for successor in graph.successors(label)? {
            if !to_visit.contains(successor) {
                to_visit.push(*successor);
            }
        }
    }

    Ok(fact_base)
}
