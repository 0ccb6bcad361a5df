use thiserror::Error;

use crate::dataflow::Label;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("outgoing fact read before the flow function ran")]
    NotComputed,
    #[error("block {0} is not part of the graph")]
    UnknownBlock(Label),
    #[error("block {0} appears more than once")]
    DuplicateBlock(Label),
    #[error("graph has no blocks")]
    EmptyGraph,
    #[error("no fixed point for blocks {start}..={end} after {sweeps} sweeps")]
    ConvergenceTimeout { start: Label, end: Label, sweeps: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
