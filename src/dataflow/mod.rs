mod analysis;
mod expression;
mod fact;
mod fact_base;
mod graph;
mod lattice;
mod reference;


pub use analysis::forward_analysis;
pub use expression::{AvailableExpression, Expression, ExpressionSet};
pub use fact::{transfer, Available, Fact, InstructionFact};
pub use fact_base::{FactBase, InstLocation};
pub use graph::{Block, Effect, Graph, Instruction, Label};
pub use lattice::Lattice;
