//! Available-expressions analysis over a procedure's control-flow graph.
//!
//! An expression is available at a point when every path reaching that point has
//! computed it and none of its operands has been redefined since. The facts this
//! crate computes are what common-subexpression elimination needs; it never
//! rewrites the program itself.

pub mod config;
pub mod dataflow;
pub mod error;
pub mod tac;

pub use config::{AnalysisConfig, Strategy};
pub use dataflow::{forward_analysis, FactBase, Graph, Instruction, Label, Lattice};
pub use error::{Error, Result};
