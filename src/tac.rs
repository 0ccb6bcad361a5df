//! A small three-address instruction set, enough to describe procedures for the
//! analysis by hand.

use crate::dataflow::{Block, Effect, Expression, Instruction, Label};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub u16);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    And,
    Or,
    Lt,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Binary(BinOp),
    Load,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tac {
    /// dst := constant
    Const(Var, i64),

    /// dst := src1 op src2
    Binary(BinOp, Var, Var, Var),

    /// dst := src
    Copy(Var, Var),

    /// dst := *addr
    Load(Var, Var),

    /// *addr := src
    Store(Var, Var),

    /// dst := f(args), or just f(args)
    Call(Option<Var>, Vec<Var>),

    /// if src != 0 { goto l1 } else { goto l2 }
    Branch(Var, Label, Label),

    /// goto l
    Jump(Label),

    Ret,
}

impl Tac {
    // If this instruction ends a block, this gives each place we can jump to.
    pub fn successors(&self) -> Option<Vec<Label>> {
        match self {
            Tac::Branch(_, l1, l2) => Some(vec![*l1, *l2]),
            Tac::Jump(l) => Some(vec![*l]),
            Tac::Ret => Some(vec![]),
            _ => None,
        }
    }

    pub fn expression(op: BinOp, src1: Var, src2: Var) -> Expression<Op, Var> {
        Expression::new(Op::Binary(op), vec![src1, src2])
    }
}

impl Instruction for Tac {
    type Var = Var;
    type Op = Op;

    fn effect(&self) -> Effect<Op, Var> {
        match self {
            Tac::Binary(op, _, src1, src2) => Effect::Pure(Tac::expression(*op, *src1, *src2)),
            Tac::Load(_, addr) => Effect::Load(Expression::new(Op::Load, vec![*addr])),
            Tac::Store(_, _) => Effect::Store,
            Tac::Call(_, _) => Effect::Opaque,
            Tac::Const(_, _) | Tac::Copy(_, _) | Tac::Branch(_, _, _) | Tac::Jump(_) | Tac::Ret => {
                Effect::Other
            }
        }
    }

    fn defines(&self) -> Option<Var> {
        match self {
            Tac::Const(dst, _) | Tac::Binary(_, dst, _, _) | Tac::Copy(dst, _) | Tac::Load(dst, _) => {
                Some(*dst)
            }
            Tac::Call(dst, _) => *dst,
            Tac::Store(_, _) | Tac::Branch(_, _, _) | Tac::Jump(_) | Tac::Ret => None,
        }
    }
}

/// Builds a block whose successors are read off its last instruction. A block that
/// does not end in a jump, branch or return has no successors.
pub fn block(label: Label, code: Vec<Tac>) -> Block<Tac> {
    let successors = code.last().and_then(Tac::successors).unwrap_or_default();
    Block::new(label, code, successors)
}
