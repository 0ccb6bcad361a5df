use super::expression::AvailableExpression;
use super::graph::{Effect, Instruction};
use super::lattice::Lattice;
use crate::error::{Error, Result};

pub type Available<I> = AvailableExpression<<I as Instruction>::Op, <I as Instruction>::Var>;
pub type Fact<I> = Lattice<Available<I>>;

/// The available-expressions fact around one instruction.
#[derive(Clone, Debug)]
pub struct InstructionFact<'g, I: Instruction> {
    instruction: &'g I,
    incoming: Fact<I>,
    // None until the flow function has run against the current incoming fact.
    outgoing: Option<Fact<I>>,
}

impl<'g, I: Instruction> InstructionFact<'g, I> {
    pub fn new(instruction: &'g I, incoming: Fact<I>) -> Self {
        InstructionFact { instruction, incoming, outgoing: None }
    }

    pub fn instruction(&self) -> &'g I {
        self.instruction
    }

    pub fn incoming(&self) -> &Fact<I> {
        &self.incoming
    }

    pub fn outgoing(&self) -> Result<&Fact<I>> {
        self.outgoing.as_ref().ok_or(Error::NotComputed)
    }

    pub fn is_computed(&self) -> bool {
        self.outgoing.is_some()
    }

    pub fn set_incoming(&mut self, incoming: Fact<I>) {
        self.incoming = incoming;
        self.outgoing = None;
    }

    pub fn apply_flow_function(&mut self) -> &Fact<I> {
        self.outgoing.insert(transfer(self.instruction, &self.incoming))
    }
}

/// GEN/KILL for a single instruction.
///
/// Writes to memory (`Store` and `Opaque`) kill every available load. Defining a
/// variable kills every expression that reads it or is held in it, then adds the
/// instruction's own expression unless that expression reads the variable it just
/// overwrote. An incoming `Bottom` reads as the empty set, which keeps this
/// monotone in `Lattice::le`.
pub fn transfer<I: Instruction>(instruction: &I, incoming: &Fact<I>) -> Fact<I> {
    let mut available = incoming.concrete();
    let effect = instruction.effect();

    if let Effect::Store | Effect::Opaque = effect {
        available.retain(|e| !e.reads_memory);
    }

    if let Some(var) = instruction.defines() {
        available.retain(|e| !e.depends_on(&var));

        let generated = match effect {
            Effect::Pure(expression) => Some(AvailableExpression::pure(expression, var)),
            Effect::Load(expression) => Some(AvailableExpression::load(expression, var)),
            Effect::Store | Effect::Opaque | Effect::Other => None,
        };
        if let Some(generated) = generated {
            if !generated.expression.reads(&var) {
                available.insert(generated);
            }
        }
    }

    Lattice::Value(available)
}
