/// How the engine walks the graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Discovery-order walk that re-iterates a block range whenever it meets a
    /// back-edge, stopping at the first instruction whose fact did not change.
    Reference,

    /// Iterative worklist over the whole graph, seeded in reverse post-order.
    #[default]
    Worklist,
}

// Same order of magnitude as the label forwarding limit; anything needing more is a bug.
pub const DEFAULT_ITERATION_LIMIT: usize = 10_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub strategy: Strategy,

    // Reference: sweeps allowed per loop re-iteration.
    //   Worklist: visits allowed per block.
    pub iteration_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            strategy: Strategy::default(),
            iteration_limit: DEFAULT_ITERATION_LIMIT,
        }
    }
}

impl AnalysisConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_iteration_limit(mut self, iteration_limit: usize) -> Self {
        self.iteration_limit = iteration_limit;
        self
    }
}
