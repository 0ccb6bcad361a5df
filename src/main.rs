use avail_expr::config::DEFAULT_ITERATION_LIMIT;
use avail_expr::dataflow::{Fact, InstLocation};
use avail_expr::tac::{self, BinOp, Tac, Var};
use avail_expr::{forward_analysis, AnalysisConfig, Graph, Label, Lattice, Strategy};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StrategyArg {
    Reference,
    Worklist,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Reference => Strategy::Reference,
            StrategyArg::Worklist => Strategy::Worklist,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Program {
    Straight,
    Diamond,
    Loop,
}

#[derive(Parser, Debug)]
#[command(name = "avail-expr")]
#[command(about = "Print the available expressions of a sample procedure")]
struct Cli {
    /// Which sample procedure to analyze
    #[arg(long, value_enum, default_value_t = Program::Loop)]
    program: Program,

    #[arg(long, value_enum, default_value_t = StrategyArg::Worklist)]
    strategy: StrategyArg,

    /// Give up on a loop after this many sweeps
    #[arg(long, default_value_t = DEFAULT_ITERATION_LIMIT)]
    iteration_limit: usize,
}

fn sample(program: Program) -> avail_expr::Result<Graph<Tac>> {
    let (a, b, t1, t2, t3, i) = (Var(0), Var(1), Var(2), Var(3), Var(4), Var(5));
    let blocks = match program {
        Program::Straight => vec![tac::block(
            Label(0),
            vec![
                Tac::Binary(BinOp::Add, t1, a, b),
                Tac::Const(a, 5),
                Tac::Binary(BinOp::Add, t2, a, b),
                Tac::Ret,
            ],
        )],
        Program::Diamond => vec![
            tac::block(Label(0), vec![Tac::Binary(BinOp::Add, t1, a, b), Tac::Branch(t1, Label(1), Label(2))]),
            tac::block(Label(1), vec![Tac::Binary(BinOp::Mul, t2, a, b), Tac::Jump(Label(3))]),
            tac::block(Label(2), vec![Tac::Const(a, 1), Tac::Jump(Label(3))]),
            tac::block(Label(3), vec![Tac::Binary(BinOp::Add, t3, a, b), Tac::Ret]),
        ],
        Program::Loop => vec![
            tac::block(Label(0), vec![Tac::Binary(BinOp::Add, t1, a, b), Tac::Const(i, 0), Tac::Jump(Label(1))]),
            tac::block(Label(1), vec![Tac::Binary(BinOp::Lt, t2, i, b), Tac::Branch(t2, Label(2), Label(3))]),
            tac::block(Label(2), vec![Tac::Binary(BinOp::Add, t3, a, b), Tac::Binary(BinOp::Add, i, i, t3), Tac::Jump(Label(1))]),
            tac::block(Label(3), vec![Tac::Ret]),
        ],
    };
    Graph::from_blocks(blocks)
}

fn render(fact: Option<&Fact<Tac>>) -> String {
    match fact {
        None => "-".to_string(),
        Some(Lattice::Top) => "top".to_string(),
        Some(Lattice::Bottom) => "bottom".to_string(),
        Some(Lattice::Value(set)) => {
            let mut items: Vec<String> = set
                .iter()
                .map(|e| format!("{:?} = {:?}{:?}", e.holder, e.expression.op, e.expression.operands))
                .collect();
            items.sort();
            format!("{{{}}}", items.join(", "))
        }
    }
}

fn main() -> avail_expr::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avail_expr=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AnalysisConfig::default()
        .with_strategy(cli.strategy.into())
        .with_iteration_limit(cli.iteration_limit);

    let graph = sample(cli.program)?;
    let fact_base = forward_analysis(&graph, &config)?;

    for block in graph.blocks() {
        println!("{}:", block.label());
        for (index, instruction) in block.code().iter().enumerate() {
            let location = InstLocation::new(block.label(), index);
            println!("    {:?}", instruction);
            println!("        in:  {}", render(fact_base.incoming(location)));
            println!("        out: {}", render(fact_base.outgoing(location)));
        }
    }
    Ok(())
}
