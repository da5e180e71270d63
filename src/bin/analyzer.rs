//! Command-line driver for the interval analyzer.
//!
//! Runs one of the built-in example programs through the full pipeline and
//! prints the report. The process exits with 0 when every assertion is
//! proved, 1 when some assertion may fail, and 2 on a malformed AST.

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use interval_analyzer::{analyze, Node};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(author, version, about = "Interval abstract-interpretation analyzer")]
struct Cli {
    /// Example program to analyze
    #[arg(value_enum, default_value = "counter-loop")]
    example: Example,

    /// Verbose solver logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Example {
    /// x := 5; x := x + 3; assert x == 8
    Increment,
    /// pre 0 <= x <= 10; if (x < 5) x := x + 1 else x := x - 1
    Branch,
    /// x := 0; while (x < 10) x := x + 1; assert x >= 10
    CounterLoop,
    /// pre 0 <= y <= 10; y := 100 / y
    DivRange,
    /// pre -5 <= x <= 5; assert x <= 10; assert x >= 0
    Bounds,
    /// pre -10 <= x <= 10; if (x < 0) x := 0 - x else skip; assert x >= 0
    Absolute,
}

impl Example {
    fn source(self) -> &'static str {
        match self {
            Example::Increment => "int x; x := 5; x := x + 3; assert x == 8",
            Example::Branch => "int x; pre 0 <= x <= 10; if (x < 5) { x := x + 1 } else { x := x - 1 }",
            Example::CounterLoop => "int x; x := 0; while (x < 10) { x := x + 1 }; assert x >= 10",
            Example::DivRange => "int x, y; pre 1 <= x <= 10; pre 0 <= y <= 10; y := 100 / y",
            Example::Bounds => "int x; pre -5 <= x <= 5; assert x <= 10; assert x >= 0",
            Example::Absolute => "int x; pre -10 <= x <= 10; if (x < 0) { x := 0 - x }; assert x >= 0",
        }
    }

    fn program(self) -> Node {
        match self {
            Example::Increment => Node::program(
                &["x"],
                vec![
                    Node::assign("x", Node::int(5)),
                    Node::assign("x", Node::var("x").add(Node::int(3))),
                    Node::postcondition(Node::var("x").eq(Node::int(8))),
                ],
            ),
            Example::Branch => Node::program(
                &["x"],
                vec![
                    Node::precondition(0, "x", 10),
                    Node::if_else(
                        Node::var("x").lt(Node::int(5)),
                        vec![Node::assign("x", Node::var("x").add(Node::int(1)))],
                        vec![Node::assign("x", Node::var("x").sub(Node::int(1)))],
                    ),
                ],
            ),
            Example::CounterLoop => Node::program(
                &["x"],
                vec![
                    Node::assign("x", Node::int(0)),
                    Node::while_loop(
                        Node::var("x").lt(Node::int(10)),
                        vec![Node::assign("x", Node::var("x").add(Node::int(1)))],
                    ),
                    Node::postcondition(Node::var("x").ge(Node::int(10))),
                ],
            ),
            Example::DivRange => Node::program(
                &["x", "y"],
                vec![
                    Node::precondition(1, "x", 10),
                    Node::precondition(0, "y", 10),
                    Node::assign("y", Node::int(100).div(Node::var("y"))),
                ],
            ),
            Example::Bounds => Node::program(
                &["x"],
                vec![
                    Node::precondition(-5, "x", 5),
                    Node::postcondition(Node::var("x").le(Node::int(10))),
                    Node::postcondition(Node::var("x").ge(Node::int(0))),
                ],
            ),
            Example::Absolute => Node::program(
                &["x"],
                vec![
                    Node::precondition(-10, "x", 10),
                    Node::if_else(
                        Node::var("x").lt(Node::int(0)),
                        vec![Node::assign("x", Node::int(0).sub(Node::var("x")))],
                        vec![],
                    ),
                    Node::postcondition(Node::var("x").ge(Node::int(0))),
                ],
            ),
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    println!("program: {}", cli.example.source());
    println!();

    let program = cli.example.program();
    match analyze(&program) {
        Ok(report) => {
            print!("{}", report);
            if report.all_proved() {
                println!("all assertions proved");
            }
            std::process::exit(report.exit_code());
        }
        Err(err) => {
            eprintln!("analysis aborted: {}", err);
            std::process::exit(2);
        }
    }
}
