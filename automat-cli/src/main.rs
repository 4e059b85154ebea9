//! automat - Command-line front end
//!
//! Compiles expressions, prints intermediate automata and tests inputs.

use automat::{
    Automaton, Closures, Recognizer, Rejection, SimulationOptions, TransitionTable, build,
    determinize, refine_alphabet, remove_epsilon_with,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "automat")]
#[command(about = "Compile regular expressions into finite automata, step by step")]
#[command(version)]
struct Cli {
    /// Let epsilon edges consume any symbol during simulation
    #[arg(long, global = true, env = "AUTOMAT_LEGACY_EPSILON")]
    legacy_epsilon: bool,

    /// Log every pipeline step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression and print each rewrite step
    Build {
        /// The expression
        expression: String,
        /// Print every step as a Graphviz digraph
        #[arg(long)]
        dot: bool,
    },
    /// Print the NFA, epsilon-free and deterministic tables of an expression
    Table {
        /// The expression
        expression: String,
    },
    /// Print the epsilon-closure of every state of a JSON table
    Closure {
        /// Path to the table
        file: PathBuf,
    },
    /// Remove epsilon transitions from a JSON table, then determinize it
    Determinize {
        /// Path to the table
        file: PathBuf,
    },
    /// Test several inputs against an expression
    Test {
        /// The expression
        expression: String,
        /// Inputs to test
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Exit with status 0 if the input matches, 1 otherwise
    Match {
        /// The expression
        expression: String,
        /// The input string
        input: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = SimulationOptions::default().with_legacy_epsilon(cli.legacy_epsilon);

    match cli.command {
        Commands::Build { expression, dot } => cmd_build(&expression, dot),
        Commands::Table { expression } => cmd_table(&expression),
        Commands::Closure { file } => cmd_closure(&file),
        Commands::Determinize { file } => cmd_determinize(&file),
        Commands::Test { expression, inputs } => cmd_test(&expression, &inputs, options),
        Commands::Match { expression, input } => cmd_match(&expression, &input, options),
    }
}

fn fail(e: impl Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), e);
    std::process::exit(1);
}

fn compile(expression: &str, options: SimulationOptions) -> Recognizer {
    match Recognizer::new(expression) {
        Ok(r) => r.with_options(options),
        Err(e) => fail(e),
    }
}

fn load_table(path: &Path) -> TransitionTable {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => fail(format!("cannot read {}: {}", path.display(), e)),
    };
    debug!(path = %path.display(), bytes = json.len(), "loaded table");
    match TransitionTable::from_json(&json) {
        Ok(table) => table,
        Err(e) => fail(e),
    }
}

fn print_subsets(construction: &automat::SubsetConstruction) {
    for (name, members) in &construction.subsets {
        println!("  {} = {{{}}}", name.cyan(), members.join(", "));
    }
}

/// Rejection text using the node names of `graph`
fn describe_rejection(graph: &Automaton, rejection: &Rejection) -> String {
    match rejection {
        Rejection::NoTransition {
            node,
            symbol,
            position,
        } => format!(
            "no transition from {} on '{}' at position {}",
            graph.name_of(*node),
            symbol,
            position
        ),
        Rejection::NotFinal { node } => format!("{} is not final", graph.name_of(*node)),
    }
}

fn cmd_build(expression: &str, dot: bool) {
    let automaton = match build(expression) {
        Ok(a) => a,
        Err(e) => fail(e),
    };

    if dot {
        for snapshot in automaton.history() {
            println!("{}", snapshot.to_dot());
        }
        return;
    }

    println!("{}", "Building automaton...".bold());
    println!("  Expression: {}", expression.cyan());
    println!();

    for snapshot in automaton.history() {
        println!(
            "{} {}",
            format!("[{}]", snapshot.step).bold(),
            snapshot.comment
        );
    }
    println!();

    println!(
        "{} {} nodes, {} edges",
        "Result:".bold(),
        automaton.len(),
        automaton.edge_count()
    );
    for (from, edge) in automaton.edges() {
        println!(
            "    {} -> {}  {}",
            automaton.name_of(from),
            automaton.name_of(edge.target),
            edge.transition.to_string().green()
        );
    }
}

fn cmd_table(expression: &str) {
    let recognizer = compile(expression, SimulationOptions::default());

    println!("{}", "NFA:".bold());
    println!("{}", recognizer.nfa_table());
    println!("{}", "Without epsilon transitions:".bold());
    println!("{}", recognizer.epsilon_free());
    println!("{}", "Deterministic:".bold());
    println!("{}", recognizer.dfa().table);
    println!("{}", "Subsets:".bold());
    print_subsets(recognizer.dfa());
}

fn cmd_closure(path: &Path) {
    let table = load_table(path);
    let closures = match Closures::compute(&table) {
        Ok(c) => c,
        Err(e) => fail(e),
    };

    println!("{}", "Epsilon closures:".bold());
    for (state, members) in closures.named(&table) {
        println!("  {} = {{{}}}", state.cyan(), members.join(", "));
    }
}

fn cmd_determinize(path: &Path) {
    let table = load_table(path);
    let refined = match refine_alphabet(&table) {
        Ok(t) => t,
        Err(e) => fail(e),
    };
    let closures = match Closures::compute(&refined) {
        Ok(c) => c,
        Err(e) => fail(e),
    };
    let epsilon_free = match remove_epsilon_with(&refined, &closures) {
        Ok(t) => t,
        Err(e) => fail(e),
    };
    let dfa = match determinize(&epsilon_free) {
        Ok(d) => d,
        Err(e) => fail(e),
    };

    println!("{}", "Input:".bold());
    println!("{}", table);
    println!("{}", "Without epsilon transitions:".bold());
    println!("{}", epsilon_free);
    println!("{}", "Deterministic:".bold());
    println!("{}", dfa.table);
    print_subsets(&dfa);
}

fn cmd_test(expression: &str, inputs: &[String], options: SimulationOptions) {
    let recognizer = compile(expression, options);

    println!("{}", "Testing expression...".bold());
    println!("  Expression: {}", expression.cyan());
    println!();

    let outcomes = recognizer.test_all(inputs);
    for outcome in &outcomes {
        let shown = if outcome.input.is_empty() {
            "ε".to_string()
        } else {
            outcome.input.clone()
        };
        if outcome.accepted {
            println!("  {} {}", "✓".green().bold(), shown.green());
        } else if let Some(e) = &outcome.error {
            println!("  {} {} ({})", "✗".red().bold(), shown.red(), e);
        } else {
            println!("  {} {}", "✗".red().bold(), shown.red());
        }
    }

    let accepted = outcomes.iter().filter(|o| o.accepted).count();
    println!();
    println!(
        "{} {}",
        "Accepted".bold(),
        format!("{} of {}", accepted, outcomes.len()).green()
    );
}

fn cmd_match(expression: &str, input: &str, options: SimulationOptions) {
    let recognizer = compile(expression, options);

    match recognizer.run(input) {
        Ok(run) if run.accepted => println!("{}", "✓ Match".green().bold()),
        Ok(run) => {
            let reason = run
                .rejection
                .map(|r| describe_rejection(recognizer.graph(), &r))
                .unwrap_or_default();
            println!("{} {}", "✗ No match:".red(), reason);
            std::process::exit(1);
        }
        Err(e) => fail(e),
    }
}
