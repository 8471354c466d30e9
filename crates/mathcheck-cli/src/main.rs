//! mathcheck CLI - evaluate arithmetic formulas from the command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mathcheck_formula::{split_equation, tokenize, Bindings, FormulaCache};

#[derive(Parser)]
#[command(name = "mathcheck")]
#[command(author, version, about = "Arithmetic formula evaluation tool")]
struct Cli {
    /// Log cache and parser activity (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula
    #[command(alias = "calc")]
    Eval {
        /// Formula text, e.g. "x*3+1"
        formula: String,

        /// Variable binding as name=value (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Print the parsed tree with explicit grouping
    Tree {
        /// Formula text
        formula: String,
    },

    /// Print the token sequence
    Tokens {
        /// Formula text
        formula: String,
    },

    /// Evaluate both sides of an equation
    Sides {
        /// Equation text, e.g. "x*x=2*x"
        equation: String,

        /// Variable binding as name=value (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let cache = FormulaCache::new();
    match cli.command {
        Commands::Eval { formula, set } => eval(&cache, &formula, &set),
        Commands::Tree { formula } => show_tree(&cache, &formula),
        Commands::Tokens { formula } => show_tokens(&formula),
        Commands::Sides { equation, set } => show_sides(&cache, &equation, &set),
    }
}

fn eval(cache: &FormulaCache, formula: &str, set: &[String]) -> Result<()> {
    let bindings = parse_bindings(set)?;
    let value = cache
        .calculate(formula, &bindings)
        .with_context(|| format!("Failed to evaluate '{}'", formula))?;
    println!("{}", value);
    Ok(())
}

fn show_tree(cache: &FormulaCache, formula: &str) -> Result<()> {
    let tree = cache
        .get_or_build(formula)
        .with_context(|| format!("Failed to parse '{}'", formula))?;

    println!("{}", tree);
    let variables = tree.variables();
    if !variables.is_empty() {
        println!("Variables: {}", variables.join(", "));
    }
    Ok(())
}

fn show_tokens(formula: &str) -> Result<()> {
    let tokens = tokenize(formula).with_context(|| format!("Failed to tokenize '{}'", formula))?;
    for token in tokens {
        println!("{}", token);
    }
    Ok(())
}

fn show_sides(cache: &FormulaCache, equation: &str, set: &[String]) -> Result<()> {
    let bindings = parse_bindings(set)?;
    let (left, right) = split_equation(equation)?;

    let lhs = cache
        .calculate(left, &bindings)
        .with_context(|| format!("Failed to evaluate left side '{}'", left))?;
    let rhs = cache
        .calculate(right, &bindings)
        .with_context(|| format!("Failed to evaluate right side '{}'", right))?;

    println!("left\t{}", lhs);
    println!("right\t{}", rhs);
    Ok(())
}

/// Parse `name=value` pairs into bindings
fn parse_bindings(pairs: &[String]) -> Result<Bindings> {
    let mut bindings = Bindings::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("Binding '{}' must look like name=value", pair);
        };
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for '{}'", name))?;
        bindings.set(name.trim(), value);
    }
    Ok(bindings)
}
