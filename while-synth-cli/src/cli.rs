//! Command-line interface for `wsynth`.
//!
//! Built on [`clap`] derive macros exactly as the teacher's `largo`
//! (`apps/logicaffeine_cli/src/cli.rs`): a top-level [`Cli`] parser
//! delegating to a [`Commands`] enum, one handler function per variant.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};

use while_synth::{
    get_vars, synthesize_with_config, verify_with_config, Example, PredicateFn, SynthesisConfig,
    SynthesisOutcome, VerifyOutcome,
};
use while_synth_kernel::{encode, parse, Expr, Formula, Stmt, SymbolicEnv};

/// Command-line interface for the While-language synthesizer.
#[derive(Parser)]
#[command(name = "wsynth")]
#[command(about = "Sketch synthesizer and Hoare-triple verifier for the While language")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the variable names a program mentions, in first-occurrence order.
    Vars {
        /// Path to a `.while` source file.
        file: PathBuf,
    },

    /// Synthesize values (or expressions) for every `??` hole in a program.
    Synth {
        /// Path to a `.while` source file.
        file: PathBuf,

        /// An input-example binding `name=value`. May be repeated.
        #[arg(long = "in")]
        inputs: Vec<String>,

        /// An output-example binding `name=value`. May be repeated.
        #[arg(long = "out")]
        outputs: Vec<String>,

        /// Allow holes to resolve to compound expressions, not just constants.
        #[arg(long)]
        with_exprs: bool,

        /// Loop-unrolling depth (default 7).
        #[arg(long)]
        unroll_depth: Option<usize>,

        /// Candidate-enumeration phase cap (default 10).
        #[arg(long)]
        phase_cap: Option<usize>,

        /// Per-candidate Z3 timeout in milliseconds (default 10000).
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Check a Hoare triple `{pre} program {post}` under a loop invariant.
    Verify {
        /// Path to a `.while` source file.
        file: PathBuf,

        /// The precondition, as a relational expression over program variables.
        #[arg(long)]
        pre: String,

        /// The postcondition, as a relational expression over program variables.
        #[arg(long)]
        post: String,

        /// The loop invariant. Defaults to `true` if omitted.
        #[arg(long)]
        inv: Option<String>,

        /// Per-candidate Z3 timeout in milliseconds (default 10000).
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

/// Parse CLI arguments and execute the corresponding command.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Vars { file } => cmd_vars(&file),
        Commands::Synth { file, inputs, outputs, with_exprs, unroll_depth, phase_cap, timeout_ms } => {
            cmd_synth(&file, &inputs, &outputs, with_exprs, unroll_depth, phase_cap, timeout_ms)
        }
        Commands::Verify { file, pre, post, inv, timeout_ms } => {
            cmd_verify(&file, &pre, &post, inv.as_deref(), timeout_ms)
        }
    }
}

fn cmd_vars(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let names = get_vars(&source)?;
    println!("{}", names.join(", "));
    Ok(())
}

fn cmd_synth(
    file: &PathBuf,
    inputs: &[String],
    outputs: &[String],
    with_exprs: bool,
    unroll_depth: Option<usize>,
    phase_cap: Option<usize>,
    timeout_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let inputs = parse_bindings(inputs)?;
    let outputs = parse_bindings(outputs)?;
    let config = build_config(unroll_depth, phase_cap, timeout_ms);

    let outcome = synthesize_with_config(&source, &inputs, &outputs, with_exprs, &config)?;
    match outcome {
        SynthesisOutcome::Completed(program) => {
            println!("{}", program);
            Ok(())
        }
        SynthesisOutcome::NoSolution => {
            println!("solution can't be found");
            std::process::exit(1);
        }
        SynthesisOutcome::Timeout => {
            println!("timeout");
            std::process::exit(1);
        }
    }
}

fn cmd_verify(
    file: &PathBuf,
    pre: &str,
    post: &str,
    inv: Option<&str>,
    timeout_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let ast = parse(&source)?;

    let p = predicate_from_surface(pre)?;
    let q = predicate_from_surface(post)?;
    let linv = match inv {
        Some(text) => predicate_from_surface(text)?,
        None => Rc::new(|_: &SymbolicEnv| Ok(Formula::bool_(true))) as PredicateFn,
    };

    let config = build_config(None, None, timeout_ms);
    match verify_with_config(&p, &ast, &q, &linv, &config)? {
        VerifyOutcome::Valid => {
            println!("true");
            Ok(())
        }
        VerifyOutcome::Invalid(counterexample) => {
            println!("{}", counterexample);
            std::process::exit(1);
        }
    }
}

/// Parses `k=v` pairs into an [`Example`], per `spec.md` §6's `map<string,int>`.
fn parse_bindings(pairs: &[String]) -> Result<Example, Box<dyn std::error::Error>> {
    let mut example: Example = HashMap::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected `name=value`, got `{}`", pair))?;
        let value: i64 = value.parse()?;
        example.insert(name.to_string(), value);
    }
    Ok(example)
}

/// Parses a predicate-expression surface string by reusing C1's grammar:
/// `assert EXPR` is already a valid statement, so wrapping and unwrapping it
/// gets the full arithmetic/relational expression grammar for free.
fn predicate_from_surface(text: &str) -> Result<PredicateFn, Box<dyn std::error::Error>> {
    let wrapped = format!("assert {}", text);
    let stmt = parse(&wrapped)?;
    let expr = match stmt {
        Stmt::Assert(e) => e,
        _ => unreachable!("parsing `assert EXPR` always yields Stmt::Assert"),
    };
    Ok(predicate_from_expr(expr))
}

fn predicate_from_expr(expr: Expr) -> PredicateFn {
    Rc::new(move |env: &SymbolicEnv| {
        let (term, guard) = encode(&expr, env)?;
        Ok(term.and_guard(guard))
    })
}

fn build_config(
    unroll_depth: Option<usize>,
    phase_cap: Option<usize>,
    timeout_ms: Option<u64>,
) -> SynthesisConfig {
    let defaults = SynthesisConfig::default();
    SynthesisConfig {
        unroll_depth: unroll_depth.unwrap_or(defaults.unroll_depth),
        phase_cap: phase_cap.unwrap_or(defaults.phase_cap),
        timeout_ms: timeout_ms.unwrap_or(defaults.timeout_ms),
    }
}
