//! The driver (C8) and verifier (C9): the four public entry points
//! `spec.md` §6 names, composing `while-synth-kernel`'s parser/WP/
//! enumerator with `while-synth-verify`'s Z3 backend.

pub mod config;
pub mod error;

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};

use while_synth_kernel::{
    find_and_replace_holes, parse, preprocess, splice_text, vars, wp, Candidate,
    CandidateEnumerator, Closure, EnvValue, Formula, Stmt, SymbolicEnv,
};
use while_synth_verify::{check_valid_with_timeout, find_model_with_timeout, VerifyErrorKind};

pub use config::SynthesisConfig;
pub use error::SynthesisError;
pub use while_synth_kernel::{KernelError, ParseError};
pub use while_synth_verify::{CounterExample, VerifyError};

/// An input/output example: a partial assignment of program variables to
/// concrete integers, as `spec.md` §6's `map<string,int>`.
pub type Example = HashMap<String, i64>;

/// A first-order predicate over a symbolic environment, as `spec.md` §6
/// describes: "callbacks from an environment ... to a Boolean SMT term."
pub type PredicateFn = Closure;

#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    Completed(String),
    NoSolution,
    Timeout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    Valid,
    Invalid(CounterExample),
}

fn trivially_true() -> PredicateFn {
    Rc::new(|_: &SymbolicEnv| Ok(Formula::bool_(true)))
}

fn predicate_from_example(example: &Example) -> PredicateFn {
    let example = example.clone();
    Rc::new(move |env: &SymbolicEnv| {
        let mut conjunction = Formula::bool_(true);
        for (name, value) in &example {
            let (term, _guard) = env.lookup(name);
            let eq = Formula::bin(while_synth_kernel::FormulaOp::Eq, term, Formula::int(*value));
            conjunction = conjunction.and_guard(eq);
        }
        Ok(conjunction)
    })
}

fn build_env(vars: &[String], holes: &[String], candidate: &Candidate) -> SymbolicEnv {
    let mut env = SymbolicEnv::mk_env(vars.iter().cloned());
    for (hole, elem) in holes.iter().zip(candidate.iter()) {
        env = env.upd(hole.clone(), EnvValue::Lambda(elem.thunk.clone()));
    }
    env
}

/// Names appearing in the parsed program, in first-occurrence order.
pub fn get_vars(source: &str) -> Result<Vec<String>, SynthesisError> {
    let ast = parse(source)?;
    Ok(vars(&ast))
}

/// `spec.md` §4.8's `synthesize`, with the default tunables.
pub fn synthesize(
    source: &str,
    inputs: &Example,
    outputs: &Example,
    with_exprs: bool,
) -> Result<SynthesisOutcome, SynthesisError> {
    synthesize_with_config(source, inputs, outputs, with_exprs, &SynthesisConfig::default())
}

pub fn synthesize_with_config(
    source: &str,
    inputs: &Example,
    outputs: &Example,
    with_exprs: bool,
    config: &SynthesisConfig,
) -> Result<SynthesisOutcome, SynthesisError> {
    let parsed = parse(source)?;
    let (renamed, holes) = find_and_replace_holes(&parsed);
    let unrolled = preprocess(&renamed, config.unroll_depth);

    let hole_set: std::collections::HashSet<&String> = holes.iter().collect();
    let original_vars: Vec<String> =
        vars(&unrolled).into_iter().filter(|v| !hole_set.contains(v)).collect();

    let p = predicate_from_example(inputs);
    let q = predicate_from_example(outputs);
    let linv = trivially_true();
    let wp_closure = wp(&unrolled, q, linv);

    let mut enumerator = CandidateEnumerator::new(original_vars.clone(), holes.clone(), config.phase_cap);

    // `withExprs=false` tries only the single "holes are fresh symbolic
    // constants" candidate — the first the enumerator ever yields.
    let first_try_only = !with_exprs;

    loop {
        let Some(candidate) = enumerator.next() else {
            // The enumerator only runs dry by hitting the phase cap
            // (zero holes aside, which resolves on its first and only
            // candidate before we'd ever observe this).
            info!("synthesis exhausted the candidate search, phase cap {}", config.phase_cap);
            return Ok(if with_exprs { SynthesisOutcome::Timeout } else { SynthesisOutcome::NoSolution });
        };
        let phase = enumerator.phase();

        let env = build_env(&original_vars, &holes, &candidate);

        // Only a candidate's own fresh symbols are real Z3 constants — the
        // hole names themselves never appear in the encoded formula, they're
        // just slots the enumerator filled with a (possibly compound) term.
        let fresh_names: Vec<String> =
            candidate.iter().flat_map(|elem| elem.fresh_names.iter().cloned()).collect();

        let outcome = (|| -> Result<Option<HashMap<String, i64>>, SynthesisError> {
            let wp_formula = wp_closure(&env)?;
            let p_formula = p(&env)?;
            let implication = Formula::forall(original_vars.clone(), p_formula.implies(wp_formula));
            Ok(find_model_with_timeout(&implication, &fresh_names, config.timeout_ms as u32)?)
        })();

        match outcome {
            Ok(Some(model)) => {
                debug!("candidate phase {} is SAT", phase);
                let rendered: HashMap<String, String> = holes
                    .iter()
                    .zip(candidate.iter())
                    .map(|(hole, elem)| (hole.clone(), (elem.render)(&model)))
                    .collect();
                let completed = splice_text(source, &holes, &rendered);
                info!("synthesis completed");
                return Ok(SynthesisOutcome::Completed(completed));
            }
            Ok(None) => {
                debug!("candidate phase {} is UNSAT", phase);
            }
            Err(_) => {
                // A transient solver failure on one candidate disqualifies
                // only that candidate, per `spec.md` §7's SolverException
                // disposition — the search keeps going.
                debug!("candidate phase {} raised a solver exception, skipping", phase);
            }
        }

        if first_try_only {
            info!("withExprs=false and the single candidate failed");
            return Ok(SynthesisOutcome::NoSolution);
        }
    }
}

/// `spec.md` §4.9's `verify`: builds `e = mk_env(vars(ast))`, computes
/// `wp(ast, Q, linv)(e)`, and checks `P(e) ∧ ¬wp(...)` for satisfiability.
pub fn verify(p: &PredicateFn, ast: &Stmt, q: &PredicateFn, linv: &PredicateFn) -> Result<VerifyOutcome, SynthesisError> {
    verify_with_config(p, ast, q, linv, &SynthesisConfig::default())
}

pub fn verify_with_config(
    p: &PredicateFn,
    ast: &Stmt,
    q: &PredicateFn,
    linv: &PredicateFn,
    config: &SynthesisConfig,
) -> Result<VerifyOutcome, SynthesisError> {
    let program_vars = vars(ast);
    let env = SymbolicEnv::mk_env(program_vars.clone());

    let wp_closure = wp(ast, q.clone(), linv.clone());
    let wp_formula = wp_closure(&env)?;
    let p_formula = p(&env)?;
    let implication = p_formula.implies(wp_formula);

    match check_valid_with_timeout(&implication, &program_vars, config.timeout_ms as u32) {
        Ok(()) => Ok(VerifyOutcome::Valid),
        Err(e) => match e.kind {
            VerifyErrorKind::NotValid(counterexample) => Ok(VerifyOutcome::Invalid(counterexample)),
            _ => Err(e.into()),
        },
    }
}

/// `spec.md` §4.9's `synthesizeAndVerify`: synthesize against the example
/// pair, then re-parse the completed source and verify it against the
/// caller's *original* `(P, Q, linv)` — not the example pair that drove
/// synthesis.
pub fn synthesize_and_verify(
    source: &str,
    inputs: &Example,
    outputs: &Example,
    p: &PredicateFn,
    q: &PredicateFn,
    linv: &PredicateFn,
    with_exprs: bool,
) -> Result<(SynthesisOutcome, Option<VerifyOutcome>), SynthesisError> {
    synthesize_and_verify_with_config(
        source,
        inputs,
        outputs,
        p,
        q,
        linv,
        with_exprs,
        &SynthesisConfig::default(),
    )
}

pub fn synthesize_and_verify_with_config(
    source: &str,
    inputs: &Example,
    outputs: &Example,
    p: &PredicateFn,
    q: &PredicateFn,
    linv: &PredicateFn,
    with_exprs: bool,
    config: &SynthesisConfig,
) -> Result<(SynthesisOutcome, Option<VerifyOutcome>), SynthesisError> {
    let outcome = synthesize_with_config(source, inputs, outputs, with_exprs, config)?;
    match &outcome {
        SynthesisOutcome::Completed(completed_source) => {
            let ast = parse(completed_source)?;
            let verdict = verify_with_config(p, &ast, q, linv, config)?;
            Ok((outcome, Some(verdict)))
        }
        SynthesisOutcome::NoSolution | SynthesisOutcome::Timeout => Ok((outcome, None)),
    }
}
