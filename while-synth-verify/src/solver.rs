//! Encodes a solver-independent [`Formula`] into a Z3 query and discharges
//! it.
//!
//! Two entry points cover the two things the rest of the workspace needs:
//! [`check_valid`] (is `formula` true under every assignment — the Hoare
//! triple check) and [`find_model`] (is `formula` satisfiable, and if so
//! what does a witnessing model look like — sketch synthesis, where the
//! holes are free symbols in an otherwise-quantified implication).
//!
//! The encoder mirrors the shape of the ambient Z3 wrapper this crate was
//! adapted from (`Dynamic`-typed encode, `and`/`or` as context-level
//! associated functions, `._eq`/`.implies`/`.not` as instance methods), with
//! two corrections: every [`Formula::Var`] is integer-sorted (this
//! language has no boolean program variables, so there's no type table to
//! consult), and [`Formula::ForAll`] is encoded with a real quantifier via
//! `z3::ast::forall_const` rather than dropped.

use std::collections::HashMap;

use while_synth_kernel::{Formula, FormulaOp};
use z3::ast::{forall_const, Ast, Bool, Dynamic, Int};
use z3::{Config, Context, SatResult, Solver};

use crate::error::{CounterExample, VerifyError, VerifyResult};

pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

fn context_with_timeout(timeout_ms: u32) -> Context {
    let mut cfg = Config::new();
    cfg.set_param_value("timeout", &timeout_ms.to_string());
    Context::new(&cfg)
}

struct Encoder<'ctx> {
    ctx: &'ctx Context,
}

impl<'ctx> Encoder<'ctx> {
    fn new(ctx: &'ctx Context) -> Self {
        Encoder { ctx }
    }

    fn encode(&self, formula: &Formula) -> Dynamic<'ctx> {
        match formula {
            Formula::Int(n) => Dynamic::from_ast(&Int::from_i64(self.ctx, *n)),
            Formula::Bool(b) => Dynamic::from_ast(&Bool::from_bool(self.ctx, *b)),
            Formula::Var(name) => Dynamic::from_ast(&Int::new_const(self.ctx, name.as_str())),
            Formula::Not(inner) => {
                let i = self.encode(inner);
                match i.as_bool() {
                    Some(b) => Dynamic::from_ast(&b.not()),
                    None => i,
                }
            }
            Formula::Bin { op, lhs, rhs } => {
                let l = self.encode(lhs);
                let r = self.encode(rhs);
                self.encode_binary(*op, l, r)
            }
            Formula::ForAll { vars, body } => {
                let bounds: Vec<Int<'ctx>> =
                    vars.iter().map(|name| Int::new_const(self.ctx, name.as_str())).collect();
                let bound_refs: Vec<&dyn Ast<'ctx>> =
                    bounds.iter().map(|b| b as &dyn Ast<'ctx>).collect();
                let body_bool = self
                    .encode(body)
                    .as_bool()
                    .unwrap_or_else(|| Bool::from_bool(self.ctx, true));
                Dynamic::from_ast(&forall_const(self.ctx, &bound_refs, &[], &body_bool))
            }
        }
    }

    fn encode_binary(&self, op: FormulaOp, l: Dynamic<'ctx>, r: Dynamic<'ctx>) -> Dynamic<'ctx> {
        match op {
            FormulaOp::Add => Dynamic::from_ast(&(int(&l) + int(&r))),
            FormulaOp::Sub => Dynamic::from_ast(&(int(&l) - int(&r))),
            FormulaOp::Mul => Dynamic::from_ast(&(int(&l) * int(&r))),
            FormulaOp::Div => Dynamic::from_ast(&(int(&l) / int(&r))),
            FormulaOp::Eq => Dynamic::from_ast(&l._eq(&r)),
            FormulaOp::NotEq => Dynamic::from_ast(&l._eq(&r).not()),
            FormulaOp::Lt => Dynamic::from_ast(&int(&l).lt(&int(&r))),
            FormulaOp::Gt => Dynamic::from_ast(&int(&l).gt(&int(&r))),
            FormulaOp::LtEq => Dynamic::from_ast(&int(&l).le(&int(&r))),
            FormulaOp::GtEq => Dynamic::from_ast(&int(&l).ge(&int(&r))),
            FormulaOp::And => Dynamic::from_ast(&Bool::and(self.ctx, &[&bool_(&l), &bool_(&r)])),
            FormulaOp::Or => Dynamic::from_ast(&Bool::or(self.ctx, &[&bool_(&l), &bool_(&r)])),
            FormulaOp::Implies => Dynamic::from_ast(&bool_(&l).implies(&bool_(&r))),
        }
    }
}

fn int<'ctx>(d: &Dynamic<'ctx>) -> Int<'ctx> {
    d.as_int().expect("arithmetic operand did not encode to Int")
}

fn bool_<'ctx>(d: &Dynamic<'ctx>) -> Bool<'ctx> {
    d.as_bool().expect("logical operand did not encode to Bool")
}

fn extract_model<'ctx>(
    ctx: &'ctx Context,
    model: &z3::Model<'ctx>,
    names: &[String],
) -> HashMap<String, i64> {
    let mut values = HashMap::new();
    for name in names {
        let term = Int::new_const(ctx, name.as_str());
        // `model_completion = false`: an unconstrained term evaluates back to
        // itself rather than an arbitrary concrete witness, which is exactly
        // how we distinguish "genuinely forced to this value" from
        // "unconstrained, caller should pick a default".
        if let Some(evaluated) = model.eval(&term, false) {
            if let Some(v) = evaluated.as_i64() {
                values.insert(name.clone(), v);
            }
        }
    }
    values
}

/// Checks that `formula` holds under every assignment of its free
/// variables, i.e. that `formula` is valid. Internally this checks that
/// `not(formula)` is unsatisfiable; if it's satisfiable, the witnessing
/// model becomes a counter-example over `report_vars`.
pub fn check_valid(formula: &Formula, report_vars: &[String]) -> VerifyResult<()> {
    check_valid_with_timeout(formula, report_vars, DEFAULT_TIMEOUT_MS)
}

pub fn check_valid_with_timeout(
    formula: &Formula,
    report_vars: &[String],
    timeout_ms: u32,
) -> VerifyResult<()> {
    let ctx = context_with_timeout(timeout_ms);
    let solver = Solver::new(&ctx);
    let encoder = Encoder::new(&ctx);

    let encoded = encoder.encode(formula);
    let assertion = encoded
        .as_bool()
        .ok_or_else(|| VerifyError::sort_mismatch("top-level formula is not boolean"))?;

    solver.assert(&assertion.not());

    match solver.check() {
        SatResult::Unsat => Ok(()),
        SatResult::Sat => {
            let model = solver
                .get_model()
                .ok_or_else(|| VerifyError::solver_unknown("solver reported sat with no model"))?;
            let assignments = extract_model(&ctx, &model, report_vars).into_iter().collect();
            Err(VerifyError::not_valid(
                "the triple does not hold for every assignment",
                CounterExample { assignments },
            ))
        }
        SatResult::Unknown => Err(VerifyError::solver_unknown(solver.get_reason_unknown().unwrap_or_default())),
    }
}

/// Checks whether `formula` is satisfiable and, if so, returns a witnessing
/// assignment for `extract_vars` (the fresh symbols a sketch candidate
/// actually introduced, not the hole names themselves — a hole's chosen
/// candidate may be a compound expression with no symbol named after the
/// hole at all). A name absent from the returned map was left unconstrained
/// by the model — the caller renders its default text for that case.
pub fn find_model(
    formula: &Formula,
    extract_vars: &[String],
) -> VerifyResult<Option<HashMap<String, i64>>> {
    find_model_with_timeout(formula, extract_vars, DEFAULT_TIMEOUT_MS)
}

pub fn find_model_with_timeout(
    formula: &Formula,
    extract_vars: &[String],
    timeout_ms: u32,
) -> VerifyResult<Option<HashMap<String, i64>>> {
    let ctx = context_with_timeout(timeout_ms);
    let solver = Solver::new(&ctx);
    let encoder = Encoder::new(&ctx);

    let encoded = encoder.encode(formula);
    let assertion = encoded
        .as_bool()
        .ok_or_else(|| VerifyError::sort_mismatch("top-level formula is not boolean"))?;

    solver.assert(&assertion);

    match solver.check() {
        SatResult::Unsat => Ok(None),
        SatResult::Sat => {
            let model = solver
                .get_model()
                .ok_or_else(|| VerifyError::solver_unknown("solver reported sat with no model"))?;
            Ok(Some(extract_model(&ctx, &model, extract_vars)))
        }
        SatResult::Unknown => Err(VerifyError::solver_unknown(solver.get_reason_unknown().unwrap_or_default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_equality_has_no_counterexample() {
        let f = Formula::bin(FormulaOp::Eq, Formula::int(6), Formula::int(6));
        assert!(check_valid(&f, &[]).is_ok());
    }

    #[test]
    fn invalid_formula_yields_counterexample() {
        let f = Formula::bin(FormulaOp::Gt, Formula::var("x"), Formula::int(5));
        let err = check_valid(&f, &["x".to_string()]).unwrap_err();
        match err.kind {
            crate::error::VerifyErrorKind::NotValid(ce) => {
                let x = ce.assignments.iter().find(|(n, _)| n == "x").unwrap().1;
                assert!(x <= 5);
            }
            other => panic!("expected NotValid, got {:?}", other),
        }
    }

    #[test]
    fn find_model_solves_for_a_satisfying_fresh_symbol_value() {
        let f = Formula::bin(FormulaOp::Eq, Formula::var("hole_0_0"), Formula::int(6));
        let model = find_model(&f, &["hole_0_0".to_string()]).unwrap().unwrap();
        assert_eq!(model.get("hole_0_0"), Some(&6));
    }

    #[test]
    fn find_model_leaves_unconstrained_holes_absent() {
        let f = Formula::bin(FormulaOp::Eq, Formula::var("x"), Formula::int(6));
        let model = find_model(&f, &["hole_0_0".to_string()]).unwrap().unwrap();
        assert!(model.get("hole_0_0").is_none());
    }

    #[test]
    fn forall_quantified_falsehood_is_unsat_to_find() {
        let body = Formula::bin(FormulaOp::Lt, Formula::var("v"), Formula::int(0));
        let f = Formula::forall(vec!["v".to_string()], body);
        assert!(find_model(&f, &[]).unwrap().is_none());
    }
}
