//! Expression encoder (C4): AST expression → `(term, guard)`.
//!
//! `guard` is the conjunction of `divisor ≠ 0` for every `/` in the
//! expression. Composite operators propagate the conjunction of their
//! operands' guards; `/` additionally conjoins its own `rhs ≠ 0` condition.
//! The guard is returned, never accumulated in a shared cell — see
//! `env::GuardedTerm` for why a `Lambda` binding needs to be able to do the
//! same.

use crate::ast::Expr;
use crate::env::{GuardedTerm, SymbolicEnv};
use crate::error::KernelError;
use crate::formula::{Formula, FormulaOp};
use crate::token::{ArithOp, RelOp};

pub fn encode(expr: &Expr, env: &SymbolicEnv) -> Result<GuardedTerm, KernelError> {
    match expr {
        Expr::Ident(name) => Ok(env.lookup(name)),
        Expr::Num(n) => Ok((Formula::int(*n), Formula::bool_(true))),
        Expr::Hole => Err(KernelError::UnknownNode("??".to_string())),
        Expr::Arith { op, lhs, rhs } => {
            let (lt, lg) = encode(lhs, env)?;
            let (rt, rg) = encode(rhs, env)?;
            let term = Formula::bin(arith_op(*op), lt, rt.clone());
            let mut guard = lg.and_guard(rg);
            if *op == ArithOp::Div {
                let nonzero = Formula::bin(FormulaOp::NotEq, rt, Formula::int(0));
                guard = guard.and_guard(nonzero);
            }
            Ok((term, guard))
        }
        Expr::Rel { op, lhs, rhs } => {
            let (lt, lg) = encode(lhs, env)?;
            let (rt, rg) = encode(rhs, env)?;
            let term = Formula::bin(rel_op(*op), lt, rt);
            Ok((term, lg.and_guard(rg)))
        }
    }
}

pub(crate) fn arith_op(op: ArithOp) -> FormulaOp {
    match op {
        ArithOp::Add => FormulaOp::Add,
        ArithOp::Sub => FormulaOp::Sub,
        ArithOp::Mul => FormulaOp::Mul,
        ArithOp::Div => FormulaOp::Div,
    }
}

fn rel_op(op: RelOp) -> FormulaOp {
    match op {
        RelOp::Eq => FormulaOp::Eq,
        RelOp::NotEq => FormulaOp::NotEq,
        RelOp::Lt => FormulaOp::Lt,
        RelOp::Gt => FormulaOp::Gt,
        RelOp::LtEq => FormulaOp::LtEq,
        RelOp::GtEq => FormulaOp::GtEq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_has_trivial_guard() {
        let (term, guard) = encode(&Expr::num(5), &SymbolicEnv::new()).unwrap();
        assert_eq!(term, Formula::int(5));
        assert_eq!(guard, Formula::bool_(true));
    }

    #[test]
    fn division_conjoins_nonzero_divisor_guard() {
        let env = SymbolicEnv::mk_env(vec!["a", "b"]);
        let expr = Expr::arith(ArithOp::Div, Expr::ident("a"), Expr::ident("b"));
        let (_, guard) = encode(&expr, &env).unwrap();
        assert_eq!(
            guard,
            Formula::bin(FormulaOp::NotEq, Formula::var("b"), Formula::int(0))
        );
    }

    #[test]
    fn nested_division_guard_propagates_through_relation() {
        let env = SymbolicEnv::mk_env(vec!["a", "b"]);
        let lhs = Expr::arith(ArithOp::Div, Expr::ident("a"), Expr::ident("b"));
        let expr = Expr::rel(RelOp::Eq, lhs, Expr::num(0));
        let (_, guard) = encode(&expr, &env).unwrap();
        assert_eq!(
            guard,
            Formula::bin(FormulaOp::NotEq, Formula::var("b"), Formula::int(0))
        );
    }
}
