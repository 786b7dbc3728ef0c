//! Weakest-precondition calculator (C5).
//!
//! Each statement compiles down to a `Closure`: a function from a symbolic
//! environment to a formula, exactly the spec's `Q ↦ (e ↦ formula)` shape.
//! Composing WP rules is therefore just composing closures, not walking a
//! tree twice.

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ast::Stmt;
use crate::ast_utils::assigned;
use crate::encode::encode;
use crate::env::{EnvValue, SymbolicEnv};
use crate::error::KernelError;
use crate::formula::Formula;

pub type Closure = Rc<dyn Fn(&SymbolicEnv) -> Result<Formula, KernelError>>;

static FRESH_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn fresh_suffix() -> usize {
    FRESH_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// `wp(stmt, post, linv)`: the weakest precondition of `stmt` with respect
/// to postcondition `post`, using `linv` as the invariant for any `while`
/// nested inside.
pub fn wp(stmt: &Stmt, post: Closure, linv: Closure) -> Closure {
    match stmt {
        Stmt::Skip => post,

        Stmt::Seq(s1, s2) => {
            let inner = wp(s2, post, linv.clone());
            wp(s1, inner, linv)
        }

        Stmt::Assign { target, value } => {
            let target = target.clone();
            let value = value.clone();
            Rc::new(move |e: &SymbolicEnv| {
                let (term, guard) = encode(&value, e)?;
                let e2 = e.upd(target.clone(), EnvValue::Term(term));
                let q = post(&e2)?;
                Ok(guard.and_guard(q))
            })
        }

        Stmt::If { cond, then_branch, else_branch } => {
            let cond = cond.clone();
            let wp_then = wp(then_branch, post.clone(), linv.clone());
            let wp_else = wp(else_branch, post, linv);
            Rc::new(move |e: &SymbolicEnv| {
                let (c, guard) = encode(&cond, e)?;
                let then_case = c.clone().and(wp_then(e)?);
                let else_case = c.not().and(wp_else(e)?);
                Ok(guard.and_guard(then_case.or(else_case)))
            })
        }

        Stmt::Assert(prop) => {
            let prop = prop.clone();
            Rc::new(move |e: &SymbolicEnv| {
                let (phi, guard) = encode(&prop, e)?;
                let q = post(e)?;
                Ok(guard.and_guard(phi.and(q)))
            })
        }

        Stmt::While { cond, body } => {
            let cond = cond.clone();
            let wp_body_linv = wp(body, linv.clone(), linv.clone());
            let fresh_vars: Vec<String> = {
                let mut seen = std::collections::HashSet::new();
                assigned(body).into_iter().filter(|v| seen.insert(v.clone())).collect()
            };
            let suffix = fresh_suffix();
            let fresh_pairs: Vec<(String, String)> =
                fresh_vars.iter().map(|v| (v.clone(), format!("{}__w{}", v, suffix))).collect();
            let fresh_names: Vec<String> = fresh_pairs.iter().map(|(_, f)| f.clone()).collect();

            Rc::new(move |e: &SymbolicEnv| {
                let mut e_prime = e.clone();
                for (orig, fresh) in &fresh_pairs {
                    e_prime = e_prime.upd(orig.clone(), EnvValue::Term(Formula::var(fresh.clone())));
                }

                let (b_e, guard_b_e) = encode(&cond, e)?;
                let (b_eprime, guard_b_eprime) = encode(&cond, &e_prime)?;
                let linv_e = linv(e)?;
                let linv_eprime = linv(&e_prime)?;

                let maintains = (linv_eprime.clone().and(b_eprime.clone()))
                    .implies(wp_body_linv(&e_prime)?);
                let establishes =
                    (linv_eprime.clone().and(b_eprime.clone().not())).implies(post(&e_prime)?);
                let guards_hold = linv_eprime.implies(guard_b_eprime);

                let quantified = Formula::forall(
                    fresh_names.clone(),
                    maintains.and(establishes).and(guards_hold),
                );

                let entered = b_e.clone().implies(linv_e.and(quantified));
                let skipped = b_e.not().implies(post(e)?);

                Ok(guard_b_e.and_guard(entered.and(skipped)))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn const_true() -> Closure {
        Rc::new(|_: &SymbolicEnv| Ok(Formula::bool_(true)))
    }

    #[test]
    fn skip_returns_postcondition_unchanged() {
        let stmt = parse("skip").unwrap();
        let post = const_true();
        let w = wp(&stmt, post, const_true());
        let env = SymbolicEnv::new();
        assert_eq!(w(&env).unwrap(), Formula::bool_(true));
    }

    #[test]
    fn assign_substitutes_into_postcondition() {
        let stmt = parse("a := 6").unwrap();
        // Q(e) = (a == 6), read back through whatever `a` resolves to.
        let post: Closure = Rc::new(|e: &SymbolicEnv| {
            let (a, _) = e.lookup("a");
            Ok(Formula::bin(crate::formula::FormulaOp::Eq, a, Formula::int(6)))
        });
        let w = wp(&stmt, post, const_true());
        let env = SymbolicEnv::mk_env(vec!["a"]);
        let result = w(&env).unwrap();
        // After substitution, "a" in the postcondition resolves to the
        // literal 6, not the free variable — so Q(e[a:=6]) is `6 == 6`.
        assert_eq!(
            result,
            Formula::bin(crate::formula::FormulaOp::Eq, Formula::int(6), Formula::int(6))
        );
    }
}
