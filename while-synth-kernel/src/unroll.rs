//! Loop unroller (C6).
//!
//! Turns `while b do s` into a `K`-deep nested `if` cascade, retaining the
//! original `while` as an (ideally unreachable) residual in the innermost
//! branch. Used as a proxy for sound example-driven synthesis when no loop
//! invariant is supplied — see the WP calculator's `while` rule for the
//! invariant-based alternative.

use crate::ast::Stmt;

pub const DEFAULT_UNROLL_DEPTH: usize = 7;

/// `unroll(while b do s, K)`.
pub fn unroll(cond: &crate::ast::Expr, body: &Stmt, depth: usize) -> Stmt {
    let residual = Stmt::while_do(cond.clone(), body.clone());
    let mut current = residual;
    for _ in 0..depth {
        current = Stmt::if_then_else(
            cond.clone(),
            Stmt::seq(body.clone(), current),
            Stmt::Skip,
        );
    }
    current
}

/// Applies `unroll` recursively to every `while` in `stmt`, innermost first,
/// before weakest-precondition generation.
pub fn preprocess(stmt: &Stmt, depth: usize) -> Stmt {
    match stmt {
        Stmt::Skip => Stmt::Skip,
        Stmt::Seq(a, b) => Stmt::seq(preprocess(a, depth), preprocess(b, depth)),
        Stmt::Assign { target, value } => {
            Stmt::Assign { target: target.clone(), value: value.clone() }
        }
        Stmt::If { cond, then_branch, else_branch } => Stmt::if_then_else(
            cond.clone(),
            preprocess(then_branch, depth),
            preprocess(else_branch, depth),
        ),
        Stmt::While { cond, body } => {
            let body = preprocess(body, depth);
            unroll(cond, &body, depth)
        }
        Stmt::Assert(e) => Stmt::Assert(e.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn unroll_depth_one_exposes_body_once() {
        let ast = parse("while b > 0 do a := a - 1").unwrap();
        let (cond, body) = match &ast {
            Stmt::While { cond, body } => (cond, body.as_ref()),
            _ => unreachable!(),
        };
        let unrolled = unroll(cond, body, 1);
        let expected = Stmt::if_then_else(
            cond.clone(),
            Stmt::seq(body.clone(), ast.clone()),
            Stmt::Skip,
        );
        assert_eq!(unrolled, expected);
    }

    #[test]
    fn preprocess_recurses_into_sequence_and_if() {
        let ast = parse("b:=2;while b >0 do (n:=b; b:= b - 1)").unwrap();
        let processed = preprocess(&ast, 1);
        // The second statement of the sequence should now be an `if`, not
        // a `while` — exactly one level of unrolling deep.
        if let Stmt::Seq(_, second) = &processed {
            assert!(matches!(second.as_ref(), Stmt::If { .. }));
        } else {
            panic!("expected a sequence");
        }
    }
}
