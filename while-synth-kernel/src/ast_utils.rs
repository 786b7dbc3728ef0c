//! AST-level operations: variable collection, hole discovery/replacement,
//! and the final pretty-print splice back into the original source text.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::ast::{Expr, Stmt};

/// Names appearing at `id` leaves, in first-occurrence order.
pub fn vars(stmt: &Stmt) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    walk_stmt_vars(stmt, &mut seen, &mut out);
    out
}

fn walk_stmt_vars(stmt: &Stmt, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    match stmt {
        Stmt::Skip => {}
        Stmt::Seq(a, b) => {
            walk_stmt_vars(a, seen, out);
            walk_stmt_vars(b, seen, out);
        }
        Stmt::Assign { target, value } => {
            push_var(target, seen, out);
            walk_expr_vars(value, seen, out);
        }
        Stmt::If { cond, then_branch, else_branch } => {
            walk_expr_vars(cond, seen, out);
            walk_stmt_vars(then_branch, seen, out);
            walk_stmt_vars(else_branch, seen, out);
        }
        Stmt::While { cond, body } => {
            walk_expr_vars(cond, seen, out);
            walk_stmt_vars(body, seen, out);
        }
        Stmt::Assert(e) => walk_expr_vars(e, seen, out),
    }
}

fn walk_expr_vars(expr: &Expr, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    match expr {
        Expr::Ident(name) => push_var(name, seen, out),
        Expr::Num(_) | Expr::Hole => {}
        Expr::Arith { lhs, rhs, .. } | Expr::Rel { lhs, rhs, .. } => {
            walk_expr_vars(lhs, seen, out);
            walk_expr_vars(rhs, seen, out);
        }
    }
}

fn push_var(name: &str, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    if seen.insert(name.to_string()) {
        out.push(name.to_string());
    }
}

/// Names appearing as the left-hand side of `:=` anywhere in `stmt`, as a
/// sequence (a variable assigned three times appears three times).
pub fn assigned(stmt: &Stmt) -> Vec<String> {
    let mut out = Vec::new();
    walk_assigned(stmt, &mut out);
    out
}

fn walk_assigned(stmt: &Stmt, out: &mut Vec<String>) {
    match stmt {
        Stmt::Skip | Stmt::Assert(_) => {}
        Stmt::Seq(a, b) => {
            walk_assigned(a, out);
            walk_assigned(b, out);
        }
        Stmt::Assign { target, .. } => out.push(target.clone()),
        Stmt::If { then_branch, else_branch, .. } => {
            walk_assigned(then_branch, out);
            walk_assigned(else_branch, out);
        }
        Stmt::While { body, .. } => walk_assigned(body, out),
    }
}

/// Left-to-right depth-first replacement of every `??` with a fresh
/// `hole_<k>` identifier, `k` being its discovery order. Returns the
/// rewritten tree and the ordered list of hole names.
pub fn find_and_replace_holes(stmt: &Stmt) -> (Stmt, Vec<String>) {
    let mut counter = 0usize;
    let mut names = Vec::new();
    let rewritten = rewrite_stmt(stmt, &mut counter, &mut names);
    (rewritten, names)
}

fn rewrite_stmt(stmt: &Stmt, counter: &mut usize, names: &mut Vec<String>) -> Stmt {
    match stmt {
        Stmt::Skip => Stmt::Skip,
        Stmt::Seq(a, b) => {
            Stmt::seq(rewrite_stmt(a, counter, names), rewrite_stmt(b, counter, names))
        }
        Stmt::Assign { target, value } => {
            Stmt::Assign { target: target.clone(), value: rewrite_expr(value, counter, names) }
        }
        Stmt::If { cond, then_branch, else_branch } => Stmt::if_then_else(
            rewrite_expr(cond, counter, names),
            rewrite_stmt(then_branch, counter, names),
            rewrite_stmt(else_branch, counter, names),
        ),
        Stmt::While { cond, body } => {
            Stmt::while_do(rewrite_expr(cond, counter, names), rewrite_stmt(body, counter, names))
        }
        Stmt::Assert(e) => Stmt::Assert(rewrite_expr(e, counter, names)),
    }
}

fn rewrite_expr(expr: &Expr, counter: &mut usize, names: &mut Vec<String>) -> Expr {
    match expr {
        Expr::Hole => {
            let name = format!("hole_{}", *counter);
            *counter += 1;
            names.push(name.clone());
            Expr::Ident(name)
        }
        Expr::Ident(_) | Expr::Num(_) => expr.clone(),
        Expr::Arith { op, lhs, rhs } => {
            Expr::arith(*op, rewrite_expr(lhs, counter, names), rewrite_expr(rhs, counter, names))
        }
        Expr::Rel { op, lhs, rhs } => {
            Expr::rel(*op, rewrite_expr(lhs, counter, names), rewrite_expr(rhs, counter, names))
        }
    }
}

/// Replace occurrences of the literal substring `??` in `source`, in
/// left-to-right order, with the resolved value for the corresponding hole.
/// A hole missing from `values` (the model left it unconstrained) splices
/// as `0`, matching the monotonicity-of-hole-defaults property.
pub fn splice(source: &str, hole_names: &[String], values: &HashMap<String, i64>) -> String {
    let mut result = String::with_capacity(source.len());
    let mut rest = source;
    for name in hole_names {
        let Some(idx) = rest.find("??") else {
            break;
        };
        let value = values.get(name).copied().unwrap_or(0);
        result.push_str(&rest[..idx]);
        result.push_str(&value.to_string());
        rest = &rest[idx + 2..];
    }
    result.push_str(rest);
    result
}

/// Like [`splice`], but each hole's replacement is caller-rendered text
/// rather than a bare integer — the driver uses this one, since a hole may
/// resolve to a compound expression (`2*b`) rather than a literal.
pub fn splice_text(source: &str, hole_names: &[String], rendered: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(source.len());
    let mut rest = source;
    for name in hole_names {
        let Some(idx) = rest.find("??") else {
            break;
        };
        let text = rendered.get(name).cloned().unwrap_or_else(|| "0".to_string());
        result.push_str(&rest[..idx]);
        result.push_str(&text);
        rest = &rest[idx + 2..];
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn vars_collects_first_occurrence_order() {
        let ast = parse("a := b; c := a + b").unwrap();
        assert_eq!(vars(&ast), vec!["a", "b", "c"]);
    }

    #[test]
    fn assigned_is_a_sequence_not_a_set() {
        let ast = parse("a := 1; a := 2; b := 3").unwrap();
        assert_eq!(assigned(&ast), vec!["a", "a", "b"]);
    }

    #[test]
    fn find_and_replace_holes_names_in_discovery_order() {
        let ast = parse("a := ??; b := a + a; a := ??").unwrap();
        let (rewritten, holes) = find_and_replace_holes(&ast);
        assert_eq!(holes, vec!["hole_0", "hole_1"]);
        assert_eq!(
            rewritten,
            Stmt::seq(
                Stmt::Assign { target: "a".into(), value: Expr::ident("hole_0") },
                Stmt::seq(
                    Stmt::Assign {
                        target: "b".into(),
                        value: Expr::arith(crate::token::ArithOp::Add, Expr::ident("a"), Expr::ident("a")),
                    },
                    Stmt::Assign { target: "a".into(), value: Expr::ident("hole_1") },
                )
            )
        );
    }

    #[test]
    fn splice_replaces_in_order_and_defaults_unconstrained_to_zero() {
        let source = "a := ??;a := ??; assert a = 6";
        let holes = vec!["hole_0".to_string(), "hole_1".to_string()];
        let mut values = HashMap::new();
        values.insert("hole_1".to_string(), 6);
        assert_eq!(splice(source, &holes, &values), "a := 0;a := 6; assert a = 6");
    }

    #[test]
    fn splice_preserves_whitespace() {
        let source = "a:=2  ; c:= ?? ; assert c= (b * 2)";
        let holes = vec!["hole_0".to_string()];
        let mut values = HashMap::new();
        values.insert("hole_0".to_string(), 0);
        assert_eq!(splice(source, &holes, &values), "a:=2  ; c:= 0 ; assert c= (b * 2)");
    }

    #[test]
    fn splice_text_allows_compound_expression_replacements() {
        let source = "a:=2  ; c:= ?? ; assert c= (b * 2)";
        let holes = vec!["hole_0".to_string()];
        let mut rendered = HashMap::new();
        rendered.insert("hole_0".to_string(), "2*b".to_string());
        assert_eq!(splice_text(source, &holes, &rendered), "a:=2  ; c:= 2*b ; assert c= (b * 2)");
    }
}
