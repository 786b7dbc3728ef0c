//! The While-language AST.
//!
//! Unlike the natural-language front-end this crate is descended from, the
//! grammar here is small and unambiguous, so nodes are owned, freely
//! `Clone`-able trees rather than arena-allocated slices: hole substitution
//! (see `ast_utils::find_and_replace_holes`) rewrites a tree functionally and
//! needs to produce new nodes rather than mutate borrowed ones in place.

use crate::token::{ArithOp, RelOp};

/// A statement, matching grammar rule `S1` (plus `;` for sequencing, folded
/// into `Seq`).
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Skip,
    Seq(Box<Stmt>, Box<Stmt>),
    /// `id := E`. The grammar guarantees a single identifier on the left.
    Assign { target: String, value: Expr },
    If { cond: Expr, then_branch: Box<Stmt>, else_branch: Box<Stmt> },
    While { cond: Expr, body: Box<Stmt> },
    Assert(Expr),
}

/// An expression. `if`/`while` conditions are always `Rel`; arithmetic
/// expressions never appear directly as a condition (the grammar's `E0 op E0`
/// production only ever produces one of the two, never both for the same
/// node — relational and arithmetic operators share a token class in the
/// source grammar but are distinguished here at the type level, matching the
/// spec's own invariant that "if/while conditions are relational").
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Num(i64),
    /// A `??` hole, before `find_and_replace_holes` rewrites it away.
    Hole,
    Arith { op: ArithOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Rel { op: RelOp, lhs: Box<Expr>, rhs: Box<Expr> },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn num(n: i64) -> Self {
        Expr::Num(n)
    }

    pub fn arith(op: ArithOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Arith { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    pub fn rel(op: RelOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Rel { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }
}

impl Stmt {
    pub fn seq(a: Stmt, b: Stmt) -> Self {
        Stmt::Seq(Box::new(a), Box::new(b))
    }

    pub fn if_then_else(cond: Expr, then_branch: Stmt, else_branch: Stmt) -> Self {
        Stmt::If { cond, then_branch: Box::new(then_branch), else_branch: Box::new(else_branch) }
    }

    pub fn while_do(cond: Expr, body: Stmt) -> Self {
        Stmt::While { cond, body: Box::new(body) }
    }
}
