//! Parser, weakest-precondition calculus, and sketch-candidate enumerator
//! for a small imperative language with integer variables, conditionals,
//! loops, assertions, and synthesis holes (`??`).
//!
//! This crate never touches an SMT solver. It owns the AST, the WP rules,
//! and a solver-independent `Formula` IR; `while-synth-verify` is the only
//! crate that encodes a `Formula` into an actual Z3 query and solves it —
//! the same separation the teacher draws between its interpreter AST and
//! its verification IR, just inverted (here the front end, not the back
//! end, is solver-agnostic).

pub mod ast;
pub mod ast_utils;
pub mod encode;
pub mod enumerate;
pub mod env;
pub mod error;
pub mod formula;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod unroll;
pub mod wp;

pub use ast::{Expr, Stmt};
pub use ast_utils::{assigned, find_and_replace_holes, splice, splice_text, vars};
pub use encode::encode;
pub use enumerate::{Candidate, CandidateElem, CandidateEnumerator, CandidateThunk, Renderer};
pub use env::{EnvValue, GuardedTerm, SymbolicEnv};
pub use error::{KernelError, ParseError, ParseErrorKind, ParseResult};
pub use formula::{Formula, FormulaOp};
pub use parser::parse;
pub use unroll::{preprocess, unroll, DEFAULT_UNROLL_DEPTH};
pub use wp::{wp, Closure};
