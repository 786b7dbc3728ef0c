//! Candidate enumerator (C7).
//!
//! Produces a lazy sequence of hole-substitution vectors: phase 0 is atoms
//! (a fresh symbolic integer or an alias of a program variable, per hole);
//! phase `k+1` combines phase `k` with a freshly-regenerated phase 0 via
//! `+ - * /`. A global phase cap bounds the search.
//!
//! Each choice carries, alongside the SMT thunk the solver queries, its own
//! fresh-symbol names and a renderer that turns a model (fresh name -> value)
//! into the source text to splice back in — `hole_0_0 * b` resolving its
//! fresh constant to `2` renders as `2*b`, matching how the candidate was
//! built, not how Z3 happens to print an expression back.
//!
//! Per-hole candidate lists are cartesian-producted across holes with
//! `itertools` — a combinatorial-generation need the teacher repo never has
//! occasion for, borrowed from the pack's `metamath-knife`-style usage of
//! the same crate for proof-search enumeration.

use std::collections::HashMap;
use std::rc::Rc;

use itertools::Itertools;

use crate::encode::arith_op;
use crate::env::{GuardedTerm, SymbolicEnv};
use crate::formula::{Formula, FormulaOp};
use crate::token::ArithOp;

pub type CandidateThunk = Rc<dyn Fn(&SymbolicEnv) -> GuardedTerm>;
pub type Renderer = Rc<dyn Fn(&HashMap<String, i64>) -> String>;

/// One hole's chosen expression: the SMT-facing thunk, the names of the
/// fresh symbols it introduced (the only ones the model needs to bind), and
/// the text renderer for splicing the solved expression back into source.
#[derive(Clone)]
pub struct CandidateElem {
    pub thunk: CandidateThunk,
    pub fresh_names: Vec<String>,
    pub render: Renderer,
}

/// One substitution vector, one element per hole, in hole-declaration order.
pub type Candidate = Vec<CandidateElem>;

fn fresh_atom(name: String) -> CandidateElem {
    let for_thunk = name.clone();
    let for_render = name.clone();
    CandidateElem {
        thunk: Rc::new(move |_: &SymbolicEnv| (Formula::var(for_thunk.clone()), Formula::bool_(true))),
        fresh_names: vec![name],
        render: Rc::new(move |model: &HashMap<String, i64>| {
            model.get(&for_render).map(|v| v.to_string()).unwrap_or_else(|| "0".to_string())
        }),
    }
}

fn var_alias(name: String) -> CandidateElem {
    let for_thunk = name.clone();
    let for_render = name;
    CandidateElem {
        thunk: Rc::new(move |env: &SymbolicEnv| env.lookup(&for_thunk)),
        fresh_names: Vec::new(),
        render: Rc::new(move |_model: &HashMap<String, i64>| for_render.clone()),
    }
}

/// Phase-0 atoms for a single hole: itself as a fresh constant (tried
/// first, so `withExprs=false` can just take the first whole-vector
/// candidate), or each program variable in turn.
fn phase0_for_hole(hole: &str, phase_index: usize, vars: &[String]) -> Vec<CandidateElem> {
    let mut choices = vec![fresh_atom(format!("{}_{}", hole, phase_index))];
    choices.extend(vars.iter().cloned().map(var_alias));
    choices
}

fn op_char(op: ArithOp) -> char {
    match op {
        ArithOp::Add => '+',
        ArithOp::Sub => '-',
        ArithOp::Mul => '*',
        ArithOp::Div => '/',
    }
}

fn combine(a: CandidateElem, b: CandidateElem, op: ArithOp) -> CandidateElem {
    let thunk_a = a.thunk.clone();
    let thunk_b = b.thunk.clone();
    let thunk: CandidateThunk = Rc::new(move |env: &SymbolicEnv| {
        let (ta, ga) = thunk_a(env);
        let (tb, gb) = thunk_b(env);
        let term = Formula::bin(arith_op(op), ta, tb.clone());
        let mut guard = ga.and_guard(gb);
        if op == ArithOp::Div {
            guard = guard.and_guard(Formula::bin(FormulaOp::NotEq, tb, Formula::int(0)));
        }
        (term, guard)
    });

    let mut fresh_names = a.fresh_names.clone();
    fresh_names.extend(b.fresh_names.clone());

    let render_a = a.render.clone();
    let render_b = b.render.clone();
    let ch = op_char(op);
    let render: Renderer =
        Rc::new(move |model: &HashMap<String, i64>| format!("{}{}{}", render_a(model), ch, render_b(model)));

    CandidateElem { thunk, fresh_names, render }
}

fn next_phase_for_hole(
    hole: &str,
    phase_k: &[CandidateElem],
    phase_index: usize,
    vars: &[String],
) -> Vec<CandidateElem> {
    let phase0 = phase0_for_hole(hole, phase_index, vars);
    let mut out = Vec::with_capacity(phase_k.len() * phase0.len() * 4);
    for a in phase_k {
        for b in &phase0 {
            for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div] {
                out.push(combine(a.clone(), b.clone(), op));
            }
        }
    }
    out
}

/// The cartesian product over zero hole-choice-lists is the single empty
/// candidate, matching the vacuous-product convention `itertools` follows —
/// a hole-free program still needs exactly one (trivial) candidate tried.
fn cartesian_product_over(per_hole: &[Vec<CandidateElem>]) -> Box<dyn Iterator<Item = Candidate>> {
    let iters: Vec<_> = per_hole.iter().map(|v| v.clone().into_iter()).collect();
    Box::new(iters.into_iter().multi_cartesian_product())
}

/// Lazily walks phase 0, 1, 2, ... up to `phase_cap` inclusive, yielding one
/// whole-vector candidate at a time.
pub struct CandidateEnumerator {
    vars: Vec<String>,
    holes: Vec<String>,
    phase_cap: usize,
    phase_index: usize,
    current_phase: Vec<Vec<CandidateElem>>,
    inner: Box<dyn Iterator<Item = Candidate>>,
}

impl CandidateEnumerator {
    pub fn new(vars: Vec<String>, holes: Vec<String>, phase_cap: usize) -> Self {
        let current_phase: Vec<Vec<CandidateElem>> =
            holes.iter().map(|h| phase0_for_hole(h, 0, &vars)).collect();
        let inner = cartesian_product_over(&current_phase);
        CandidateEnumerator { vars, holes, phase_cap, phase_index: 0, current_phase, inner }
    }

    /// The current phase index the next-yielded candidate belongs to.
    pub fn phase(&self) -> usize {
        self.phase_index
    }
}

impl Iterator for CandidateEnumerator {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(candidate) = self.inner.next() {
                return Some(candidate);
            }
            if self.holes.is_empty() {
                return None;
            }
            self.phase_index += 1;
            if self.phase_index > self.phase_cap {
                return None;
            }
            self.current_phase = self
                .holes
                .iter()
                .zip(self.current_phase.iter())
                .map(|(hole, phase_k)| next_phase_for_hole(hole, phase_k, self.phase_index, &self.vars))
                .collect();
            self.inner = cartesian_product_over(&self.current_phase);
        }
    }
}
