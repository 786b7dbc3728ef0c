//! The symbolic environment: program-variable name → symbolic integer term.
//!
//! Persistent and clone-on-extend, the same shape as the teacher's
//! `Context::extend` ("creates a new context with the additional binding,
//! preserving the original"). A binding can also be a lazily-resolved
//! thunk, which is how a candidate expression from the enumerator (C7) gets
//! injected at a hole's `id` site without rewriting the AST per candidate.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::formula::Formula;

/// `(value, non_zero_divisor_guard)` — the guard is `true` unless the term
/// was itself built from a `/` candidate, in which case it conjoins the
/// divisor-nonzero condition so it can propagate to the caller the same way
/// a directly-encoded `/` expression would.
pub type GuardedTerm = (Formula, Formula);

#[derive(Clone)]
pub enum EnvValue {
    /// A plain binding; looking it up carries the trivial `true` guard.
    Term(Formula),
    /// A thunk resolved against the environment at lookup time. Used for
    /// hole variables during candidate enumeration and for the fresh
    /// constants introduced by the `while` WP rule.
    Lambda(Rc<dyn Fn(&SymbolicEnv) -> GuardedTerm>),
}

impl fmt::Debug for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Term(t) => write!(f, "Term({:?})", t),
            EnvValue::Lambda(_) => write!(f, "Lambda(..)"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolicEnv {
    bindings: HashMap<String, EnvValue>,
}

impl SymbolicEnv {
    pub fn new() -> Self {
        SymbolicEnv { bindings: HashMap::new() }
    }

    /// `mk_env(names)`: bind each name to a fresh SMT integer constant of
    /// the same name.
    pub fn mk_env<I: IntoIterator<Item = S>, S: Into<String>>(names: I) -> Self {
        let mut bindings = HashMap::new();
        for name in names {
            let name = name.into();
            bindings.insert(name.clone(), EnvValue::Term(Formula::var(name)));
        }
        SymbolicEnv { bindings }
    }

    /// `upd(e, k, v)`: a new environment with `k` rebound, all other
    /// bindings preserved. Does not mutate `self`.
    pub fn upd(&self, key: impl Into<String>, value: EnvValue) -> SymbolicEnv {
        let mut bindings = self.bindings.clone();
        bindings.insert(key.into(), value);
        SymbolicEnv { bindings }
    }

    /// Resolve `name`, evaluating a thunk if that's what is bound.
    pub fn lookup(&self, name: &str) -> GuardedTerm {
        match self.bindings.get(name) {
            Some(EnvValue::Term(term)) => (term.clone(), Formula::bool_(true)),
            Some(EnvValue::Lambda(f)) => f(self),
            // An unbound identifier behaves as its own fresh symbolic
            // constant, matching `mk_env`'s default for any name not yet
            // explicitly reserved (e.g. a variable the example spec never
            // mentions).
            None => (Formula::var(name), Formula::bool_(true)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mk_env_binds_each_name_to_itself() {
        let env = SymbolicEnv::mk_env(vec!["a", "b"]);
        assert_eq!(env.lookup("a"), (Formula::var("a"), Formula::bool_(true)));
    }

    #[test]
    fn upd_does_not_mutate_original() {
        let env = SymbolicEnv::mk_env(vec!["a"]);
        let env2 = env.upd("a", EnvValue::Term(Formula::int(5)));
        assert_eq!(env.lookup("a"), (Formula::var("a"), Formula::bool_(true)));
        assert_eq!(env2.lookup("a"), (Formula::int(5), Formula::bool_(true)));
    }

    #[test]
    fn lambda_binding_resolves_against_current_env() {
        let env = SymbolicEnv::mk_env(vec!["a"]);
        let env = env.upd(
            "hole_0",
            EnvValue::Lambda(Rc::new(|e: &SymbolicEnv| e.lookup("a"))),
        );
        assert_eq!(env.lookup("hole_0"), (Formula::var("a"), Formula::bool_(true)));
    }
}
