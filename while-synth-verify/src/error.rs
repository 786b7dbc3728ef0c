//! Verification error types.
//!
//! Trimmed down from the ambient error style the crate was cloned from:
//! no licensing variants here, since this crate has nothing to license —
//! just the solver-facing failure modes a Hoare-triple check can hit.

use std::fmt;

pub type VerifyResult<T = ()> = Result<T, VerifyError>;

#[derive(Debug)]
pub struct VerifyError {
    pub kind: VerifyErrorKind,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerifyErrorKind {
    /// The triple does not hold; Z3 found a model of the negated implication.
    NotValid(CounterExample),
    /// Z3 returned `unknown` (timeout, or an undecidable fragment).
    SolverUnknown,
    /// A formula did not encode to the sort the caller expected.
    SortMismatch,
}

/// Variable assignments that falsify the checked implication.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterExample {
    pub assignments: Vec<(String, i64)>,
}

impl fmt::Display for CounterExample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.assignments {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", name, value)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            VerifyErrorKind::NotValid(ce) => {
                write!(f, "{}", self.explanation)?;
                if !ce.assignments.is_empty() {
                    write!(f, " (counter-example: {})", ce)?;
                }
                Ok(())
            }
            VerifyErrorKind::SolverUnknown => {
                write!(f, "the solver could not determine validity ({})", self.explanation)
            }
            VerifyErrorKind::SortMismatch => {
                write!(f, "formula did not encode to the expected sort ({})", self.explanation)
            }
        }
    }
}

impl std::error::Error for VerifyError {}

impl VerifyError {
    pub fn not_valid(explanation: impl Into<String>, counterexample: CounterExample) -> Self {
        VerifyError { kind: VerifyErrorKind::NotValid(counterexample), explanation: explanation.into() }
    }

    pub fn solver_unknown(explanation: impl Into<String>) -> Self {
        VerifyError { kind: VerifyErrorKind::SolverUnknown, explanation: explanation.into() }
    }

    pub fn sort_mismatch(explanation: impl Into<String>) -> Self {
        VerifyError { kind: VerifyErrorKind::SortMismatch, explanation: explanation.into() }
    }
}
