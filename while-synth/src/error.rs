//! Driver-level errors: the two lower layers' error types, widened with
//! nothing of their own — the driver's actual failure modes
//! (`NoSolution`, `Timeout`) are represented as `SynthesisOutcome`
//! variants instead, per `spec.md` §7's disposition table, not as `Err`.

use std::fmt;

use while_synth_kernel::{KernelError, ParseError};
use while_synth_verify::VerifyError;

#[derive(Debug)]
pub enum SynthesisError {
    Parse(ParseError),
    Kernel(KernelError),
    Verify(VerifyError),
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::Parse(e) => write!(f, "{}", e),
            SynthesisError::Kernel(e) => write!(f, "{}", e),
            SynthesisError::Verify(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SynthesisError {}

impl From<ParseError> for SynthesisError {
    fn from(e: ParseError) -> Self {
        SynthesisError::Parse(e)
    }
}

impl From<KernelError> for SynthesisError {
    fn from(e: KernelError) -> Self {
        SynthesisError::Kernel(e)
    }
}

impl From<VerifyError> for SynthesisError {
    fn from(e: VerifyError) -> Self {
        SynthesisError::Verify(e)
    }
}
