//! Z3 encoding and solving for the solver-independent `Formula` IR defined
//! in `while-synth-kernel`. This is the only crate in the workspace that
//! links against Z3.

pub mod error;
pub mod solver;

pub use error::{CounterExample, VerifyError, VerifyErrorKind, VerifyResult};
pub use solver::{
    check_valid, check_valid_with_timeout, find_model, find_model_with_timeout, DEFAULT_TIMEOUT_MS,
};
