//! The three magic numbers `spec.md` pins, surfaced as overridable fields
//! rather than buried constants — the teacher's pattern of exposing
//! tunables as CLI flags (`apps/logicaffeine_cli`'s `Commands::Verify`)
//! rather than requiring a recompile to change them.

use while_synth_kernel::DEFAULT_UNROLL_DEPTH;

/// The candidate enumerator's default phase cap (`spec.md` §4.7).
pub const DEFAULT_PHASE_CAP: usize = 10;

/// Z3's default per-query timeout, matching the teacher's
/// `logicaffeine_verify::solver::Verifier::new`.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct SynthesisConfig {
    pub unroll_depth: usize,
    pub phase_cap: usize,
    pub timeout_ms: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig {
            unroll_depth: DEFAULT_UNROLL_DEPTH,
            phase_cap: DEFAULT_PHASE_CAP,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
