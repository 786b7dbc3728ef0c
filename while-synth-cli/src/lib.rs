//! `wsynth`: a thin CLI over the [`while_synth`] driver crate.

pub mod cli;

pub use cli::run_cli;
