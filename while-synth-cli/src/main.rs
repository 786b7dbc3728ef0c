//! `wsynth` — standalone binary entry point.
//!
//! Thin wrapper around [`while_synth_cli::run_cli`], handling error display
//! and exit codes. All command logic lives in the library crate.
//!
//! # Exit Codes
//!
//! - `0` - success
//! - `1` - error (message printed to stderr)

fn main() {
    env_logger::init();
    if let Err(e) = while_synth_cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
