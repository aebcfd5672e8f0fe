//! topk-sweep CLI
//!
//! # Usage
//!
//! ```bash
//! # One generation with explicit sampling parameters
//! topk-sweep generate --model llama3.2 --top-p 0.8 --top-k 40
//!
//! # Same, answering prompts on stdin
//! topk-sweep interactive
//!
//! # Grid sweep followed by 10 random pairs into testtopptopk_<timestamp>.json
//! topk-sweep sweep
//!
//! # Reproducible random sweep, written once at the end
//! topk-sweep sweep --mode random --count 25 --seed 7 --flush end -o random.json
//!
//! # Report on the newest results file
//! topk-sweep analyze
//! ```

use clap::Parser;
use std::process::ExitCode;
use topk_sweep::cli::{init_tracing, run_command, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
