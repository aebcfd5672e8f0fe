//! # topk-sweep: sampling-parameter sweeps against a local generation service
//!
//! Calls an Ollama-compatible text-generation service once per
//! `(top_p, top_k)` pair, records the response and wall-clock time of every
//! call in a JSON results store, and aggregates the store into a per-pair
//! report.
//!
//! ## Flow
//!
//! ```text
//! SweepPlan ──> ExperimentRunner ──> RecordSink ──> testtopptopk_*.json ──> AnalysisReport
//!                     │
//!                     └── Generator (OllamaClient over HTTP)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use topk_sweep::client::OllamaClient;
//! use topk_sweep::runner::{ExperimentRunner, FlushPolicy, Pacer, RecordSink};
//! use topk_sweep::sweep::SweepPlan;
//!
//! let client = OllamaClient::new("http://localhost:11434")?;
//! let runner = ExperimentRunner::new(client, "llama3.2", "Write a short story", Pacer::none());
//! let mut sink = RecordSink::open("results.json", FlushPolicy::Each)?;
//!
//! let summary = runner.run_sweep(&SweepPlan::default_grid(), &mut sink);
//! println!("{} of {} calls recorded", summary.succeeded, summary.attempted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod experiment;
pub mod params;
pub mod runner;
pub mod sweep;

pub use error::{Error, Result};
pub use params::SamplingParams;
