//! Command-line interface
//!
//! Argument types live here; each subcommand's handler lives in
//! `commands/`.

mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use commands::run_command;
pub use logging::init_tracing;

use crate::config::{DEFAULT_GENERATE_PROMPT, DEFAULT_MODEL, DEFAULT_TOP_K, DEFAULT_TOP_P};
use crate::params::{TOP_K_MAX, TOP_K_MIN};
use crate::runner::FlushPolicy;

/// Sweep `top_p`/`top_k` against a local generation service and analyze the results
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "topk-sweep")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Generation service base URL [default: http://localhost:11434]
    #[arg(long, env = "TOPK_SWEEP_HOST", global = true)]
    pub host: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate one response and print it as JSON
    Generate(GenerateArgs),

    /// Prompt for model, prompt and sampling parameters, then generate
    Interactive,

    /// Run a parameter sweep and write a results file
    Sweep(SweepArgs),

    /// Summarize a results file per (top_p, top_k)
    Analyze(AnalyzeArgs),
}

/// Arguments for the generate command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    /// Model name to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Text prompt for generation
    #[arg(long, default_value = DEFAULT_GENERATE_PROMPT)]
    pub prompt: String,

    /// Top-p value (0-1). Higher values consider less likely words
    #[arg(long, default_value_t = DEFAULT_TOP_P, value_parser = parse_top_p)]
    pub top_p: f64,

    /// Top-k value (1-100). Limits the words considered at each step
    #[arg(
        long,
        default_value_t = DEFAULT_TOP_K,
        value_parser = clap::value_parser!(u32).range(i64::from(TOP_K_MIN)..=i64::from(TOP_K_MAX))
    )]
    pub top_k: u32,
}

/// Which plans a sweep runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepMode {
    /// The 10 x 5 grid only
    Grid,
    /// Random pairs only
    Random,
    /// Grid, then random pairs, into one file
    #[default]
    Full,
}

impl std::str::FromStr for SweepMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "random" => Ok(Self::Random),
            "full" => Ok(Self::Full),
            _ => Err(format!("Unknown sweep mode: {s}. Valid: grid, random, full")),
        }
    }
}

/// Arguments for the sweep command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct SweepArgs {
    /// Plans to run: grid, random, or full (grid then random)
    #[arg(long, default_value = "full")]
    pub mode: SweepMode,

    /// JSON config file; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Prompt sent with every call
    #[arg(long)]
    pub prompt: Option<String>,

    /// Number of random pairs
    #[arg(long)]
    pub count: Option<usize>,

    /// Seed for reproducible random pairs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seconds to wait after each call
    #[arg(long)]
    pub delay_secs: Option<f64>,

    /// When to write the results file: each or end
    #[arg(long)]
    pub flush: Option<FlushPolicy>,

    /// Results file (default: testtopptopk_<timestamp>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Pretty JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Valid: text, json")),
        }
    }
}

/// Arguments for the analyze command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct AnalyzeArgs {
    /// Results file (default: newest testtopptopk_*.json in the current directory)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

fn parse_top_p(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err("top-p must be between 0 and 1".to_string())
    }
}
