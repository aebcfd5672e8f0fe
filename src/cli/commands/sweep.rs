//! Sweep command implementation

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Local;
use tracing::{info, warn};

use crate::cli::{SweepArgs, SweepMode};
use crate::client::OllamaClient;
use crate::config::SweepConfig;
use crate::experiment::file_name_for;
use crate::runner::{ExperimentRunner, RecordSink};
use crate::sweep::SweepPlan;

pub fn run_sweep(args: SweepArgs, host: Option<String>) -> anyhow::Result<()> {
    let config = resolve_config(&args, host)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(file_name_for(&Local::now())));
    let plans = plans_for(args.mode, &config);

    let pacer = config.pacer()?;
    let client = OllamaClient::new(&config.host)?;
    let runner = ExperimentRunner::new(client, &config.model, &config.prompt, pacer);
    let mut sink = RecordSink::open(&output, config.flush)
        .with_context(|| format!("cannot continue results file {}", output.display()))?;

    println!("Starting tests. Results will be saved to {}", output.display());
    info!(
        host = %config.host,
        model = %config.model,
        calls = plans.iter().map(SweepPlan::len).sum::<usize>(),
        "sweep configured"
    );

    let summary = runner.run_plans(&plans, &mut sink);
    let (store, saved) = sink.finish();

    if summary.attempted > 0 && summary.succeeded == 0 {
        warn!("every call failed; is the service reachable at {}?", config.host);
    }
    if summary.save_failures > 0 {
        warn!(
            dropped = summary.save_failures,
            "some results could not be written to {} and were dropped",
            output.display()
        );
    }
    if !saved {
        bail!(
            "{} new records could not be written to {}",
            summary.succeeded,
            output.display()
        );
    }

    println!(
        "\nTesting completed. {} of {} calls recorded ({} failed). Results saved to {} ({} records total)",
        summary.succeeded - summary.save_failures,
        summary.attempted,
        summary.failed,
        output.display(),
        store.len()
    );
    Ok(())
}

/// Defaults, then the config file, then flags.
fn resolve_config(args: &SweepArgs, host: Option<String>) -> anyhow::Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::from_json_file(path)?,
        None => SweepConfig::default(),
    };

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(model) = &args.model {
        config.model.clone_from(model);
    }
    if let Some(prompt) = &args.prompt {
        config.prompt.clone_from(prompt);
    }
    if let Some(count) = args.count {
        config.random_count = count;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(delay) = args.delay_secs {
        config.delay_secs = delay;
    }
    if let Some(flush) = args.flush {
        config.flush = flush;
    }

    config.validate()?;
    Ok(config)
}

fn plans_for(mode: SweepMode, config: &SweepConfig) -> Vec<SweepPlan> {
    let random = SweepPlan::random(config.random_count, config.seed);
    match mode {
        SweepMode::Grid => vec![SweepPlan::default_grid()],
        SweepMode::Random => vec![random],
        SweepMode::Full => vec![SweepPlan::default_grid(), random],
    }
}
