//! Experiment runner: one timed call per parameter pair
//!
//! A sweep is a sequence of single calls. Every attempt is followed by the
//! pacing delay; a failed call is logged and skipped, never fatal.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::client::{GenerateRequest, Generator};
use crate::experiment::{ExperimentRecord, ResultsStore};
use crate::params::SamplingParams;
use crate::sweep::SweepPlan;
use crate::Result;

/// Fixed delay between generation calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    /// Sleep for `delay` after every call.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Block for the configured delay.
    pub fn wait(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

/// When the in-memory store is written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushPolicy {
    /// Rewrite the file after every successful record
    #[default]
    Each,
    /// Write once when the run finishes
    End,
}

impl std::str::FromStr for FlushPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "each" => Ok(Self::Each),
            "end" => Ok(Self::End),
            _ => Err(format!("Unknown flush policy: {s}. Valid: each, end")),
        }
    }
}

/// Destination for records produced by a sweep.
///
/// Owns the in-memory store and writes it out whole according to the
/// [`FlushPolicy`]. A failed write is logged and not retried: under
/// [`FlushPolicy::Each`] the record that could not be written is dropped, so
/// later writes carry only records that were already on disk plus their own.
#[derive(Debug)]
pub struct RecordSink {
    store: ResultsStore,
    path: PathBuf,
    policy: FlushPolicy,
    dirty: bool,
}

impl RecordSink {
    /// Open a sink on `path`, continuing an existing store if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DataLoad`] if `path` exists but is not a
    /// readable store.
    pub fn open(path: impl Into<PathBuf>, policy: FlushPolicy) -> Result<Self> {
        let path = path.into();
        let store = ResultsStore::load_or_default(&path)?;
        Ok(Self {
            store,
            path,
            policy,
            dirty: false,
        })
    }

    /// Store file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records accumulated so far, including any loaded at open.
    #[must_use]
    pub const fn store(&self) -> &ResultsStore {
        &self.store
    }

    /// Append a record, flushing if the policy says so.
    ///
    /// Returns `false` if the write failed; the record is then discarded.
    pub fn append(&mut self, record: ExperimentRecord) -> bool {
        self.store.push(record);
        match self.policy {
            FlushPolicy::Each => {
                if self.write() {
                    true
                } else {
                    self.store.pop();
                    false
                }
            }
            FlushPolicy::End => {
                self.dirty = true;
                true
            }
        }
    }

    /// Write pending records. Returns `false` if the write failed.
    pub fn flush(&mut self) -> bool {
        if !self.dirty {
            return true;
        }
        let saved = self.write();
        self.dirty = false;
        saved
    }

    fn write(&self) -> bool {
        match self.store.save(&self.path) {
            Ok(()) => true,
            Err(e) => {
                error!(path = %self.path.display(), "Error saving results: {e}");
                false
            }
        }
    }

    /// Flush anything pending and hand back the store.
    pub fn finish(mut self) -> (ResultsStore, bool) {
        let saved = self.flush();
        (self.store, saved)
    }
}

/// Counters for one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Calls issued
    pub attempted: usize,
    /// Calls that produced a record
    pub succeeded: usize,
    /// Calls that failed and were skipped
    pub failed: usize,
    /// Flushes that failed
    pub save_failures: usize,
}

impl SweepSummary {
    fn absorb(&mut self, other: Self) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.save_failures += other.save_failures;
    }
}

/// Runs timed generation calls against one model and prompt.
pub struct ExperimentRunner<G> {
    generator: G,
    model: String,
    prompt: String,
    pacer: Pacer,
}

impl<G: Generator> ExperimentRunner<G> {
    /// Create a runner.
    #[must_use]
    pub fn new(
        generator: G,
        model: impl Into<String>,
        prompt: impl Into<String>,
        pacer: Pacer,
    ) -> Self {
        Self {
            generator,
            model: model.into(),
            prompt: prompt.into(),
            pacer,
        }
    }

    /// Model identifier used for every call.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Prompt used for every call.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Perform exactly one generation call and time it.
    ///
    /// # Errors
    ///
    /// Propagates the generator's error; no record is produced.
    pub fn run_once(&self, params: SamplingParams) -> Result<ExperimentRecord> {
        let request = GenerateRequest::new(&self.model, &self.prompt, params);

        let start = Instant::now();
        let reply = self.generator.generate(&request)?;
        let processing_time = start.elapsed().as_secs_f64();

        Ok(ExperimentRecord::new(
            &self.model,
            &self.prompt,
            params,
            processing_time,
            reply.response,
        ))
    }

    /// Run every pair of `plan` in order, appending successes to `sink`.
    pub fn run_sweep(&self, plan: &SweepPlan, sink: &mut RecordSink) -> SweepSummary {
        info!(plan = plan.name(), calls = plan.len(), "starting sweep");
        let mut summary = SweepSummary::default();

        for params in plan.combinations() {
            summary.attempted += 1;
            match self.run_once(params) {
                Ok(record) => {
                    let elapsed = record.processing_time();
                    if !sink.append(record) {
                        summary.save_failures += 1;
                    }
                    summary.succeeded += 1;
                    info!(
                        "Tested ({}): top_p={:.2}, top_k={} in {elapsed:.2}s",
                        plan.name(),
                        params.top_p,
                        params.top_k
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        top_p = params.top_p,
                        top_k = params.top_k,
                        "Skipping sample: {e}"
                    );
                }
            }
            self.pacer.wait();
        }

        info!(
            plan = plan.name(),
            succeeded = summary.succeeded,
            failed = summary.failed,
            "sweep finished"
        );
        summary
    }

    /// Run several plans back to back into the same sink.
    pub fn run_plans(&self, plans: &[SweepPlan], sink: &mut RecordSink) -> SweepSummary {
        let mut total = SweepSummary::default();
        for plan in plans {
            total.absorb(self.run_sweep(plan, sink));
        }
        total
    }
}
