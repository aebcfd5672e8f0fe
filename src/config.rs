//! Run configuration
//!
//! Defaults reproduce the stock experiment: `llama3.2` on a local service,
//! a 100-120 word story prompt, two seconds between calls. A JSON file can
//! override any subset of fields; CLI flags override both.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_HOST;
use crate::runner::{FlushPolicy, Pacer};
use crate::sweep::DEFAULT_RANDOM_COUNT;
use crate::{Error, Result};

/// Default model identifier
pub const DEFAULT_MODEL: &str = "llama3.2";
/// Prompt used by sweeps
pub const DEFAULT_SWEEP_PROMPT: &str =
    "Write a story between 100-120 words about a robot learning to paint";
/// Prompt used by single generations
pub const DEFAULT_GENERATE_PROMPT: &str = "write 100 words about why humans are awesome";
/// Default `top_p` for single generations
pub const DEFAULT_TOP_P: f64 = 0.9;
/// Default `top_k` for single generations
pub const DEFAULT_TOP_K: u32 = 50;
/// Default pause between sweep calls, in seconds
pub const DEFAULT_DELAY_SECS: f64 = 2.0;

/// Settings for a sweep run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Generation service base URL
    pub host: String,
    /// Model identifier
    pub model: String,
    /// Prompt sent with every call
    pub prompt: String,
    /// Pause after each call, in seconds
    pub delay_secs: f64,
    /// When the results file is written
    pub flush: FlushPolicy,
    /// Pairs drawn by a random sweep
    pub random_count: usize,
    /// Seed for the random sweep
    pub seed: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_SWEEP_PROMPT.to_string(),
            delay_secs: DEFAULT_DELAY_SECS,
            flush: FlushPolicy::default(),
            random_count: DEFAULT_RANDOM_COUNT,
            seed: None,
        }
    }
}

impl SweepConfig {
    /// Read a config file; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed, or
    /// the resulting config is invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values a sweep cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            return Err(Error::Config(format!(
                "delay_secs must be a non-negative number (got {})",
                self.delay_secs
            )));
        }
        self.pacer()?;
        if self.model.trim().is_empty() {
            return Err(Error::Config("model must not be empty".to_string()));
        }
        Ok(())
    }

    /// Pacer for the configured delay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `delay_secs` is negative, not finite, or
    /// too large for a [`Duration`].
    pub fn pacer(&self) -> Result<Pacer> {
        // abs() folds -0.0 into 0.0; real negatives fail below
        let secs = if self.delay_secs < 0.0 {
            self.delay_secs
        } else {
            self.delay_secs.abs()
        };
        Duration::try_from_secs_f64(secs)
            .map(Pacer::new)
            .map_err(|e| Error::Config(format!("delay_secs {} is not usable: {e}", self.delay_secs)))
    }
}
