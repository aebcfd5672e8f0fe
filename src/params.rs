//! Sampling parameters sent to the generation service
//!
//! `top_p` and `top_k` are opaque knobs as far as this crate is concerned:
//! they are validated, forwarded, recorded, and grouped on, nothing more.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{Error, Result};

/// Lowest accepted `top_k`
pub const TOP_K_MIN: u32 = 1;
/// Highest accepted `top_k`
pub const TOP_K_MAX: u32 = 100;

/// A `(top_p, top_k)` pair.
///
/// Serialized as `{"top_p": 0.9, "top_k": 50}`, the shape stored under
/// `parameters` in every experiment record and sent under `options` to the
/// generation service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Nucleus sampling threshold in `[0, 1]`
    pub top_p: f64,
    /// Candidate pool size in `[1, 100]`
    pub top_k: u32,
}

impl SamplingParams {
    /// Create a pair without validation.
    ///
    /// Sweep plans build their pairs from known-good ranges; user input goes
    /// through [`SamplingParams::validated`].
    #[must_use]
    pub const fn new(top_p: f64, top_k: u32) -> Self {
        Self { top_p, top_k }
    }

    /// Create a pair, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `top_p` is not in `[0, 1]`
    /// (NaN included) or `top_k` is not in `[1, 100]`.
    pub fn validated(top_p: f64, top_k: u32) -> Result<Self> {
        let params = Self::new(top_p, top_k);
        params.validate()?;
        Ok(params)
    }

    /// Check both values against their accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] naming the offending value.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(Error::InvalidParameter(format!(
                "top-p must be between 0 and 1 (got {})",
                self.top_p
            )));
        }
        if !(TOP_K_MIN..=TOP_K_MAX).contains(&self.top_k) {
            return Err(Error::InvalidParameter(format!(
                "top-k must be between {TOP_K_MIN} and {TOP_K_MAX} (got {})",
                self.top_k
            )));
        }
        Ok(())
    }

    /// Total order on `(top_p, top_k)`, `top_p` first.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.top_p
            .total_cmp(&other.top_p)
            .then_with(|| self.top_k.cmp(&other.top_k))
    }
}

/// Round to `decimals` places, matching how sweep values are written out.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
