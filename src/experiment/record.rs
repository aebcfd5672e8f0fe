//! Experiment Record - one timed generation call

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::params::SamplingParams;

/// Experiment Record represents a single successful generation call.
///
/// Field names and nesting match the on-disk store format:
///
/// ```json
/// {
///   "timestamp": "2025-02-05T09:21:49.123456Z",
///   "model": "llama3.2",
///   "prompt": "...",
///   "parameters": { "top_p": 0.9, "top_k": 50 },
///   "processing_time": 5.43,
///   "response": "..."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentRecord {
    timestamp: DateTime<Utc>,
    model: String,
    prompt: String,
    parameters: SamplingParams,
    processing_time: f64,
    response: String,
}

impl ExperimentRecord {
    /// Create a new record stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `model` - Model identifier passed to the generation service
    /// * `prompt` - Prompt text
    /// * `parameters` - Sampling parameters used for the call
    /// * `processing_time` - Wall-clock seconds spent in the call
    /// * `response` - Generated text
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        parameters: SamplingParams,
        processing_time: f64,
        response: impl Into<String>,
    ) -> Self {
        Self::builder(model, prompt, parameters)
            .processing_time(processing_time)
            .response(response)
            .build()
    }

    /// Create a builder for constructing a record with optional fields.
    #[must_use]
    pub fn builder(
        model: impl Into<String>,
        prompt: impl Into<String>,
        parameters: SamplingParams,
    ) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(model, prompt, parameters)
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Get the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Get the sampling parameters.
    #[must_use]
    pub const fn parameters(&self) -> SamplingParams {
        self.parameters
    }

    /// Get the measured processing time in seconds.
    #[must_use]
    pub const fn processing_time(&self) -> f64 {
        self.processing_time
    }

    /// Get the generated text.
    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Number of whitespace-separated tokens in the response.
    ///
    /// Whitespace is the Unicode `White_Space` set (so NBSP and U+3000 split
    /// words). The ASCII information separators U+001C..=U+001F do not.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.response.split_whitespace().count()
    }
}

/// Builder for `ExperimentRecord`.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    model: String,
    prompt: String,
    parameters: SamplingParams,
    timestamp: Option<DateTime<Utc>>,
    processing_time: f64,
    response: String,
}

impl ExperimentRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        parameters: SamplingParams,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            parameters,
            timestamp: None,
            processing_time: 0.0,
            response: String::new(),
        }
    }

    /// Set an explicit timestamp (defaults to now at build time).
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the processing time in seconds.
    #[must_use]
    pub const fn processing_time(mut self, seconds: f64) -> Self {
        self.processing_time = seconds;
        self
    }

    /// Set the generated text.
    #[must_use]
    pub fn response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Build the `ExperimentRecord`.
    #[must_use]
    pub fn build(self) -> ExperimentRecord {
        ExperimentRecord {
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            model: self.model,
            prompt: self.prompt,
            parameters: self.parameters,
            processing_time: self.processing_time,
            response: self.response,
        }
    }
}
