//! Generation service client
//!
//! The runner talks to the generation service only through the
//! [`Generator`] trait. [`OllamaClient`] is the HTTP implementation for an
//! Ollama-compatible `/api/generate` endpoint; tests substitute scripted
//! fakes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::params::SamplingParams;
use crate::{Error, Result};

/// Default generation service address
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// One generation request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerateRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Prompt text
    pub prompt: &'a str,
    /// Ask for a single JSON body instead of a token stream
    pub stream: bool,
    /// Sampling parameters
    pub options: SamplingParams,
}

impl<'a> GenerateRequest<'a> {
    /// Build a non-streaming request.
    #[must_use]
    pub const fn new(model: &'a str, prompt: &'a str, options: SamplingParams) -> Self {
        Self {
            model,
            prompt,
            stream: false,
            options,
        }
    }
}

/// The part of the service reply this crate consumes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    /// Generated text
    pub response: String,
}

/// Anything that can turn a request into generated text.
pub trait Generator {
    /// Perform one blocking generation call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generation`] if the call fails for any reason.
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<GenerateResponse>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<GenerateResponse> {
        (**self).generate(request)
    }
}

/// Blocking HTTP client for an Ollama-compatible generation service.
pub struct OllamaClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    /// Create a client for `host` (e.g. `http://localhost:11434`).
    ///
    /// No request timeout is set: generation calls block until the service
    /// answers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generation`] if the HTTP client cannot be built.
    pub fn new(host: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("topk-sweep/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| Error::Generation(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: generate_endpoint(host),
            client,
        })
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Generator for OllamaClient {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<GenerateResponse> {
        debug!(
            endpoint = %self.endpoint,
            model = request.model,
            top_p = request.options.top_p,
            top_k = request.options.top_k,
            "posting generate request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|e| Error::Generation(format!("request to {} failed: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Generation(format!(
                "service returned {status}: {}",
                body.trim()
            )));
        }

        response
            .json::<GenerateResponse>()
            .map_err(|e| Error::Generation(format!("malformed generate response: {e}")))
    }
}

fn generate_endpoint(host: &str) -> String {
    format!("{}/api/generate", host.trim_end_matches('/'))
}
