//! Generate command implementation

use std::io::{self, Write};

use anyhow::Context;
use serde::Serialize;

use crate::cli::GenerateArgs;
use crate::client::{GenerateRequest, Generator, OllamaClient};
use crate::params::SamplingParams;

/// Printed shape of a single generation.
#[derive(Debug, Serialize)]
struct GeneratedOutput<'a> {
    model: &'a str,
    prompt: &'a str,
    parameters: SamplingParams,
    response: String,
}

pub fn run_generate(args: GenerateArgs, host: &str) -> anyhow::Result<()> {
    let params = SamplingParams::validated(args.top_p, args.top_k)?;
    let client = OllamaClient::new(host)?;
    generate_and_print(&client, &args.model, &args.prompt, params, &mut io::stdout().lock())
}

/// One call, printed as 2-space JSON under a banner.
pub(super) fn generate_and_print<G: Generator, W: Write>(
    generator: &G,
    model: &str,
    prompt: &str,
    params: SamplingParams,
    out: &mut W,
) -> anyhow::Result<()> {
    let reply = generator.generate(&GenerateRequest::new(model, prompt, params))?;

    let output = GeneratedOutput {
        model,
        prompt,
        parameters: params,
        response: reply.response,
    };
    let json = serde_json::to_string_pretty(&output)?;

    writeln!(out, "\nGenerated Response:").context("writing output")?;
    writeln!(out, "{json}").context("writing output")?;
    Ok(())
}
