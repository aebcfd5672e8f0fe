//! Interactive command implementation

use std::io::{self, BufRead, Write};

use anyhow::Context;

use super::generate::generate_and_print;
use crate::client::OllamaClient;
use crate::config::{DEFAULT_GENERATE_PROMPT, DEFAULT_MODEL, DEFAULT_TOP_K, DEFAULT_TOP_P};
use crate::params::SamplingParams;

#[derive(Debug, PartialEq)]
struct InteractiveRequest {
    model: String,
    prompt: String,
    params: SamplingParams,
}

pub fn run_interactive(host: &str) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    let request = collect_request(&mut input, &mut out)?;
    let client = OllamaClient::new(host)?;
    generate_and_print(&client, &request.model, &request.prompt, request.params, &mut out)
}

fn collect_request<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<InteractiveRequest> {
    let model = ask(input, out, &format!("Enter the model name (default '{DEFAULT_MODEL}'): "))?;
    let prompt = ask(input, out, "Enter your prompt (press Enter for default): ")?;
    let top_p = ask(
        input,
        out,
        &format!(
            "Enter top_p value (0-1, default {DEFAULT_TOP_P}). A high value means the model \
             looks at more possible words, even less likely ones, making text more diverse: "
        ),
    )?;
    let top_k = ask(
        input,
        out,
        &format!(
            "Enter top_k value (1-100, default {DEFAULT_TOP_K}). This limits the number of top \
             words the model considers at each step. Higher values = more diverse but \
             potentially less focused text: "
        ),
    )?;

    let top_p = if top_p.is_empty() {
        DEFAULT_TOP_P
    } else {
        top_p
            .parse::<f64>()
            .with_context(|| format!("Error with input values: top_p {top_p:?}"))?
    };
    let top_k = if top_k.is_empty() {
        DEFAULT_TOP_K
    } else {
        top_k
            .parse::<u32>()
            .with_context(|| format!("Error with input values: top_k {top_k:?}"))?
    };

    Ok(InteractiveRequest {
        model: or_default(model, DEFAULT_MODEL),
        prompt: or_default(prompt, DEFAULT_GENERATE_PROMPT),
        params: SamplingParams::validated(top_p, top_k)?,
    })
}

/// Print `question`, read one line, return it trimmed.
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> anyhow::Result<String> {
    write!(out, "{question}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("reading answer")?;
    Ok(line.trim().to_string())
}

fn or_default(answer: String, default: &str) -> String {
    if answer.is_empty() {
        default.to_string()
    } else {
        answer
    }
}
