//! Analyze command implementation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::analysis::AnalysisReport;
use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::experiment::FILE_PREFIX;

pub fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let path = match args.input {
        Some(path) => path,
        None => latest_results_file(Path::new("."))?.context(
            "no testtopptopk_*.json file in the current directory; pass the results file to analyze",
        )?,
    };

    let report = AnalysisReport::load(&path)?;
    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

/// Newest sweep output in `dir`; the timestamped names sort chronologically.
fn latest_results_file(dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))?;

    let mut newest: Option<PathBuf> = None;
    for entry in entries {
        let path = entry?.path();
        let is_results = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(".json"));
        if is_results && newest.as_ref().map_or(true, |best| path > *best) {
            newest = Some(path);
        }
    }
    Ok(newest)
}
