//! Result analyzer: per-parameter-pair averages and classification
//!
//! Records are grouped by exact `(top_p, top_k)` equality. There is no
//! tolerance band on `top_p`; values are compared as loaded from JSON.
//!
//! ```rust
//! use topk_sweep::analysis::{AnalysisReport, Classification};
//! use topk_sweep::experiment::ExperimentRecord;
//! use topk_sweep::SamplingParams;
//!
//! let words = vec!["word"; 112].join(" ");
//! let records = vec![ExperimentRecord::new("m", "p", SamplingParams::new(0.9, 50), 5.4, words)];
//!
//! let report = AnalysisReport::from_records(&records);
//! assert_eq!(report.groups()[0].classification, Classification::Optimal);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Serialize;

use crate::experiment::{ExperimentRecord, ResultsStore};
use crate::params::SamplingParams;
use crate::Result;

/// Average word count band for an optimal group
pub const OPTIMAL_WORDS: RangeInclusive<f64> = 110.0..=115.0;
/// Average processing time band (seconds) for an optimal group
pub const OPTIMAL_TIME: RangeInclusive<f64> = 5.2..=5.6;
/// Average word count outside this band is flagged
pub const ACCEPTABLE_WORDS: RangeInclusive<f64> = 100.0..=120.0;
/// Fixed `top_p` recommendation printed with every report
pub const RECOMMENDED_TOP_P: &str = "0.7-0.8";
/// Fixed `top_k` recommendation printed with every report
pub const RECOMMENDED_TOP_K: &str = "50-75";

const RULE_WIDTH: usize = 80;

/// Verdict for one parameter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Inside both the word and the time band
    Optimal,
    /// Average word count below 100 or above 120
    OutsideWordRange,
    /// Neither
    Unremarkable,
}

impl Classification {
    /// Classify a group from its averages.
    #[must_use]
    pub fn classify(avg_word_count: f64, avg_time: f64) -> Self {
        if OPTIMAL_WORDS.contains(&avg_word_count) && OPTIMAL_TIME.contains(&avg_time) {
            Self::Optimal
        } else if !ACCEPTABLE_WORDS.contains(&avg_word_count) {
            Self::OutsideWordRange
        } else {
            Self::Unremarkable
        }
    }

    /// Notes column text.
    #[must_use]
    pub const fn note(self) -> &'static str {
        match self {
            Self::Optimal => "✓ Optimal",
            Self::OutsideWordRange => "! Outside word range",
            Self::Unremarkable => "",
        }
    }
}

/// Averages for one `(top_p, top_k)` group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStat {
    /// Group `top_p`
    pub top_p: f64,
    /// Group `top_k`
    pub top_k: u32,
    /// Mean processing time in seconds
    pub avg_time: f64,
    /// Mean whitespace-token count of the responses
    pub avg_word_count: f64,
    /// Records in the group
    pub sample_count: usize,
    /// Band verdict
    pub classification: Classification,
}

/// Grouping key with a total order on `top_p`.
#[derive(Debug, Clone, Copy)]
struct GroupKey(SamplingParams);

impl GroupKey {
    fn new(params: SamplingParams) -> Self {
        // -0.0 and 0.0 are the same group.
        Self(SamplingParams::new(params.top_p + 0.0, params.top_k))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    time_sum: f64,
    word_sum: usize,
    count: usize,
}

/// Grouped statistics over a results store, ordered by `(top_p, top_k)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    groups: Vec<AggregateStat>,
}

impl AnalysisReport {
    /// Aggregate a slice of records.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(records: &[ExperimentRecord]) -> Self {
        let mut buckets: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
        for record in records {
            let acc = buckets.entry(GroupKey::new(record.parameters())).or_default();
            acc.time_sum += record.processing_time();
            acc.word_sum += record.word_count();
            acc.count += 1;
        }

        let groups = buckets
            .into_iter()
            .map(|(GroupKey(params), acc)| {
                let n = acc.count as f64;
                let avg_time = acc.time_sum / n;
                let avg_word_count = acc.word_sum as f64 / n;
                AggregateStat {
                    top_p: params.top_p,
                    top_k: params.top_k,
                    avg_time,
                    avg_word_count,
                    sample_count: acc.count,
                    classification: Classification::classify(avg_word_count, avg_time),
                }
            })
            .collect();

        Self { groups }
    }

    /// Aggregate an in-memory store.
    #[must_use]
    pub fn from_store(store: &ResultsStore) -> Self {
        Self::from_records(store.records())
    }

    /// Load a store file and aggregate it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DataLoad`] if the file is missing or malformed;
    /// no partial report is produced.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let store = ResultsStore::load(path)?;
        Ok(Self::from_store(&store))
    }

    /// All groups in ascending `(top_p, top_k)` order.
    #[must_use]
    pub fn groups(&self) -> &[AggregateStat] {
        &self.groups
    }

    /// Groups classified as optimal, in table order.
    pub fn optimal(&self) -> impl Iterator<Item = &AggregateStat> {
        self.groups
            .iter()
            .filter(|g| g.classification == Classification::Optimal)
    }

    /// Render the table, the optimal summary and the fixed recommendation.
    #[must_use]
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    /// Report as pretty JSON, including the fixed recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let value = serde_json::json!({
            "groups": self.groups,
            "optimal": self.optimal().collect::<Vec<_>>(),
            "recommended": {
                "top_p": RECOMMENDED_TOP_P,
                "top_k": RECOMMENDED_TOP_K,
            },
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        writeln!(f, "\nAnalysis Results:")?;
        writeln!(f, "{heavy}")?;
        writeln!(
            f,
            "{:<10} {:<10} {:<15} {:<15} Notes",
            "Top_P", "Top_K", "Avg Time", "Avg Words"
        )?;
        writeln!(f, "{light}")?;
        for g in &self.groups {
            let row = format!(
                "{:<10.2} {:<10} {:<15.2} {:<15.2} {}",
                g.top_p,
                g.top_k,
                g.avg_time,
                g.avg_word_count,
                g.classification.note()
            );
            writeln!(f, "{}", row.trim_end())?;
        }

        writeln!(f, "\nSummary:")?;
        writeln!(f, "{heavy}")?;
        writeln!(f, "Optimal Combinations (110-115 words, balanced processing time):")?;
        for g in self.optimal() {
            writeln!(
                f,
                "- top_p: {:.2}, top_k: {} (Time: {:.2}s, Words: {:.1})",
                g.top_p, g.top_k, g.avg_time, g.avg_word_count
            )?;
        }

        writeln!(f, "\nRecommended Range:")?;
        writeln!(f, "- top_p: {RECOMMENDED_TOP_P}")?;
        writeln!(f, "- top_k: {RECOMMENDED_TOP_K}")
    }
}
