//! Experiment records and the results store
//!
//! ## Schema Overview
//!
//! ```text
//! ResultsStore { results } ──< ExperimentRecord (N, append-only)
//!                                   │
//!                                   └── parameters: SamplingParams { top_p, top_k }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use topk_sweep::experiment::{ExperimentRecord, ResultsStore};
//! use topk_sweep::SamplingParams;
//!
//! let mut store = ResultsStore::new();
//! store.push(ExperimentRecord::new(
//!     "llama3.2",
//!     "Write a story",
//!     SamplingParams::new(0.9, 50),
//!     5.4,
//!     "Once upon a time...",
//! ));
//! assert_eq!(store.len(), 1);
//! ```

mod record;
mod store;

pub use record::{ExperimentRecord, ExperimentRecordBuilder};
pub use store::{file_name_for, ResultsStore, FILE_PREFIX};
