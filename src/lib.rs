//! # stream-eval: evaluation engine for stream and batch learners
//!
//! Learners are driven through an ordered protocol of evaluation steps while
//! composable evaluators observe every step and accumulate metrics.
//!
//! ```text
//! Dataset → Protocol (steps) → Driver → Learner
//!                                 ↓
//!                    Evaluator hooks (Group → sub-evaluators)
//!                                 ↓
//!                               Metric
//! ```
//!
//! ## Building blocks
//!
//! - Data contracts: [`dataset`] (headers, rows, single-pass datasets) and
//!   [`learner`] (initialise / train / predict).
//! - Step generation: [`protocol`], with the prequential (test-then-train)
//!   protocol as the standard implementation.
//! - Observation: [`evaluator`], including the group evaluator, the row
//!   harness, classification performance, timing and training row counts.
//! - Results: [`metric`], a hierarchical result tree rendered by
//!   [`formatter`].
//! - Orchestration: [`driver`].

pub mod capability;
pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod formatter;
pub mod learner;
pub mod metric;
pub mod protocol;

// Re-exports
pub use capability::{Capability, LearnerType};
pub use driver::{evaluate, Evaluation};
pub use error::*;
pub use metric::Metric;
