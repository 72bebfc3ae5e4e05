//! Learner contract driven by the evaluation engine.

pub mod baseline;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::capability::LearnerType;
use crate::dataset::{Dataset, DatasetError, Headers, Row, RowProjection};

pub use baseline::{BaselineKind, BaselineLearner};

#[derive(Error, Debug)]
pub enum LearnerError {
    #[error("Learner {learner} is not initialised")]
    NotInitialised { learner: String },
    #[error("Learner {learner} cannot handle headers: {message}")]
    UnsupportedHeaders { learner: String, message: String },
    #[error("Training failed for {learner}: {message}")]
    Training { learner: String, message: String },
    #[error("Prediction failed for {learner}: {message}")]
    Prediction { learner: String, message: String },
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

pub type LearnerResult<T> = Result<T, LearnerError>;

/// A trainable predictor.
///
/// `initialise` fixes the column structure the learner works with and its
/// capability type; every other accessor is meaningful only afterwards.
#[async_trait]
pub trait Learner: Send + Sync {
    fn name(&self) -> &str;

    fn initialise(&mut self, headers: &Arc<Headers>) -> LearnerResult<()>;

    /// Capability type set by `initialise`.
    fn initialised_type(&self) -> Option<LearnerType>;

    /// Column structure the learner was initialised with.
    fn train_headers(&self) -> Option<&Arc<Headers>>;

    /// Columns a prediction may read; the target is never among them.
    fn predict_input_columns(&self) -> Vec<String>;

    /// Column structure of the rows `predict` returns.
    fn predict_output_headers(&self) -> Option<&Arc<Headers>>;

    /// Trains on `dataset`. May do asynchronous work; callers await completion.
    async fn train(&mut self, dataset: &mut dyn Dataset) -> LearnerResult<()>;

    fn predict(&mut self, row: &RowProjection<'_>) -> LearnerResult<Row>;
}
