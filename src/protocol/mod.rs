//! Evaluation protocols turn a dataset into an ordered stream of steps.
//!
//! Every step targets one learner by index and carries the payload of one
//! learner operation. Steps are produced lazily and consumed once.

pub mod prequential;

use std::sync::Arc;

use thiserror::Error;

use crate::dataset::{Dataset, Headers, Row};
use crate::EvalResult;

pub use prequential::PrequentialProtocol;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Protocol steps were already generated; a dataset is traversed once")]
    AlreadyConsumed,
}

/// One unit of evaluation work targeting one learner.
pub struct EvaluationStep {
    pub learner_index: usize,
    pub kind: StepKind,
}

#[derive(strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StepKind {
    Initialise(Arc<Headers>),
    Train(Box<dyn Dataset>),
    Predict(Row),
}

impl EvaluationStep {
    pub fn initialise(learner_index: usize, headers: Arc<Headers>) -> Self {
        Self {
            learner_index,
            kind: StepKind::Initialise(headers),
        }
    }

    pub fn train(learner_index: usize, dataset: Box<dyn Dataset>) -> Self {
        Self {
            learner_index,
            kind: StepKind::Train(dataset),
        }
    }

    pub fn predict(learner_index: usize, row: Row) -> Self {
        Self {
            learner_index,
            kind: StepKind::Predict(row),
        }
    }

    /// `initialise`, `train` or `predict`.
    pub fn kind_name(&self) -> &'static str {
        (&self.kind).into()
    }
}

impl std::fmt::Debug for EvaluationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationStep")
            .field("learner_index", &self.learner_index)
            .field("kind", &self.kind_name())
            .finish()
    }
}

pub type StepIterator = Box<dyn Iterator<Item = EvalResult<EvaluationStep>> + Send>;

pub trait EvaluationProtocol: Send {
    /// Steps for `num_learners` learners. May be called once per protocol.
    fn steps(&mut self, num_learners: usize) -> Result<StepIterator, ProtocolError>;
}
