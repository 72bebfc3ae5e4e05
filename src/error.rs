use thiserror::Error;

use crate::capability::LearnerType;
use crate::dataset::DatasetError;
use crate::learner::LearnerError;
use crate::protocol::ProtocolError;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Learner {learner} has type {found}, which does not satisfy the required type {required}")]
    WrongLearnerType {
        learner: String,
        found: LearnerType,
        required: LearnerType,
    },

    #[error("Row structure does not match the training headers of learner {learner}: expected [{expected}], found [{found}]")]
    StructuralMismatch {
        learner: String,
        expected: String,
        found: String,
    },

    #[error("Step addressed learner {index}, but only {count} learners are evaluated")]
    LearnerIndex { index: usize, count: usize },

    #[error("Evaluator {evaluator} failed: {message}")]
    Evaluator { evaluator: String, message: String },

    #[error("Learner error: {0}")]
    Learner(#[from] LearnerError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        EvalError::Internal(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        EvalError::Config(message.into())
    }
}
