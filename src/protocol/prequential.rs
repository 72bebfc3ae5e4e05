use std::mem;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::dataset::{Dataset, Headers, Row, SingleRowDataset};
use crate::EvalResult;

use super::{EvaluationProtocol, EvaluationStep, ProtocolError, StepIterator};

/// Test-then-train protocol.
///
/// Every learner is initialised with the dataset headers first. Then, row by
/// row and learner by learner, the learner predicts the row and is trained on
/// it as a one-row dataset.
pub struct PrequentialProtocol {
    dataset: Option<Box<dyn Dataset>>,
}

impl PrequentialProtocol {
    pub fn new(dataset: Box<dyn Dataset>) -> Self {
        Self {
            dataset: Some(dataset),
        }
    }
}

impl EvaluationProtocol for PrequentialProtocol {
    fn steps(&mut self, num_learners: usize) -> Result<StepIterator, ProtocolError> {
        let dataset = self.dataset.take().ok_or(ProtocolError::AlreadyConsumed)?;
        debug!("prequential steps for {} learners", num_learners);
        Ok(Box::new(PrequentialSteps::new(dataset, num_learners)))
    }
}

enum Cursor {
    Initialise { next: usize },
    NextRow,
    Predict { row: Row, learner: usize },
    Train { row: Row, learner: usize },
    Done,
}

/// Pull-based step generator. Ends for good after the last row or the first
/// read error.
struct PrequentialSteps {
    dataset: Box<dyn Dataset>,
    headers: Arc<Headers>,
    num_learners: usize,
    rows_read: usize,
    cursor: Cursor,
}

impl PrequentialSteps {
    fn new(dataset: Box<dyn Dataset>, num_learners: usize) -> Self {
        let headers = dataset.headers().clone();
        let cursor = if num_learners == 0 {
            Cursor::Done
        } else {
            Cursor::Initialise { next: 0 }
        };
        Self {
            dataset,
            headers,
            num_learners,
            rows_read: 0,
            cursor,
        }
    }
}

impl Iterator for PrequentialSteps {
    type Item = EvalResult<EvaluationStep>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match mem::replace(&mut self.cursor, Cursor::Done) {
                Cursor::Initialise { next } if next < self.num_learners => {
                    self.cursor = Cursor::Initialise { next: next + 1 };
                    return Some(Ok(EvaluationStep::initialise(
                        next,
                        self.headers.clone(),
                    )));
                }
                Cursor::Initialise { .. } => self.cursor = Cursor::NextRow,
                Cursor::NextRow => match self.dataset.row_iterator().next() {
                    Some(Ok(row)) => {
                        self.rows_read += 1;
                        trace!("row {} read", self.rows_read);
                        self.cursor = Cursor::Predict { row, learner: 0 };
                    }
                    Some(Err(e)) => return Some(Err(e.into())),
                    None => {
                        debug!("dataset exhausted after {} rows", self.rows_read);
                        return None;
                    }
                },
                Cursor::Predict { row, learner } => {
                    let step = EvaluationStep::predict(learner, row.clone());
                    self.cursor = Cursor::Train { row, learner };
                    return Some(Ok(step));
                }
                Cursor::Train { row, learner } => {
                    let next = learner + 1;
                    let batch = if next < self.num_learners {
                        let batch = SingleRowDataset::new(row.clone());
                        self.cursor = Cursor::Predict { row, learner: next };
                        batch
                    } else {
                        self.cursor = Cursor::NextRow;
                        SingleRowDataset::new(row)
                    };
                    return Some(Ok(EvaluationStep::train(learner, Box::new(batch))));
                }
                Cursor::Done => return None,
            }
        }
    }
}
