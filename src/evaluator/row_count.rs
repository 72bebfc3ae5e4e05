use tracing::debug;

use crate::dataset::{Dataset, Row};
use crate::learner::Learner;
use crate::metric::Metric;
use crate::EvalResult;

use super::{Evaluator, RowCallback};

/// Counts the rows, and their total weight, each learner trains on.
///
/// Observes training through the row harness rather than through steps, so
/// it sees every row of a multi-row training dataset.
pub struct TrainingRowCountEvaluator {
    name: String,
    rows: Vec<u64>,
    weights: Vec<f64>,
}

impl Default for TrainingRowCountEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingRowCountEvaluator {
    pub fn new() -> Self {
        Self {
            name: "training rows".to_string(),
            rows: Vec::new(),
            weights: Vec::new(),
        }
    }

    pub fn rows(&self, learner_index: usize) -> u64 {
        self.rows.get(learner_index).copied().unwrap_or(0)
    }

    pub fn weight(&self, learner_index: usize) -> f64 {
        self.weights.get(learner_index).copied().unwrap_or(0.0)
    }
}

impl Evaluator for TrainingRowCountEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn metric(&self) -> Metric {
        Metric::Group(vec![
            (
                "rows".to_string(),
                Metric::scalar(self.rows.iter().map(|&n| n as f64).collect()),
            ),
            ("weight".to_string(), Metric::scalar(self.weights.clone())),
        ])
    }

    fn pre_evaluate(&mut self, learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        self.rows = vec![0; learners.len()];
        self.weights = vec![0.0; learners.len()];
        Ok(())
    }

    fn post_train(&mut self, learner_index: usize, _learner: &dyn Learner) -> EvalResult<()> {
        debug!(
            "learner {} trained on {} rows so far",
            learner_index,
            self.rows(learner_index)
        );
        Ok(())
    }

    fn row_callback<'a>(
        &'a mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _dataset: &dyn Dataset,
    ) -> Option<RowCallback<'a>> {
        let rows = self.rows.get_mut(learner_index)?;
        let weights = self.weights.get_mut(learner_index)?;
        Some(Box::new(move |row: &Row| {
            *rows += 1;
            *weights += row.weight();
        }))
    }
}
