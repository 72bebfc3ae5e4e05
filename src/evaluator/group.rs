use std::sync::Arc;

use tracing::debug;

use crate::capability::LearnerType;
use crate::dataset::{Dataset, Headers, Row};
use crate::learner::Learner;
use crate::metric::Metric;
use crate::EvalResult;

use super::{Evaluator, RowCallback};

/// Composite evaluator.
///
/// Pre-hooks run through the sub-evaluators in registration order and
/// post-hooks in reverse, so the last evaluator opened is the first closed.
pub struct GroupEvaluator {
    name: String,
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl GroupEvaluator {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            evaluators: Vec::new(),
        }
    }

    pub fn with(mut self, evaluator: Box<dyn Evaluator>) -> Self {
        self.push(evaluator);
        self
    }

    pub fn push(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    pub fn evaluators(&self) -> &[Box<dyn Evaluator>] {
        &self.evaluators
    }

    fn forward<F>(&mut self, mut hook: F) -> EvalResult<()>
    where
        F: FnMut(&mut dyn Evaluator) -> EvalResult<()>,
    {
        for evaluator in self.evaluators.iter_mut() {
            hook(evaluator.as_mut())?;
        }
        Ok(())
    }

    fn reverse<F>(&mut self, mut hook: F) -> EvalResult<()>
    where
        F: FnMut(&mut dyn Evaluator) -> EvalResult<()>,
    {
        for evaluator in self.evaluators.iter_mut().rev() {
            hook(evaluator.as_mut())?;
        }
        Ok(())
    }
}

impl Evaluator for GroupEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_type(&self) -> LearnerType {
        self.evaluators
            .iter()
            .fold(LearnerType::any(), |acc, e| acc.intersect(&e.required_type()))
    }

    fn metric(&self) -> Metric {
        Metric::Group(
            self.evaluators
                .iter()
                .map(|e| (e.name().to_string(), e.metric()))
                .collect(),
        )
    }

    fn pre_evaluate(&mut self, learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        debug!(
            "group {} starting {} evaluators",
            self.name,
            self.evaluators.len()
        );
        self.forward(|e| e.pre_evaluate(learners))
    }

    fn post_evaluate(&mut self, learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        self.reverse(|e| e.post_evaluate(learners))
    }

    fn pre_initialise(
        &mut self,
        learner_index: usize,
        learner: &dyn Learner,
        headers: &Arc<Headers>,
    ) -> EvalResult<()> {
        self.forward(|e| e.pre_initialise(learner_index, learner, headers))
    }

    fn post_initialise(&mut self, learner_index: usize, learner: &dyn Learner) -> EvalResult<()> {
        self.reverse(|e| e.post_initialise(learner_index, learner))
    }

    fn pre_train(
        &mut self,
        learner_index: usize,
        learner: &dyn Learner,
        dataset: &dyn Dataset,
    ) -> EvalResult<()> {
        self.forward(|e| e.pre_train(learner_index, learner, dataset))
    }

    fn post_train(&mut self, learner_index: usize, learner: &dyn Learner) -> EvalResult<()> {
        self.reverse(|e| e.post_train(learner_index, learner))
    }

    fn pre_predict(
        &mut self,
        learner_index: usize,
        learner: &dyn Learner,
        row: &Row,
    ) -> EvalResult<()> {
        self.forward(|e| e.pre_predict(learner_index, learner, row))
    }

    fn post_predict(
        &mut self,
        learner_index: usize,
        learner: &dyn Learner,
        row: &Row,
        prediction: &Row,
    ) -> EvalResult<()> {
        self.reverse(|e| e.post_predict(learner_index, learner, row, prediction))
    }

    /// Composes the callbacks of all sub-evaluators that supply one, invoked
    /// in registration order. `None` when no sub-evaluator supplies one.
    fn row_callback<'a>(
        &'a mut self,
        learner_index: usize,
        learner: &dyn Learner,
        dataset: &dyn Dataset,
    ) -> Option<RowCallback<'a>> {
        let mut callbacks: Vec<RowCallback<'a>> = Vec::new();
        for evaluator in self.evaluators.iter_mut() {
            if let Some(callback) = evaluator.row_callback(learner_index, learner, dataset) {
                callbacks.push(callback);
            }
        }

        if callbacks.is_empty() {
            return None;
        }
        Some(Box::new(move |row: &Row| {
            for callback in callbacks.iter_mut() {
                callback(row);
            }
        }))
    }
}
