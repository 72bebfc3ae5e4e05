//! Evaluators observe an evaluation run through hooks fired around every step.
//!
//! The driver brackets one run with [`Evaluator::pre_evaluate`] and
//! [`Evaluator::post_evaluate`], and every step with the matching `pre_*` /
//! `post_*` pair. All hooks default to no-ops, so an evaluator only
//! implements the ones it measures. An evaluator instance belongs to one run
//! at a time.
//!
//! Evaluators that want to see every row a learner trains on return a
//! callback from [`Evaluator::row_callback`]; the driver then wraps the
//! training dataset in a [`RowHarness`].

pub mod classification;
pub mod estimator;
pub mod group;
pub mod harness;
pub mod row_count;
pub mod timing;

use std::sync::Arc;

use crate::capability::LearnerType;
use crate::dataset::{Dataset, Headers, Row};
use crate::learner::Learner;
use crate::metric::Metric;
use crate::EvalResult;

pub use classification::{ClassificationPerformanceEvaluator, Stats};
pub use estimator::{Estimator, Sample};
pub use group::GroupEvaluator;
pub use harness::RowHarness;
pub use row_count::TrainingRowCountEvaluator;
pub use timing::{Clock, MockClock, Phase, SystemClock, TimingEvaluator};

/// Invoked with every row delivered to a learner during training.
pub type RowCallback<'a> = Box<dyn FnMut(&Row) + Send + 'a>;

pub trait Evaluator: Send {
    fn name(&self) -> &str;

    /// Capabilities a learner must have after initialisation.
    fn required_type(&self) -> LearnerType {
        LearnerType::any()
    }

    /// Current result. Its shape depends only on the configuration and the
    /// number of learners of the current run.
    fn metric(&self) -> Metric;

    fn pre_evaluate(&mut self, _learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        Ok(())
    }

    fn post_evaluate(&mut self, _learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        Ok(())
    }

    fn pre_initialise(
        &mut self,
        _learner_index: usize,
        _learner: &dyn Learner,
        _headers: &Arc<Headers>,
    ) -> EvalResult<()> {
        Ok(())
    }

    fn post_initialise(&mut self, _learner_index: usize, _learner: &dyn Learner) -> EvalResult<()> {
        Ok(())
    }

    fn pre_train(
        &mut self,
        _learner_index: usize,
        _learner: &dyn Learner,
        _dataset: &dyn Dataset,
    ) -> EvalResult<()> {
        Ok(())
    }

    fn post_train(&mut self, _learner_index: usize, _learner: &dyn Learner) -> EvalResult<()> {
        Ok(())
    }

    fn pre_predict(
        &mut self,
        _learner_index: usize,
        _learner: &dyn Learner,
        _row: &Row,
    ) -> EvalResult<()> {
        Ok(())
    }

    /// `row` is the full row, target included.
    fn post_predict(
        &mut self,
        _learner_index: usize,
        _learner: &dyn Learner,
        _row: &Row,
        _prediction: &Row,
    ) -> EvalResult<()> {
        Ok(())
    }

    /// Per-row callback for the training call that follows `pre_train`.
    ///
    /// `None` means the evaluator does not observe training rows and no
    /// harness is attached on its behalf. The callback borrows the evaluator
    /// until training returns.
    fn row_callback<'a>(
        &'a mut self,
        _learner_index: usize,
        _learner: &dyn Learner,
        _dataset: &dyn Dataset,
    ) -> Option<RowCallback<'a>> {
        None
    }
}
