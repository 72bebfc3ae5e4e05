//! Runs learners through the steps of a protocol while an evaluator observes.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::capability::LearnerType;
use crate::config::EvaluationConfig;
use crate::dataset::{Dataset, Headers, Row};
use crate::evaluator::{
    ClassificationPerformanceEvaluator, Evaluator, GroupEvaluator, RowHarness, TimingEvaluator,
    TrainingRowCountEvaluator,
};
use crate::learner::{Learner, LearnerError};
use crate::metric::Metric;
use crate::protocol::{EvaluationProtocol, PrequentialProtocol, StepKind};
use crate::{EvalError, EvalResult};

/// Evaluates `learners` over the steps of `protocol` and returns the
/// evaluator's metric.
///
/// Steps run strictly one after another; training is awaited before its
/// post-hook fires. The first error aborts the run, in which case
/// `post_evaluate` does not run.
#[instrument(
    level = "info",
    skip_all,
    fields(run_id = %Uuid::new_v4(), learners = learners.len()),
    err
)]
pub async fn evaluate(
    learners: &mut [Box<dyn Learner>],
    protocol: &mut dyn EvaluationProtocol,
    evaluator: &mut dyn Evaluator,
) -> EvalResult<Metric> {
    let required = evaluator.required_type();
    info!(
        "evaluating {} learners with {}, requiring {}",
        learners.len(),
        evaluator.name(),
        required
    );

    evaluator.pre_evaluate(learners)?;

    let mut executed = 0usize;
    for step in protocol.steps(learners.len())? {
        let step = step?;
        let index = step.learner_index;
        let count = learners.len();
        let learner = learners
            .get_mut(index)
            .ok_or(EvalError::LearnerIndex { index, count })?;
        debug!("{} step for learner {}", step.kind_name(), index);

        match step.kind {
            StepKind::Initialise(headers) => {
                initialise(index, learner.as_mut(), &headers, &required, evaluator)?
            }
            StepKind::Train(dataset) => train(index, learner.as_mut(), dataset, evaluator).await?,
            StepKind::Predict(row) => predict(index, learner.as_mut(), &row, evaluator)?,
        }
        executed += 1;
    }

    evaluator.post_evaluate(learners)?;
    info!("evaluation finished after {} steps", executed);
    Ok(evaluator.metric())
}

fn initialise(
    index: usize,
    learner: &mut dyn Learner,
    headers: &Arc<Headers>,
    required: &LearnerType,
    evaluator: &mut dyn Evaluator,
) -> EvalResult<()> {
    evaluator.pre_initialise(index, &*learner, headers)?;
    learner.initialise(headers)?;

    let found = learner.initialised_type().unwrap_or_else(LearnerType::any);
    if !found.is_subtype_of(required) {
        debug!("learner {} lacks {:?}", index, found.missing(required));
        return Err(EvalError::WrongLearnerType {
            learner: learner.name().to_string(),
            found,
            required: required.clone(),
        });
    }
    debug!("learner {} initialised as {}", index, found);

    evaluator.post_initialise(index, &*learner)
}

async fn train(
    index: usize,
    learner: &mut dyn Learner,
    mut dataset: Box<dyn Dataset>,
    evaluator: &mut dyn Evaluator,
) -> EvalResult<()> {
    evaluator.pre_train(index, &*learner, dataset.as_ref())?;

    // the callback borrows the evaluator until training returns
    match evaluator.row_callback(index, &*learner, dataset.as_ref()) {
        Some(callback) => {
            let mut harness = RowHarness::new(dataset.as_mut(), callback);
            learner.train(&mut harness).await?;
        }
        None => learner.train(dataset.as_mut()).await?,
    }

    evaluator.post_train(index, &*learner)
}

fn predict(
    index: usize,
    learner: &mut dyn Learner,
    row: &Row,
    evaluator: &mut dyn Evaluator,
) -> EvalResult<()> {
    {
        let expected = learner
            .train_headers()
            .ok_or_else(|| LearnerError::NotInitialised {
                learner: learner.name().to_string(),
            })?;
        if !row.matches(expected) {
            return Err(EvalError::StructuralMismatch {
                learner: learner.name().to_string(),
                expected: expected.to_string(),
                found: row.headers().to_string(),
            });
        }
    }

    let inputs = visible_inputs(&*learner);
    let view = row.project(&inputs)?;

    evaluator.pre_predict(index, &*learner, row)?;
    let prediction = learner.predict(&view)?;
    evaluator.post_predict(index, &*learner, row, &prediction)
}

/// Declared input columns minus the columns the learner predicts.
fn visible_inputs(learner: &dyn Learner) -> Vec<String> {
    let targets = learner
        .predict_output_headers()
        .map(|headers| headers.names())
        .unwrap_or_default();
    learner
        .predict_input_columns()
        .into_iter()
        .filter(|name| {
            let target = targets.contains(&name.as_str());
            if target {
                debug!("hiding target column {} from {}", name, learner.name());
            }
            !target
        })
        .collect()
}

/// Prequential evaluation with the evaluators selected by an
/// [`EvaluationConfig`].
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    config: EvaluationConfig,
}

impl Evaluation {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Classification, timing and training row count, each when enabled.
    pub fn build_evaluator(&self) -> GroupEvaluator {
        let mut group = GroupEvaluator::new("evaluation");
        if let Some(config) = &self.config.classification {
            group.push(Box::new(ClassificationPerformanceEvaluator::new(
                config.clone(),
            )));
        }
        if let Some(config) = &self.config.timing {
            group.push(Box::new(TimingEvaluator::new(config.clone())));
        }
        if self.config.row_count {
            group.push(Box::new(TrainingRowCountEvaluator::new()));
        }
        group
    }

    pub async fn run(
        &self,
        learners: &mut [Box<dyn Learner>],
        dataset: Box<dyn Dataset>,
    ) -> EvalResult<Metric> {
        let mut protocol = PrequentialProtocol::new(dataset);
        let mut evaluator = self.build_evaluator();
        evaluate(learners, &mut protocol, &mut evaluator).await
    }
}
