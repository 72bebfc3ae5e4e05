//! Baseline stream classifiers.
//!
//! Both learners predict a single categorical target without looking at the
//! input columns, which makes them useful reference points next to real
//! learners.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use crate::capability::{Capability, LearnerType};
use crate::dataset::{Dataset, Headers, Row, RowProjection, Value};

use super::{Learner, LearnerError, LearnerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum BaselineKind {
    /// Predicts the class with the largest observed weight
    MajorityClass,
    /// Predicts the most recently observed class
    NoChange,
}

struct TargetState {
    headers: Arc<Headers>,
    output: Arc<Headers>,
    target: String,
    inputs: Vec<String>,
    class_weights: Vec<f64>,
    last_class: Option<usize>,
}

pub struct BaselineLearner {
    name: String,
    kind: BaselineKind,
    target: Option<String>,
    state: Option<TargetState>,
}

impl BaselineLearner {
    /// The target defaults to the last column of the training headers.
    pub fn new(kind: BaselineKind) -> Self {
        Self {
            name: kind.to_string(),
            kind,
            target: None,
            state: None,
        }
    }

    pub fn with_target<S: Into<String>>(mut self, target: S) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    fn state(&self) -> LearnerResult<&TargetState> {
        self.state.as_ref().ok_or_else(|| LearnerError::NotInitialised {
            learner: self.name.clone(),
        })
    }

    fn predicted_class(&self, state: &TargetState) -> Option<usize> {
        match self.kind {
            BaselineKind::NoChange => state.last_class,
            BaselineKind::MajorityClass => {
                let mut best: Option<(usize, f64)> = None;
                for (class, &weight) in state.class_weights.iter().enumerate() {
                    if weight > 0.0 && best.map_or(true, |(_, w)| weight > w) {
                        best = Some((class, weight));
                    }
                }
                best.map(|(class, _)| class)
            }
        }
    }
}

#[async_trait]
impl Learner for BaselineLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, headers: &Arc<Headers>) -> LearnerResult<()> {
        let target = match &self.target {
            Some(target) => target.clone(),
            None => headers
                .columns()
                .last()
                .map(|c| c.name.clone())
                .ok_or_else(|| LearnerError::UnsupportedHeaders {
                    learner: self.name.clone(),
                    message: "no columns".to_string(),
                })?,
        };
        let column = headers
            .column(&target)
            .ok_or_else(|| LearnerError::UnsupportedHeaders {
                learner: self.name.clone(),
                message: format!("target column {} not found", target),
            })?;
        let num_classes = column
            .num_classes()
            .ok_or_else(|| LearnerError::UnsupportedHeaders {
                learner: self.name.clone(),
                message: format!("target column {} is not categorical", target),
            })?;

        let inputs = headers
            .names()
            .into_iter()
            .filter(|name| *name != target)
            .map(String::from)
            .collect();

        self.state = Some(TargetState {
            headers: headers.clone(),
            output: Arc::new(Headers::new(vec![column.clone()])),
            target,
            inputs,
            class_weights: vec![0.0; num_classes],
            last_class: None,
        });
        Ok(())
    }

    fn initialised_type(&self) -> Option<LearnerType> {
        self.state.as_ref().map(|_| {
            LearnerType::from(vec![
                Capability::Classifier,
                Capability::SingleTarget,
                Capability::Stream,
            ])
        })
    }

    fn train_headers(&self) -> Option<&Arc<Headers>> {
        self.state.as_ref().map(|s| &s.headers)
    }

    fn predict_input_columns(&self) -> Vec<String> {
        self.state
            .as_ref()
            .map(|s| s.inputs.clone())
            .unwrap_or_default()
    }

    fn predict_output_headers(&self) -> Option<&Arc<Headers>> {
        self.state.as_ref().map(|s| &s.output)
    }

    async fn train(&mut self, dataset: &mut dyn Dataset) -> LearnerResult<()> {
        let name = self.name.clone();
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| LearnerError::NotInitialised {
                learner: name.clone(),
            })?;
        if !dataset.headers().matches(&state.headers) {
            return Err(LearnerError::UnsupportedHeaders {
                learner: name,
                message: format!(
                    "training headers {} differ from {}",
                    dataset.headers(),
                    state.headers
                ),
            });
        }

        for row in dataset.row_iterator() {
            let row = row?;
            if let Some(class) = row.class_index(&state.target)? {
                let weight = state.class_weights.get_mut(class).ok_or_else(|| {
                    LearnerError::Training {
                        learner: name.clone(),
                        message: format!("class {} out of range", class),
                    }
                })?;
                *weight += row.weight();
                state.last_class = Some(class);
                trace!("observed class {} with weight {}", class, row.weight());
            }
        }
        Ok(())
    }

    fn predict(&mut self, _row: &RowProjection<'_>) -> LearnerResult<Row> {
        let state = self.state()?;
        let prediction = self.predicted_class(state).map(Value::Category);
        Ok(Row::new(state.output.clone(), vec![prediction])?)
    }
}
