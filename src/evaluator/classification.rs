//! Incremental classification performance statistics.
//!
//! Every accepted prediction updates a set of running estimators per learner;
//! the reported statistics are derived from those estimators on read.
//!
//! - accuracy: mean of the correctly classified weight
//! - kappa: accuracy corrected for the agreement expected by chance,
//!   `pc = Σ_c P(predicted = c) · P(true = c)`
//! - kappa temporal: corrected against a classifier that repeats the previous
//!   true class
//! - kappa M: corrected against a classifier that always predicts the
//!   majority class seen so far
//! - precision, recall and F1, per class and macro-averaged

use tracing::{debug, trace};

use crate::capability::{Capability, LearnerType};
use crate::config::ClassificationConfig;
use crate::learner::Learner;
use crate::metric::Metric;
use crate::{EvalError, EvalResult};

use super::estimator::{Estimator, Sample};
use super::Evaluator;
use crate::dataset::Row;

/// Running statistics of one learner.
#[derive(Debug, Clone)]
pub struct Stats {
    target: String,
    labels: Vec<String>,
    row_kappa: Vec<Estimator>,
    column_kappa: Vec<Estimator>,
    precision: Vec<Estimator>,
    recall: Vec<Estimator>,
    weight_correct: Estimator,
    weight_correct_no_change: Estimator,
    weight_majority: Estimator,
    last_seen_class: Option<usize>,
    total_weight_observed: f64,
}

impl Stats {
    pub fn new<S: Into<String>>(target: S, labels: Vec<String>) -> Self {
        let num_classes = labels.len();
        Self {
            target: target.into(),
            labels,
            row_kappa: vec![Estimator::new(); num_classes],
            column_kappa: vec![Estimator::new(); num_classes],
            precision: vec![Estimator::new(); num_classes],
            recall: vec![Estimator::new(); num_classes],
            weight_correct: Estimator::new(),
            weight_correct_no_change: Estimator::new(),
            weight_majority: Estimator::new(),
            last_seen_class: None,
            total_weight_observed: 0.0,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Records one prediction. `predicted` is `None` when the learner
    /// produced no class, which matches no class at all.
    pub fn observe(&mut self, weight: f64, true_class: usize, predicted: Option<usize>) {
        let correct = predicted == Some(true_class);
        let hit = |yes: bool| Sample::Value(if yes { weight } else { 0.0 });

        self.total_weight_observed += weight;
        self.weight_correct.accept(hit(correct));

        for class in 0..self.num_classes() {
            let predicted_class = predicted == Some(class);
            let true_is_class = true_class == class;

            self.row_kappa[class].accept(hit(predicted_class));
            self.column_kappa[class].accept(hit(true_is_class));
            self.precision[class].accept(if predicted_class {
                hit(correct)
            } else {
                Sample::NotApplicable
            });
            self.recall[class].accept(if true_is_class {
                hit(correct)
            } else {
                Sample::NotApplicable
            });
        }

        self.weight_correct_no_change
            .accept(hit(self.last_seen_class == Some(true_class)));
        self.weight_majority
            .accept(hit(self.majority_class() == Some(true_class)));

        self.last_seen_class = Some(true_class);
    }

    pub fn total_weight_observed(&self) -> f64 {
        self.total_weight_observed
    }

    /// Class with the largest true-class share so far; the first on ties.
    pub fn majority_class(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (class, estimator) in self.column_kappa.iter().enumerate() {
            let share = estimator.mean();
            if best.map_or(true, |(_, b)| share > b) {
                best = Some((class, share));
            }
        }
        best.map(|(class, _)| class)
    }

    pub fn fraction_correct(&self) -> f64 {
        self.weight_correct.mean()
    }

    pub fn kappa(&self) -> f64 {
        let pc = self
            .row_kappa
            .iter()
            .zip(&self.column_kappa)
            .map(|(row, column)| row.mean() * column.mean())
            .sum::<f64>();
        self.chance_corrected(pc)
    }

    pub fn kappa_temporal(&self) -> f64 {
        self.chance_corrected(self.weight_correct_no_change.mean())
    }

    pub fn kappa_m(&self) -> f64 {
        self.chance_corrected(self.weight_majority.mean())
    }

    /// `(p0 - pc) / (1 - pc)`; 0 before any weight was observed or when the
    /// baseline agreement is already perfect.
    fn chance_corrected(&self, pc: f64) -> f64 {
        if self.total_weight_observed == 0.0 {
            return 0.0;
        }
        let denominator = 1.0 - pc;
        if denominator == 0.0 {
            return 0.0;
        }
        (self.fraction_correct() - pc) / denominator
    }

    pub fn class_precision(&self, class: usize) -> f64 {
        self.precision[class].mean()
    }

    pub fn class_recall(&self, class: usize) -> f64 {
        self.recall[class].mean()
    }

    pub fn class_f1(&self, class: usize) -> f64 {
        harmonic_mean(self.class_precision(class), self.class_recall(class))
    }

    /// Macro-averaged precision.
    pub fn precision(&self) -> f64 {
        macro_average(&self.precision)
    }

    /// Macro-averaged recall.
    pub fn recall(&self) -> f64 {
        macro_average(&self.recall)
    }

    pub fn f1(&self) -> f64 {
        harmonic_mean(self.precision(), self.recall())
    }
}

fn macro_average(estimators: &[Estimator]) -> f64 {
    if estimators.is_empty() {
        return 0.0;
    }
    estimators.iter().map(Estimator::mean).sum::<f64>() / estimators.len() as f64
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Classification performance of single-target classifiers.
pub struct ClassificationPerformanceEvaluator {
    name: String,
    config: ClassificationConfig,
    stats: Vec<Option<Stats>>,
}

impl Default for ClassificationPerformanceEvaluator {
    fn default() -> Self {
        Self::new(ClassificationConfig::default())
    }
}

impl ClassificationPerformanceEvaluator {
    pub fn new(config: ClassificationConfig) -> Self {
        Self {
            name: "classification".to_string(),
            config,
            stats: Vec::new(),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Statistics of one learner, once it finished initialisation.
    pub fn stats(&self, learner_index: usize) -> Option<&Stats> {
        self.stats.get(learner_index).and_then(Option::as_ref)
    }

    fn scalar<F: Fn(&Stats) -> f64>(&self, statistic: F) -> Metric {
        Metric::scalar(
            self.stats
                .iter()
                .map(|s| s.as_ref().map_or(0.0, &statistic))
                .collect(),
        )
    }

    fn per_class<F: Fn(&Stats, usize) -> f64>(&self, statistic: F) -> Metric {
        Metric::named(
            self.stats
                .iter()
                .map(|s| match s {
                    Some(s) => s
                        .labels
                        .iter()
                        .enumerate()
                        .map(|(class, label)| (label.clone(), statistic(s, class)))
                        .collect(),
                    None => Vec::new(),
                })
                .collect(),
        )
    }

    fn failure<S: Into<String>>(&self, message: S) -> EvalError {
        EvalError::Evaluator {
            evaluator: self.name.clone(),
            message: message.into(),
        }
    }
}

impl Evaluator for ClassificationPerformanceEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_type(&self) -> LearnerType {
        LearnerType::from(vec![Capability::SingleTarget, Capability::Classifier])
    }

    fn metric(&self) -> Metric {
        let mut entries = vec![
            (
                "classified instances".to_string(),
                self.scalar(Stats::total_weight_observed),
            ),
            ("accuracy".to_string(), self.scalar(Stats::fraction_correct)),
            ("kappa".to_string(), self.scalar(Stats::kappa)),
            ("kappa temporal".to_string(), self.scalar(Stats::kappa_temporal)),
            ("kappa m".to_string(), self.scalar(Stats::kappa_m)),
            ("precision".to_string(), self.scalar(Stats::precision)),
            ("recall".to_string(), self.scalar(Stats::recall)),
        ];
        if self.config.f1 {
            entries.push(("f1".to_string(), self.scalar(Stats::f1)));
        }
        if self.config.precision_per_class {
            entries.push((
                "precision per class".to_string(),
                self.per_class(Stats::class_precision),
            ));
        }
        if self.config.recall_per_class {
            entries.push((
                "recall per class".to_string(),
                self.per_class(Stats::class_recall),
            ));
        }
        if self.config.f1_per_class {
            entries.push(("f1 per class".to_string(), self.per_class(Stats::class_f1)));
        }
        Metric::Group(entries)
    }

    fn pre_evaluate(&mut self, learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        self.stats = (0..learners.len()).map(|_| None).collect();
        Ok(())
    }

    fn post_initialise(&mut self, learner_index: usize, learner: &dyn Learner) -> EvalResult<()> {
        let headers = learner
            .predict_output_headers()
            .ok_or_else(|| self.failure(format!("{} has no prediction headers", learner.name())))?;
        let column = match headers.columns() {
            [column] => column,
            columns => {
                return Err(self.failure(format!(
                    "{} predicts {} columns, expected one",
                    learner.name(),
                    columns.len()
                )))
            }
        };
        if column.num_classes().is_none() {
            return Err(self.failure(format!(
                "prediction column {} of {} is not categorical",
                column.name,
                learner.name()
            )));
        }

        let stats = Stats::new(column.name.clone(), column.labels().to_vec());
        debug!(
            "tracking {} classes of {} for learner {}",
            stats.num_classes(),
            column.name,
            learner_index
        );
        let count = self.stats.len();
        let slot = self
            .stats
            .get_mut(learner_index)
            .ok_or(EvalError::LearnerIndex {
                index: learner_index,
                count,
            })?;
        *slot = Some(stats);
        Ok(())
    }

    fn post_predict(
        &mut self,
        learner_index: usize,
        learner: &dyn Learner,
        row: &Row,
        prediction: &Row,
    ) -> EvalResult<()> {
        let count = self.stats.len();
        let Some(slot) = self.stats.get_mut(learner_index) else {
            return Err(EvalError::LearnerIndex {
                index: learner_index,
                count,
            });
        };
        let Some(stats) = slot.as_mut() else {
            return Err(EvalError::Evaluator {
                evaluator: self.name.clone(),
                message: format!("{} predicted before initialisation", learner.name()),
            });
        };

        let weight = row.weight();
        if weight == 0.0 {
            trace!("skipping zero-weight row for learner {}", learner_index);
            return Ok(());
        }
        let Some(true_class) = row.class_index(&stats.target)? else {
            trace!(
                "skipping row without a true class for learner {}",
                learner_index
            );
            return Ok(());
        };
        let predicted = prediction.class_index(&stats.target)?;

        stats.observe(weight, true_class, predicted);
        Ok(())
    }
}
