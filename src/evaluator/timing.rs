use std::sync::Arc;
use std::time::{Duration, Instant};

use strum::IntoEnumIterator;
use tracing::{debug, trace};

use crate::config::TimingConfig;
use crate::dataset::{Dataset, Headers, Row};
use crate::learner::Learner;
use crate::metric::Metric;
use crate::{EvalError, EvalResult};

use super::Evaluator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Initialise,
    Train,
    Predict,
}

impl Phase {
    fn slot(self) -> usize {
        match self {
            Phase::Initialise => 0,
            Phase::Train => 1,
            Phase::Predict => 2,
        }
    }
}

/// Monotonic time source.
#[mockall::automock]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Default, Clone)]
struct LearnerTimes {
    started: [Option<Instant>; 3],
    elapsed: [Duration; 3],
}

/// Wall-clock time each learner spends in the enabled phases.
pub struct TimingEvaluator {
    name: String,
    config: TimingConfig,
    clock: Box<dyn Clock>,
    times: Vec<LearnerTimes>,
}

impl Default for TimingEvaluator {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}

impl TimingEvaluator {
    pub fn new(config: TimingConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: TimingConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            name: "timing".to_string(),
            config,
            clock,
            times: Vec::new(),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_enabled(&self, phase: Phase) -> bool {
        match phase {
            Phase::Initialise => self.config.initialise,
            Phase::Train => self.config.train,
            Phase::Predict => self.config.predict,
        }
    }

    /// Accumulated time of one learner in one phase.
    pub fn elapsed(&self, learner_index: usize, phase: Phase) -> Duration {
        self.times
            .get(learner_index)
            .map_or(Duration::ZERO, |t| t.elapsed[phase.slot()])
    }

    /// Accumulated time of one learner over all phases.
    pub fn total(&self, learner_index: usize) -> Duration {
        Phase::iter()
            .map(|phase| self.elapsed(learner_index, phase))
            .sum()
    }

    fn times_mut(&mut self, learner_index: usize) -> EvalResult<&mut LearnerTimes> {
        let count = self.times.len();
        self.times
            .get_mut(learner_index)
            .ok_or(EvalError::LearnerIndex {
                index: learner_index,
                count,
            })
    }

    fn start(&mut self, learner_index: usize, phase: Phase) -> EvalResult<()> {
        if !self.is_enabled(phase) {
            return Ok(());
        }
        let now = self.clock.now();
        self.times_mut(learner_index)?.started[phase.slot()] = Some(now);
        Ok(())
    }

    fn stop(&mut self, learner_index: usize, phase: Phase) -> EvalResult<()> {
        if !self.is_enabled(phase) {
            return Ok(());
        }
        let now = self.clock.now();
        let times = self.times_mut(learner_index)?;
        let Some(started) = times.started[phase.slot()].take() else {
            trace!("{} of learner {} stopped without a start", phase, learner_index);
            return Ok(());
        };
        let elapsed = now.saturating_duration_since(started);
        times.elapsed[phase.slot()] += elapsed;
        trace!("{} of learner {} took {:?}", phase, learner_index, elapsed);
        Ok(())
    }
}

impl Evaluator for TimingEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    /// Seconds per learner, or their sum when configured.
    fn metric(&self) -> Metric {
        let totals: Vec<f64> = (0..self.times.len())
            .map(|i| self.total(i).as_secs_f64())
            .collect();
        if self.config.sum_over_learners {
            Metric::Aggregate(totals.iter().sum())
        } else {
            Metric::PerLearner(totals)
        }
    }

    fn pre_evaluate(&mut self, learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        debug!("timing {} learners", learners.len());
        self.times = vec![LearnerTimes::default(); learners.len()];
        Ok(())
    }

    fn pre_initialise(
        &mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _headers: &Arc<Headers>,
    ) -> EvalResult<()> {
        self.start(learner_index, Phase::Initialise)
    }

    fn post_initialise(&mut self, learner_index: usize, _learner: &dyn Learner) -> EvalResult<()> {
        self.stop(learner_index, Phase::Initialise)
    }

    fn pre_train(
        &mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _dataset: &dyn Dataset,
    ) -> EvalResult<()> {
        self.start(learner_index, Phase::Train)
    }

    fn post_train(&mut self, learner_index: usize, _learner: &dyn Learner) -> EvalResult<()> {
        self.stop(learner_index, Phase::Train)
    }

    fn pre_predict(
        &mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _row: &Row,
    ) -> EvalResult<()> {
        self.start(learner_index, Phase::Predict)
    }

    fn post_predict(
        &mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _row: &Row,
        _prediction: &Row,
    ) -> EvalResult<()> {
        self.stop(learner_index, Phase::Predict)
    }
}
