use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stream_eval::{
    dataset::{Column, Dataset, Headers, InMemoryDataset, Row, RowProjection, Value},
    evaluator::{Evaluator, RowCallback},
    learner::{Learner, LearnerError, LearnerResult},
    protocol::{EvaluationProtocol, EvaluationStep, ProtocolError, StepIterator},
    Capability, EvalError, EvalResult, LearnerType, Metric,
};

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub const LABELS: [&str; 3] = ["a", "b", "c"];

pub fn headers() -> Arc<Headers> {
    Arc::new(Headers::new(vec![
        Column::numeric("x"),
        Column::categorical("class", &LABELS),
    ]))
}

pub fn row(x: f64, class: Option<usize>) -> Row {
    Row::new(
        headers(),
        vec![Some(Value::Number(x)), class.map(Value::Category)],
    )
    .unwrap()
}

/// One row per class entry, `x` counting up from 0.
pub fn dataset(classes: &[Option<usize>]) -> InMemoryDataset {
    let rows = classes
        .iter()
        .enumerate()
        .map(|(i, &class)| row(i as f64, class))
        .collect();
    InMemoryDataset::new(headers(), rows)
}

pub fn x_of(row: &Row) -> Option<f64> {
    row.get_value("x").ok().flatten().and_then(Value::as_number)
}

pub fn classifier_type() -> LearnerType {
    LearnerType::from(vec![Capability::Classifier, Capability::SingleTarget])
}

pub enum Prediction {
    /// Answers from a fixed list, then predicts nothing
    Script(VecDeque<Option<usize>>),
    Constant(Option<usize>),
    /// Declares the target as an input and predicts whatever it can read there
    Peek,
}

/// Learner with a fixed prediction rule that records what it is asked to do.
pub struct ScriptedLearner {
    name: String,
    prediction: Prediction,
    capabilities: LearnerType,
    log: Option<Log>,
    headers: Option<Arc<Headers>>,
    output: Option<Arc<Headers>>,
}

impl ScriptedLearner {
    /// Predicts no class.
    pub fn new(name: &str) -> Self {
        Self::answering(name, &[])
    }

    pub fn answering(name: &str, classes: &[Option<usize>]) -> Self {
        Self::with_prediction(name, Prediction::Script(classes.iter().copied().collect()))
    }

    pub fn peeking(name: &str) -> Self {
        Self::with_prediction(name, Prediction::Peek)
    }

    pub fn constant(name: &str, class: Option<usize>) -> Self {
        Self::with_prediction(name, Prediction::Constant(class))
    }

    fn with_prediction(name: &str, prediction: Prediction) -> Self {
        Self {
            name: name.to_string(),
            prediction,
            capabilities: classifier_type(),
            log: None,
            headers: None,
            output: None,
        }
    }

    pub fn with_type(mut self, capabilities: LearnerType) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_log(mut self, log: Log) -> Self {
        self.log = Some(log);
        self
    }

    fn record(&self, entry: String) {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(entry);
        }
    }
}

#[async_trait]
impl Learner for ScriptedLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, headers: &Arc<Headers>) -> LearnerResult<()> {
        let target = headers
            .column("class")
            .cloned()
            .ok_or_else(|| LearnerError::UnsupportedHeaders {
                learner: self.name.clone(),
                message: "no class column".to_string(),
            })?;
        self.headers = Some(headers.clone());
        self.output = Some(Arc::new(Headers::new(vec![target])));
        self.record(format!("{} initialise", self.name));
        Ok(())
    }

    fn initialised_type(&self) -> Option<LearnerType> {
        self.headers.as_ref().map(|_| self.capabilities.clone())
    }

    fn train_headers(&self) -> Option<&Arc<Headers>> {
        self.headers.as_ref()
    }

    fn predict_input_columns(&self) -> Vec<String> {
        match self.prediction {
            Prediction::Peek => vec!["x".to_string(), "class".to_string()],
            _ => vec!["x".to_string()],
        }
    }

    fn predict_output_headers(&self) -> Option<&Arc<Headers>> {
        self.output.as_ref()
    }

    async fn train(&mut self, dataset: &mut dyn Dataset) -> LearnerResult<()> {
        tokio::task::yield_now().await;
        let mut seen = 0;
        for row in dataset.row_iterator() {
            let row = row?;
            self.record(format!("{} sees row {}", self.name, x_of(&row).unwrap_or(-1.0)));
            seen += 1;
        }
        self.record(format!("{} trained on {}", self.name, seen));
        Ok(())
    }

    fn predict(&mut self, row: &RowProjection<'_>) -> LearnerResult<Row> {
        let output = self
            .output
            .clone()
            .ok_or_else(|| LearnerError::NotInitialised {
                learner: self.name.clone(),
            })?;
        let peeked = row.get_value("class");
        let class = match &mut self.prediction {
            Prediction::Script(answers) => answers.pop_front().flatten(),
            Prediction::Constant(class) => *class,
            Prediction::Peek => peeked
                .as_ref()
                .ok()
                .copied()
                .flatten()
                .and_then(Value::as_category),
        };
        if matches!(self.prediction, Prediction::Peek) && peeked.is_err() {
            self.record(format!("{} cannot read class", self.name));
        }
        self.record(format!("{} predict", self.name));
        Ok(Row::new(output, vec![class.map(Value::Category)])?)
    }
}

/// Evaluator logging every hook as "<name> <hook> [<learner index>]".
pub struct RecordingEvaluator {
    name: String,
    log: Log,
    observe_rows: bool,
    required: LearnerType,
}

impl RecordingEvaluator {
    pub fn new(name: &str, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            observe_rows: false,
            required: LearnerType::any(),
        }
    }

    pub fn observing_rows(mut self) -> Self {
        self.observe_rows = true;
        self
    }

    pub fn requiring(mut self, required: LearnerType) -> Self {
        self.required = required;
        self
    }

    fn record(&self, hook: &str, learner_index: Option<usize>) -> EvalResult<()> {
        let entry = match learner_index {
            Some(i) => format!("{} {} {}", self.name, hook, i),
            None => format!("{} {}", self.name, hook),
        };
        self.log.lock().unwrap().push(entry);
        Ok(())
    }
}

impl Evaluator for RecordingEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_type(&self) -> LearnerType {
        self.required.clone()
    }

    fn metric(&self) -> Metric {
        Metric::Aggregate(1.0)
    }

    fn pre_evaluate(&mut self, _learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        self.record("pre_evaluate", None)
    }

    fn post_evaluate(&mut self, _learners: &[Box<dyn Learner>]) -> EvalResult<()> {
        self.record("post_evaluate", None)
    }

    fn pre_initialise(
        &mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _headers: &Arc<Headers>,
    ) -> EvalResult<()> {
        self.record("pre_initialise", Some(learner_index))
    }

    fn post_initialise(&mut self, learner_index: usize, _learner: &dyn Learner) -> EvalResult<()> {
        self.record("post_initialise", Some(learner_index))
    }

    fn pre_train(
        &mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _dataset: &dyn Dataset,
    ) -> EvalResult<()> {
        self.record("pre_train", Some(learner_index))
    }

    fn post_train(&mut self, learner_index: usize, _learner: &dyn Learner) -> EvalResult<()> {
        self.record("post_train", Some(learner_index))
    }

    fn pre_predict(
        &mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _row: &Row,
    ) -> EvalResult<()> {
        self.record("pre_predict", Some(learner_index))
    }

    fn post_predict(
        &mut self,
        learner_index: usize,
        _learner: &dyn Learner,
        _row: &Row,
        _prediction: &Row,
    ) -> EvalResult<()> {
        self.record("post_predict", Some(learner_index))
    }

    fn row_callback<'a>(
        &'a mut self,
        _learner_index: usize,
        _learner: &dyn Learner,
        _dataset: &dyn Dataset,
    ) -> Option<RowCallback<'a>> {
        if !self.observe_rows {
            return None;
        }
        let name = self.name.clone();
        let log = self.log.clone();
        Some(Box::new(move |row: &Row| {
            log.lock()
                .unwrap()
                .push(format!("{} row {}", name, x_of(row).unwrap_or(-1.0)));
        }))
    }
}

/// Replays a fixed list of steps.
pub struct ScriptedProtocol {
    steps: Option<Vec<EvaluationStep>>,
}

impl ScriptedProtocol {
    pub fn new(steps: Vec<EvaluationStep>) -> Self {
        Self { steps: Some(steps) }
    }
}

impl EvaluationProtocol for ScriptedProtocol {
    fn steps(&mut self, _num_learners: usize) -> Result<StepIterator, ProtocolError> {
        let steps = self.steps.take().ok_or(ProtocolError::AlreadyConsumed)?;
        Ok(Box::new(steps.into_iter().map(Ok::<_, EvalError>)))
    }
}
