use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{EvalError, EvalResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_classification_config")]
    pub classification: Option<ClassificationConfig>,

    #[serde(default = "default_timing_config")]
    pub timing: Option<TimingConfig>,

    /// Count rows delivered to learners during training
    #[serde(default = "default_true")]
    pub row_count: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            classification: default_classification_config(),
            timing: default_timing_config(),
            row_count: default_true(),
        }
    }
}

/// Optional outputs of the classification performance evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationConfig {
    #[serde(default = "default_true")]
    pub f1: bool,

    #[serde(default)]
    pub precision_per_class: bool,

    #[serde(default)]
    pub recall_per_class: bool,

    #[serde(default)]
    pub f1_per_class: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            f1: default_true(),
            precision_per_class: false,
            recall_per_class: false,
            f1_per_class: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_true")]
    pub initialise: bool,

    #[serde(default = "default_true")]
    pub train: bool,

    #[serde(default = "default_true")]
    pub predict: bool,

    /// Report one total instead of one duration per learner
    #[serde(default)]
    pub sum_over_learners: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initialise: default_true(),
            train: default_true(),
            predict: default_true(),
            sum_over_learners: false,
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> EvalResult<T> {
    let file = File::open(path)
        .map_err(|e| EvalError::config(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| EvalError::config(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> EvalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| EvalError::config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

impl EvaluationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> EvalResult<Self> {
        from_file(path)
    }
}

fn default_true() -> bool {
    true
}

fn default_classification_config() -> Option<ClassificationConfig> {
    Some(ClassificationConfig::default())
}

fn default_timing_config() -> Option<TimingConfig> {
    Some(TimingConfig::default())
}
