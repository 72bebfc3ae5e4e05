//! Hierarchical result tree produced by evaluators.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::formatter::{FormatterConfig, MetricFormatter};

/// Result of an evaluator.
///
/// The shape is fixed by the evaluator's configuration and the number of
/// evaluated learners. Entry order is insertion order and is kept when
/// rendering or serialising.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Aggregate(f64),
    /// One value per learner, by learner index
    PerLearner(Vec<f64>),
    #[serde(serialize_with = "ordered_map")]
    Group(Vec<(String, Metric)>),
    /// One named map per learner, by learner index
    #[serde(serialize_with = "ordered_maps")]
    PerLearnerGroup(Vec<Vec<(String, f64)>>),
}

impl Metric {
    /// `Aggregate` for a single learner, `PerLearner` otherwise.
    pub fn scalar(values: Vec<f64>) -> Metric {
        match values.as_slice() {
            [single] => Metric::Aggregate(*single),
            _ => Metric::PerLearner(values),
        }
    }

    /// `Group` of aggregates for a single learner, `PerLearnerGroup` otherwise.
    pub fn named(mut maps: Vec<Vec<(String, f64)>>) -> Metric {
        if maps.len() == 1 {
            let entries = maps
                .remove(0)
                .into_iter()
                .map(|(name, value)| (name, Metric::Aggregate(value)))
                .collect();
            Metric::Group(entries)
        } else {
            Metric::PerLearnerGroup(maps)
        }
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        match self {
            Metric::Group(entries) => entries.iter().find(|(n, _)| n == name).map(|(_, m)| m),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<f64> {
        match self {
            Metric::Aggregate(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_per_learner(&self) -> Option<&[f64]> {
        match self {
            Metric::PerLearner(values) => Some(values),
            _ => None,
        }
    }

    /// Scalar value of one learner regardless of the scalar shape.
    pub fn learner_value(&self, learner: usize) -> Option<f64> {
        match self {
            Metric::Aggregate(value) if learner == 0 => Some(*value),
            Metric::PerLearner(values) => values.get(learner).copied(),
            _ => None,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            Metric::Group(entries) => entries.iter().map(|(n, _)| n.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = MetricFormatter::new(FormatterConfig::default()).format(self);
        write!(f, "{}", rendered)
    }
}

fn ordered_map<S: Serializer>(entries: &[(String, Metric)], s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

fn ordered_maps<S: Serializer>(maps: &[Vec<(String, f64)>], s: S) -> Result<S::Ok, S::Error> {
    struct OrderedMap<'a>(&'a [(String, f64)]);

    impl Serialize for OrderedMap<'_> {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_map(self.0.iter().map(|(k, v)| (k, v)))
        }
    }

    s.collect_seq(maps.iter().map(|m| OrderedMap(m)))
}
