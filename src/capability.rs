use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Semantic property a learner provides or an evaluator requires.
#[derive(
    Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Predicts a categorical target
    Classifier,
    /// Predicts a numeric target
    Regressor,
    /// Exactly one target column
    SingleTarget,
    /// More than one target column
    MultiTarget,
    /// Learns incrementally from a row stream
    Stream,
    /// Learns from a whole dataset at once
    Batch,

    #[strum(default)]
    Custom(String),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Classifier => write!(f, "Classifier"),
            Capability::Regressor => write!(f, "Regressor"),
            Capability::SingleTarget => write!(f, "SingleTarget"),
            Capability::MultiTarget => write!(f, "MultiTarget"),
            Capability::Stream => write!(f, "Stream"),
            Capability::Batch => write!(f, "Batch"),
            Capability::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Capability type of a learner, or the requirement of an evaluator.
///
/// A type is a set of capabilities. `A` is a subtype of `B` when `A` carries
/// every capability of `B`, so the empty type is satisfied by everything.
/// Ordered storage keeps the rendering stable in error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerType {
    capabilities: BTreeSet<Capability>,
}

impl From<Capability> for LearnerType {
    fn from(capability: Capability) -> Self {
        let mut capabilities = BTreeSet::new();
        capabilities.insert(capability);
        Self { capabilities }
    }
}

impl From<Vec<Capability>> for LearnerType {
    fn from(capabilities: Vec<Capability>) -> Self {
        Self {
            capabilities: capabilities.into_iter().collect(),
        }
    }
}

impl LearnerType {
    /// The requirement every learner satisfies.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn push(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    pub fn supports(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn is_subtype_of(&self, required: &LearnerType) -> bool {
        required.capabilities.is_subset(&self.capabilities)
    }

    /// Intersection type: a learner must satisfy both `self` and `other`.
    pub fn intersect(&self, other: &LearnerType) -> LearnerType {
        Self {
            capabilities: self
                .capabilities
                .union(&other.capabilities)
                .cloned()
                .collect(),
        }
    }

    /// Capabilities of `required` that this type does not carry.
    pub fn missing(&self, required: &LearnerType) -> Vec<Capability> {
        required
            .capabilities
            .difference(&self.capabilities)
            .cloned()
            .collect()
    }

    pub fn list(&self) -> Vec<&Capability> {
        self.capabilities.iter().collect()
    }

    pub fn is_any(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl fmt::Display for LearnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.capabilities.is_empty() {
            return write!(f, "{{Any}}");
        }
        let names: Vec<String> = self.capabilities.iter().map(|c| c.to_string()).collect();
        write!(f, "{{{}}}", names.join(" & "))
    }
}
