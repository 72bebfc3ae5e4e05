//! Deterministic text rendering of [`Metric`](crate::metric::Metric) trees.

pub mod config;
pub mod visitor;

use crate::metric::Metric;
pub use config::FormatterConfig;
use visitor::FormatterVisitor;

pub struct MetricFormatter {
    config: FormatterConfig,
}

impl MetricFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, metric: &Metric) -> String {
        let mut visitor = FormatterVisitor::new(self.config.clone());
        visitor.format_root(metric)
    }
}
