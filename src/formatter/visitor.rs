use crate::formatter::config::FormatterConfig;
use crate::metric::Metric;

/// Walks a metric tree and writes one line per value, nesting by indentation.
///
/// Every learner of a `PerLearner` or `PerLearnerGroup` gets its own section,
/// at whatever depth the metric sits.
pub struct FormatterVisitor {
    config: FormatterConfig,
    indent_level: usize,
    lines: Vec<String>,
}

impl FormatterVisitor {
    pub fn new(config: FormatterConfig) -> Self {
        Self {
            config,
            indent_level: 0,
            lines: Vec::new(),
        }
    }

    pub fn format_root(&mut self, metric: &Metric) -> String {
        match metric {
            Metric::Aggregate(value) => {
                let value = self.number(*value);
                self.write_line(&value);
            }
            _ => self.format_body(metric),
        }
        self.lines.join("\n")
    }

    fn format_entry(&mut self, name: &str, metric: &Metric) {
        match metric {
            Metric::Aggregate(value) => {
                let line = format!("{}: {}", name, self.number(*value));
                self.write_line(&line);
            }
            _ => {
                self.write_line(&format!("{}:", name));
                self.indent();
                self.format_body(metric);
                self.dedent();
            }
        }
    }

    fn format_body(&mut self, metric: &Metric) {
        match metric {
            Metric::Aggregate(value) => {
                let value = self.number(*value);
                self.write_line(&value);
            }
            Metric::PerLearner(values) => {
                for (learner, value) in values.iter().enumerate() {
                    let line = format!("{}: {}", self.learner(learner), self.number(*value));
                    self.write_line(&line);
                }
            }
            Metric::Group(entries) => {
                for (name, entry) in entries {
                    self.format_entry(name, entry);
                }
            }
            Metric::PerLearnerGroup(maps) => {
                for (learner, map) in maps.iter().enumerate() {
                    let heading = format!("{}:", self.learner(learner));
                    self.write_line(&heading);
                    self.indent();
                    for (name, value) in map {
                        let line = format!("{}: {}", name, self.number(*value));
                        self.write_line(&line);
                    }
                    self.dedent();
                }
            }
        }
    }

    fn number(&self, value: f64) -> String {
        format!("{:.*}", self.config.precision, value)
    }

    fn learner(&self, index: usize) -> String {
        format!("{} {}", self.config.learner_label, index)
    }

    fn write_line(&mut self, text: &str) {
        let indent = " ".repeat(self.indent_level * self.config.indent_spaces);
        self.lines.push(format!("{}{}", indent, text));
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}
