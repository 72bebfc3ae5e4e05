#[derive(Debug, Clone)]
pub struct FormatterConfig {
    pub indent_spaces: usize,
    /// Digits after the decimal point
    pub precision: usize,
    /// Prefix of per-learner section headings
    pub learner_label: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            indent_spaces: 2,
            precision: 4,
            learner_label: "learner".to_string(),
        }
    }
}
