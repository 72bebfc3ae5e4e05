/// A sample offered to an [`Estimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Value(f64),
    /// The statistic does not apply to this observation; skipped, not zero
    NotApplicable,
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::Value(value)
    }
}

/// Running mean over accepted samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Estimator {
    sum: f64,
    count: u64,
}

impl Estimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, sample: Sample) {
        if let Sample::Value(value) = sample {
            self.sum += value;
            self.count += 1;
        }
    }

    /// Mean of the accepted values, 0 while nothing was accepted.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}
