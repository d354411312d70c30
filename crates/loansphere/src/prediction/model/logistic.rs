use serde::Deserialize;

/// Linear model with a sigmoid link, thresholded into the positive class.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LogisticModel {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl LogisticModel {
    pub(crate) fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if n_classes != 2 {
            return Err(format!(
                "logistic estimator needs exactly two classes, got {n_classes}"
            ));
        }
        if self.coefficients.len() != n_features {
            return Err(format!(
                "{} coefficients for {n_features} features",
                self.coefficients.len()
            ));
        }
        if self.coefficients.iter().any(|weight| !weight.is_finite())
            || !self.intercept.is_finite()
        {
            return Err("coefficients and intercept must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold {} is outside 0..=1", self.threshold));
        }
        Ok(())
    }

    pub(crate) fn probability(&self, row: &[f64]) -> f64 {
        let margin: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(weight, value)| weight * value)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-margin).exp())
    }

    /// 1 selects the second declared class, 0 the first.
    pub(crate) fn predict_index(&self, row: &[f64]) -> usize {
        usize::from(self.probability(row) >= self.threshold)
    }
}
