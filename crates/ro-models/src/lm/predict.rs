//! Prediction from fitted linear models
//!
//! Point predictions plus interval estimates, either for the mean response
//! (confidence interval) or for a new observation (prediction interval).

use serde::{Deserialize, Serialize};

use crate::base::{ModelError, Result};
use crate::lm::FittedModel;
use ro_core::data::DataFrame;
use ro_core::distributions;

/// Kind of interval attached to predictions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Interval {
    /// Point predictions only
    None,
    /// Interval for the mean response at the given level
    Confidence(f64),
    /// Interval for a new observation at the given level
    Prediction(f64),
}

/// A single predicted value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted value ŷ
    pub fit: f64,
    /// Lower bound, when an interval was requested
    pub lower: Option<f64>,
    /// Upper bound, when an interval was requested
    pub upper: Option<f64>,
    /// Level of the interval
    pub level: Option<f64>,
}

impl FittedModel {
    /// Predict every row of `data`, optionally with intervals.
    ///
    /// Output order follows the input rows. Columns other than the model's
    /// predictors are ignored.
    pub fn predict_interval(&self, data: &DataFrame, interval: Interval) -> Result<Vec<Prediction>> {
        let (level, extra_variance) = match interval {
            Interval::None => {
                return Ok(self
                    .predict(data)?
                    .iter()
                    .map(|&fit| Prediction {
                        fit,
                        lower: None,
                        upper: None,
                        level: None,
                    })
                    .collect());
            }
            Interval::Confidence(level) => (level, 0.0),
            Interval::Prediction(level) => (level, 1.0),
        };

        if !(level > 0.0 && level < 1.0) {
            return Err(ModelError::invalid_config(format!(
                "interval level must lie in (0, 1), got {}",
                level
            )));
        }

        let x_new = self.new_design(data)?;
        let fits = x_new.dot(&self.coefficients);
        let sigma = self.residual_std_error();
        let t_crit = distributions::t_critical(level, self.df_residual() as f64)?;

        let predictions = x_new
            .rows()
            .into_iter()
            .zip(fits.iter())
            .map(|(x0, &fit)| {
                // x₀ᵀ (XᵀX)⁻¹ x₀
                let quad = x0.dot(&self.xtx_inv.dot(&x0));
                let half_width = t_crit * sigma * (quad.max(0.0) + extra_variance).sqrt();
                Prediction {
                    fit,
                    lower: Some(fit - half_width),
                    upper: Some(fit + half_width),
                    level: Some(level),
                }
            })
            .collect();

        Ok(predictions)
    }
}

/// Predict `data` with `model`; with a level, attach confidence intervals for
/// the mean response.
pub fn predict(
    model: &FittedModel,
    data: &DataFrame,
    confidence_level: Option<f64>,
) -> Result<Vec<Prediction>> {
    let interval = match confidence_level {
        Some(level) => Interval::Confidence(level),
        None => Interval::None,
    };
    model.predict_interval(data, interval)
}
