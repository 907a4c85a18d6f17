//! Statistical structures for model results

use serde::{Deserialize, Serialize};

use ro_core::data::quantile;

/// Goodness-of-fit statistics of a linear model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelStatistics {
    /// Number of observations
    pub n_obs: usize,
    /// Number of estimated coefficients, intercept included
    pub n_parameters: usize,
    /// Residual sum of squares
    pub rss: f64,
    /// Total sum of squares (centered when the model has an intercept)
    pub tss: f64,
    /// R-squared
    pub r_squared: f64,
    /// Adjusted R-squared
    pub adj_r_squared: f64,
    /// Residual standard error
    pub residual_std_error: f64,
    /// F-statistic, absent when the model has no slope terms
    pub f_statistic: Option<f64>,
    /// F-statistic p-value
    pub f_p_value: Option<f64>,
    /// Gaussian log-likelihood
    pub log_likelihood: f64,
    /// AIC (σ counted as a parameter)
    pub aic: f64,
    /// BIC (σ counted as a parameter)
    pub bic: f64,
    /// Residual degrees of freedom
    pub df_residual: usize,
    /// Model degrees of freedom
    pub df_model: usize,
}

/// Five-number summary plus moments of a residual vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualStatistics {
    /// Minimum residual
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Maximum residual
    pub max: f64,
    /// Mean residual
    pub mean: f64,
    /// Standard deviation
    pub std_dev: f64,
}

impl ResidualStatistics {
    /// Summarize `residuals`; `None` when empty
    pub fn from_residuals(residuals: &[f64]) -> Option<Self> {
        let n = residuals.len();
        if n == 0 {
            return None;
        }

        let mean = residuals.iter().sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            (residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            min: quantile(residuals, 0.0)?,
            q1: quantile(residuals, 0.25)?,
            median: quantile(residuals, 0.5)?,
            q3: quantile(residuals, 0.75)?,
            max: quantile(residuals, 1.0)?,
            mean,
            std_dev,
        })
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}
