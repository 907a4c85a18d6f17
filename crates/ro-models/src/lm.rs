//! Linear regression models
//!
//! This module provides ordinary least squares fitting and the tools built on
//! top of it:
//! - `ols`: the model builder and the least squares fit
//! - `result`: the immutable fitted model
//! - `predict`: point predictions and interval estimates
//! - `stepwise`: AIC-driven forward/backward variable selection
//! - `diagnostics`: leverage and influence measures
//!
//! Models are specified with R-style formulas via the formula module, or
//! directly by column names.

pub mod diagnostics;
pub mod ols;
pub mod predict;
pub mod result;
pub mod stepwise;


// Re-exports
pub use ols::LinearRegression;
pub use predict::{Interval, Prediction, predict};
pub use result::FittedModel;
pub use stepwise::{
    Direction, SelectionStep, StepAction, Stepwise, StepwiseConfig, StepwiseResult,
    select_backward, select_forward,
};

// Common types
use crate::base::{ModelError, Result};
use ro_core::data::DataFrame;
use ro_core::linalg::DEFAULT_RANK_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Linear model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    /// Whether to include intercept
    pub intercept: bool,
    /// Confidence level for coefficient intervals
    pub confidence_level: f64,
    /// Relative tolerance for detecting collinear design columns
    pub singular_tolerance: f64,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            intercept: true,
            confidence_level: 0.95,
            singular_tolerance: DEFAULT_RANK_TOLERANCE,
        }
    }
}

impl LinearConfig {
    /// Set whether to fit an intercept
    pub fn with_intercept(mut self, intercept: bool) -> Self {
        self.intercept = intercept;
        self
    }

    /// Set the coefficient confidence level
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Set the collinearity tolerance
    pub fn with_singular_tolerance(mut self, tolerance: f64) -> Self {
        self.singular_tolerance = tolerance;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ModelError::invalid_config(format!(
                "confidence level must lie in (0, 1), got {}",
                self.confidence_level
            )));
        }
        if !(self.singular_tolerance >= 0.0 && self.singular_tolerance.is_finite()) {
            return Err(ModelError::invalid_config(format!(
                "singular tolerance must be finite and non-negative, got {}",
                self.singular_tolerance
            )));
        }
        Ok(())
    }
}

/// Fit `response ~ predictors` by OLS with an intercept
pub fn fit<S: AsRef<str>>(
    train: &DataFrame,
    predictors: &[S],
    response: &str,
) -> Result<FittedModel> {
    LinearRegression::from_names(response, predictors)
        .data(train)
        .fit()
}

/// Convenience function for OLS regression
pub fn lm(formula: &str, data: &DataFrame) -> Result<FittedModel> {
    LinearRegression::new(formula)?.data(data).fit()
}
