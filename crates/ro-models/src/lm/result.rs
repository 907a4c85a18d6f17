//! Fitted linear model
//!
//! This module defines the immutable result of an OLS fit: coefficient
//! estimates with their inference, the fitted values and residuals, and the
//! pieces of the design needed for interval prediction and diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::base::{
    Coefficient, ModelStatistics, ModelSummary, RegressionResult, ResidualStatistics, Result,
};
use crate::lm::ols::design_matrix;
use ro_core::data::DataFrame;
use ro_core::linalg::{Matrix, Vector};

/// OLS linear regression result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedModel {
    /// Canonical formula, e.g. `mpg ~ wt + qsec`
    pub(crate) formula: String,
    pub(crate) response: String,
    /// Predictor names in coefficient order
    pub(crate) predictors: Vec<String>,
    /// `(Intercept)` followed by the predictors, when fitted with intercept
    pub(crate) coefficient_names: Vec<String>,
    pub(crate) has_intercept: bool,
    /// Coefficients (β)
    pub(crate) coefficients: Vector,
    pub(crate) standard_errors: Vector,
    pub(crate) t_statistics: Vector,
    pub(crate) p_values: Vector,
    pub(crate) ci_lower: Vector,
    pub(crate) ci_upper: Vector,
    /// Fitted values (ŷ)
    pub(crate) fitted_values: Vector,
    /// Residuals (y - ŷ)
    pub(crate) residuals: Vector,
    /// (XᵀX)⁻¹
    pub(crate) xtx_inv: Matrix,
    /// Design matrix (X)
    pub(crate) x: Matrix,
    /// Response vector (y)
    pub(crate) y: Vector,
    pub(crate) model_statistics: ModelStatistics,
    pub(crate) confidence_level: f64,
}

impl FittedModel {
    /// Canonical formula of the fitted model
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Response variable name
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Predictor names, intercept excluded
    pub fn predictors(&self) -> &[String] {
        &self.predictors
    }

    /// Coefficient names, `(Intercept)` first when present
    pub fn coefficient_names(&self) -> &[String] {
        &self.coefficient_names
    }

    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    /// Estimated coefficients, in `coefficient_names` order
    pub fn coefficients(&self) -> &Vector {
        &self.coefficients
    }

    /// Estimate of a single coefficient by name
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.coefficient_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.coefficients[i])
    }

    /// The intercept, or `None` for a model fitted through the origin
    pub fn intercept(&self) -> Option<f64> {
        self.has_intercept.then(|| self.coefficients[0])
    }

    pub fn standard_errors(&self) -> &Vector {
        &self.standard_errors
    }

    pub fn t_statistics(&self) -> &Vector {
        &self.t_statistics
    }

    pub fn p_values(&self) -> &Vector {
        &self.p_values
    }

    /// Lower confidence bounds of the coefficients
    pub fn ci_lower(&self) -> &Vector {
        &self.ci_lower
    }

    /// Upper confidence bounds of the coefficients
    pub fn ci_upper(&self) -> &Vector {
        &self.ci_upper
    }

    /// Level used for the coefficient confidence intervals
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Get fitted values
    pub fn fitted_values(&self) -> &Vector {
        &self.fitted_values
    }

    /// Get residuals
    pub fn residuals(&self) -> &Vector {
        &self.residuals
    }

    /// (XᵀX)⁻¹ of the training design
    pub fn xtx_inverse(&self) -> &Matrix {
        &self.xtx_inv
    }

    /// Training design matrix, intercept column included
    pub fn design(&self) -> &Matrix {
        &self.x
    }

    /// Training response
    pub fn response_values(&self) -> &Vector {
        &self.y
    }

    pub fn statistics(&self) -> &ModelStatistics {
        &self.model_statistics
    }

    /// Number of observations
    pub fn n_obs(&self) -> usize {
        self.model_statistics.n_obs
    }

    /// Residual sum of squares
    pub fn rss(&self) -> f64 {
        self.model_statistics.rss
    }

    pub fn r_squared(&self) -> f64 {
        self.model_statistics.r_squared
    }

    pub fn adj_r_squared(&self) -> f64 {
        self.model_statistics.adj_r_squared
    }

    pub fn residual_std_error(&self) -> f64 {
        self.model_statistics.residual_std_error
    }

    pub fn df_residual(&self) -> usize {
        self.model_statistics.df_residual
    }

    pub fn aic(&self) -> f64 {
        self.model_statistics.aic
    }

    pub fn bic(&self) -> f64 {
        self.model_statistics.bic
    }

    /// Stepwise score `n·ln(RSS/n) + k·p`, with `p` the number of
    /// coefficients. Equal to R's `extractAIC` for Gaussian linear models.
    pub fn extract_aic(&self, k: f64) -> f64 {
        let n = self.model_statistics.n_obs as f64;
        let p = self.model_statistics.n_parameters as f64;
        n * (self.model_statistics.rss / n).ln() + k * p
    }

    /// Point predictions `Xβ` for the rows of `data`
    pub fn predict(&self, data: &DataFrame) -> Result<Vector> {
        Ok(self.new_design(data)?.dot(&self.coefficients))
    }

    /// Design matrix for new rows, with the training column layout
    pub(crate) fn new_design(&self, data: &DataFrame) -> Result<Matrix> {
        design_matrix(data, &self.predictors, self.has_intercept)
    }

    /// Convert coefficients to Coefficient structs
    pub fn to_coefficients(&self) -> Vec<Coefficient> {
        self.coefficient_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let coef = Coefficient::new(name.clone(), self.coefficients[i])
                    .with_std_error(self.standard_errors[i])
                    .with_t_stat(self.t_statistics[i])
                    .with_p_value(self.p_values[i])
                    .with_ci(self.ci_lower[i], self.ci_upper[i]);

                if self.has_intercept && i == 0 {
                    coef.as_intercept()
                } else {
                    coef
                }
            })
            .collect()
    }

    /// Residual quartiles of the training fit
    pub fn residual_statistics(&self) -> Option<ResidualStatistics> {
        ResidualStatistics::from_residuals(&self.residuals.to_vec())
    }

    /// Generate summary
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            formula: self.formula.clone(),
            n_obs: self.model_statistics.n_obs,
            coefficients: self.to_coefficients(),
            model_statistics: self.model_statistics,
            residual_statistics: self.residual_statistics(),
            confidence_level: self.confidence_level,
        }
    }
}

impl RegressionResult for FittedModel {
    fn response(&self) -> &str {
        &self.response
    }

    fn predictor_names(&self) -> &[String] {
        &self.predictors
    }

    fn predict(&self, data: &DataFrame) -> Result<Vector> {
        FittedModel::predict(self, data)
    }

    fn fitted_values(&self) -> &Vector {
        &self.fitted_values
    }

    fn residuals(&self) -> &Vector {
        &self.residuals
    }

    fn statistics(&self) -> &ModelStatistics {
        &self.model_statistics
    }
}

impl fmt::Display for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
