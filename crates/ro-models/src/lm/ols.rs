//! Ordinary Least Squares (OLS) linear regression
//!
//! This module implements the standard linear regression model using the
//! ordinary least squares estimator, solved by Householder QR.

use log::{debug, warn};
use ndarray::{Axis, concatenate};

use crate::base::coefficient::INTERCEPT;
use crate::base::{ModelError, ModelStatistics, Result};
use crate::lm::{FittedModel, LinearConfig};
use ro_core::data::DataFrame;
use ro_core::distributions;
use ro_core::formula::{Formula, Term};
use ro_core::linalg::{LinalgError, Matrix, Qr, Vector};

// ==================== Linear Regression Model ====================

/// OLS linear regression model builder
///
/// ```ignore
/// let model = LinearRegression::new("mpg ~ wt + qsec + am")?
///     .data(&train)
///     .fit()?;
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegression<'a> {
    /// Model formula
    formula: Formula,
    /// Training data
    data: Option<&'a DataFrame>,
    /// Configuration
    config: LinearConfig,
}

impl<'a> LinearRegression<'a> {
    /// Create a new linear regression model from a formula string
    pub fn new(formula: &str) -> Result<Self> {
        let formula = Formula::parse(formula)?;

        Ok(Self {
            formula,
            data: None,
            config: LinearConfig::default(),
        })
    }

    /// Create a model for `response ~ predictors[0] + predictors[1] + ...`
    pub fn from_names<S: AsRef<str>>(response: &str, predictors: &[S]) -> Self {
        Self {
            formula: Formula::with_response(response, predictors),
            data: None,
            config: LinearConfig::default(),
        }
    }

    /// Set data for the model
    pub fn data(mut self, data: &'a DataFrame) -> Self {
        self.data = Some(data);
        self
    }

    /// Set configuration
    pub fn config(mut self, config: LinearConfig) -> Self {
        self.config = config;
        self
    }

    /// Disable intercept
    pub fn no_intercept(mut self) -> Self {
        self.config.intercept = false;
        self
    }

    /// The model formula
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Fit the OLS model
    pub fn fit(self) -> Result<FittedModel> {
        let data = self
            .data
            .ok_or_else(|| ModelError::invalid_config("no data provided"))?;
        self.config.validate()?;

        let response = self.formula.response()?.to_string();
        let predictors = self.formula.predictors(data)?;
        self.check_duplicates()?;

        let has_intercept = self.formula.has_intercept && self.config.intercept;
        let n = data.nrows();
        let p = predictors.len() + usize::from(has_intercept);

        if p == 0 {
            return Err(ModelError::invalid_config(
                "model has neither an intercept nor predictors",
            ));
        }
        if n <= p {
            return Err(ModelError::InsufficientData {
                n_samples: n,
                n_parameters: p,
            });
        }

        let y = data.column_f64(&response)?;
        let x = design_matrix(data, &predictors, has_intercept)?;

        let mut coefficient_names = Vec::with_capacity(p);
        if has_intercept {
            coefficient_names.push(INTERCEPT.to_string());
        }
        coefficient_names.extend(predictors.iter().cloned());

        // Fit using QR decomposition (numerically stable)
        let qr = Qr::new(&x, self.config.singular_tolerance)
            .map_err(|e| linalg_error(e, &coefficient_names))?;
        let coefficients = qr
            .solve_least_squares(&y)
            .map_err(|e| linalg_error(e, &coefficient_names))?;
        let xtx_inv = qr
            .xtx_inverse()
            .map_err(|e| linalg_error(e, &coefficient_names))?;

        let fitted_values = x.dot(&coefficients);
        let residuals = &y - &fitted_values;

        let model_statistics = model_statistics(&y, &residuals, p, has_intercept)?;
        if model_statistics.rss == 0.0 {
            warn!(
                "perfect fit for {} on {} rows: residual variance is zero",
                response, n
            );
        }

        let (standard_errors, t_statistics, p_values, ci_lower, ci_upper) = inference(
            &coefficients,
            &xtx_inv,
            &model_statistics,
            self.config.confidence_level,
        )?;

        let mut formula = Formula::with_response(&response, &predictors);
        if !has_intercept {
            formula = formula.without_intercept();
        }
        let formula = formula.to_string();

        debug!(
            "fitted {} on {} rows: rss={:.6}, r2={:.4}, aic={:.4}",
            formula, n, model_statistics.rss, model_statistics.r_squared, model_statistics.aic
        );

        Ok(FittedModel {
            formula,
            response,
            predictors,
            coefficient_names,
            has_intercept,
            coefficients,
            standard_errors,
            t_statistics,
            p_values,
            ci_lower,
            ci_upper,
            fitted_values,
            residuals,
            xtx_inv,
            x,
            y,
            model_statistics,
            confidence_level: self.config.confidence_level,
        })
    }

    fn check_duplicates(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for term in &self.formula.terms {
            if let Term::Variable(name) = term {
                if seen.contains(&name.as_str()) {
                    return Err(ModelError::invalid_config(format!(
                        "predictor '{}' is listed more than once",
                        name
                    )));
                }
                seen.push(name);
            }
        }
        Ok(())
    }
}

/// Design matrix `[1 | x₁ … xₚ]` for the named predictors
pub(crate) fn design_matrix(
    data: &DataFrame,
    predictors: &[String],
    intercept: bool,
) -> Result<Matrix> {
    let x = data.numeric_matrix(predictors)?;
    if !intercept {
        return Ok(x);
    }

    let ones = Matrix::ones((data.nrows(), 1));
    concatenate(Axis(1), &[ones.view(), x.view()])
        .map_err(|e| ModelError::numerical(e.to_string(), "design_matrix"))
}

fn linalg_error(err: LinalgError, names: &[String]) -> ModelError {
    match err {
        LinalgError::Singular { column } => ModelError::DegenerateFit {
            column: names
                .get(column)
                .cloned()
                .unwrap_or_else(|| format!("column {}", column)),
        },
        other => ModelError::numerical(other.to_string(), "least_squares"),
    }
}

/// Goodness-of-fit statistics from the response and residuals
fn model_statistics(
    y: &Vector,
    residuals: &Vector,
    p: usize,
    has_intercept: bool,
) -> Result<ModelStatistics> {
    let n = y.len();
    let n_f = n as f64;
    let df_residual = n - p;
    let df_model = if has_intercept { p - 1 } else { p };

    let rss = residuals.mapv(|r| r * r).sum();
    // Uncentered total sum of squares without an intercept, as R does
    let tss = if has_intercept {
        let mean = y.sum() / n_f;
        y.mapv(|yi| (yi - mean).powi(2)).sum()
    } else {
        y.mapv(|yi| yi * yi).sum()
    };

    let r_squared = if df_model == 0 || tss == 0.0 {
        0.0
    } else {
        1.0 - rss / tss
    };
    let adj_r_squared = 1.0
        - (1.0 - r_squared) * ((n - usize::from(has_intercept)) as f64 / df_residual as f64);
    let residual_std_error = (rss / df_residual as f64).sqrt();

    // A constant response leaves no variance to explain
    let (f_statistic, f_p_value) = if df_model == 0 || tss == 0.0 {
        (None, None)
    } else {
        let f_stat = ((tss - rss) / df_model as f64) / (rss / df_residual as f64);
        let f_p = distributions::f_survival(f_stat, df_model as f64, df_residual as f64)?;
        (Some(f_stat), Some(f_p))
    };

    let log_likelihood =
        -0.5 * n_f * ((2.0 * std::f64::consts::PI).ln() + (rss / n_f).ln() + 1.0);
    let n_params = (p + 1) as f64;
    let aic = -2.0 * log_likelihood + 2.0 * n_params;
    let bic = -2.0 * log_likelihood + n_f.ln() * n_params;

    Ok(ModelStatistics {
        n_obs: n,
        n_parameters: p,
        rss,
        tss,
        r_squared,
        adj_r_squared,
        residual_std_error,
        f_statistic,
        f_p_value,
        log_likelihood,
        aic,
        bic,
        df_residual,
        df_model,
    })
}

/// Standard errors, t statistics, p-values and confidence bounds
fn inference(
    coefficients: &Vector,
    xtx_inv: &Matrix,
    stats: &ModelStatistics,
    confidence_level: f64,
) -> Result<(Vector, Vector, Vector, Vector, Vector)> {
    let df = stats.df_residual as f64;
    let sigma2 = stats.residual_std_error.powi(2);

    let standard_errors: Vector = xtx_inv.diag().mapv(|v| (sigma2 * v).max(0.0).sqrt());

    let t_statistics: Vector = coefficients
        .iter()
        .zip(standard_errors.iter())
        .map(|(&coef, &se)| {
            if se > 0.0 {
                coef / se
            } else if coef == 0.0 {
                0.0
            } else {
                f64::INFINITY.copysign(coef)
            }
        })
        .collect();

    let p_values = t_statistics
        .iter()
        .map(|&t| distributions::t_two_sided_p_value(t, df))
        .collect::<std::result::Result<Vector, _>>()?;

    let t_crit = distributions::t_critical(confidence_level, df)?;
    let ci_lower = coefficients - &(&standard_errors * t_crit);
    let ci_upper = coefficients + &(&standard_errors * t_crit);

    Ok((standard_errors, t_statistics, p_values, ci_lower, ci_upper))
}
