//! Linear model diagnostics
//!
//! This module provides diagnostic tools for fitted linear models: leverage,
//! Cook's distance, variance inflation factors and the Durbin-Watson
//! statistic.

use ndarray::{Axis, concatenate};
use serde::{Deserialize, Serialize};

use crate::base::{ModelError, Result};
use crate::lm::FittedModel;
use ro_core::linalg::{DEFAULT_RANK_TOLERANCE, Matrix, Qr, Vector};

/// Diagnostic results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticResults {
    /// Hat matrix diagonal
    pub leverage: Vector,
    /// Cook's distance per observation
    pub cooks_distance: Vector,
    /// Variance Inflation Factors
    pub vif: Vec<Vif>,
    /// Durbin-Watson statistic
    pub durbin_watson: DurbinWatson,
    /// Observations whose Cook's distance exceeds `4/n`
    pub influential: Vec<InfluencePoint>,
    /// Observations whose leverage exceeds `2p/n`
    pub high_leverage: Vec<LeveragePoint>,
}

/// Variance Inflation Factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vif {
    pub variable: String,
    pub vif: f64,
    pub tolerance: f64,
}

/// Durbin-Watson test
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurbinWatson {
    pub statistic: f64,
    pub autocorrelation: f64,
}

/// Influential observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InfluencePoint {
    pub index: usize,
    pub cooks_distance: f64,
    pub leverage: f64,
    pub threshold: f64,
}

/// High leverage point
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LeveragePoint {
    pub index: usize,
    pub leverage: f64,
    pub threshold: f64,
}

/// Diagonal of the hat matrix `X (XᵀX)⁻¹ Xᵀ`
pub fn leverage(model: &FittedModel) -> Vector {
    let projected = model.x.dot(&model.xtx_inv);
    (&projected * &model.x).sum_axis(Axis(1))
}

/// `σ²`, rejecting fits whose residuals are zero up to rounding
fn residual_variance(model: &FittedModel, operation: &str) -> Result<f64> {
    let scale = model.y.dot(&model.y);
    if !(model.rss() > f64::EPSILON * scale) {
        return Err(ModelError::numerical(
            "residual variance is zero, the fit is exact",
            operation,
        ));
    }
    Ok(model.residual_std_error().powi(2))
}

/// Cook's distance `Dᵢ = eᵢ² hᵢ / (p σ² (1 − hᵢ)²)`.
///
/// Undefined for an exact fit, which is reported as
/// [`ModelError::NumericalError`].
pub fn cooks_distance(model: &FittedModel) -> Result<Vector> {
    let sigma2 = residual_variance(model, "cooks_distance")?;
    let h = leverage(model);
    let p = model.coefficients.len() as f64;

    Ok(model
        .residuals
        .iter()
        .zip(h.iter())
        .map(|(&e, &hi)| e * e * hi / (p * sigma2 * (1.0 - hi).powi(2)))
        .collect())
}

/// Observations with Cook's distance above `threshold` (default `4/n`)
pub fn influential_points(
    model: &FittedModel,
    threshold: Option<f64>,
) -> Result<Vec<InfluencePoint>> {
    let h = leverage(model);
    let cooks = cooks_distance(model)?;
    let threshold = threshold.unwrap_or(4.0 / cooks.len() as f64);

    Ok(cooks
        .iter()
        .zip(h.iter())
        .enumerate()
        .filter(|(_, (d, _))| **d > threshold)
        .map(|(index, (&cooks_distance, &leverage))| InfluencePoint {
            index,
            cooks_distance,
            leverage,
            threshold,
        })
        .collect())
}

/// Observations with leverage above `2p/n`
pub fn high_leverage(model: &FittedModel) -> Vec<LeveragePoint> {
    let h = leverage(model);
    let threshold = 2.0 * model.coefficients.len() as f64 / h.len() as f64;

    h.iter()
        .enumerate()
        .filter(|(_, hi)| **hi > threshold)
        .map(|(index, &leverage)| LeveragePoint {
            index,
            leverage,
            threshold,
        })
        .collect()
}

/// Calculate Durbin-Watson statistic; all-zero residuals are an error
pub fn durbin_watson(residuals: &Vector) -> Result<DurbinWatson> {
    let sum_sq_diff: f64 = residuals
        .windows(2)
        .into_iter()
        .map(|w| (w[1] - w[0]).powi(2))
        .sum();
    let sum_sq = residuals.dot(residuals);
    if !(sum_sq > 0.0) {
        return Err(ModelError::numerical(
            "residuals are all zero",
            "durbin_watson",
        ));
    }

    let dw = sum_sq_diff / sum_sq;

    Ok(DurbinWatson {
        statistic: dw,
        autocorrelation: 1.0 - dw / 2.0,
    })
}

/// Variance inflation factor of every predictor.
///
/// Each predictor is regressed on the others plus an intercept;
/// `VIF = 1 / (1 − R²)`. A constant predictor reports an infinite VIF.
pub fn vif(model: &FittedModel) -> Result<Vec<Vif>> {
    let offset = usize::from(model.has_intercept);
    let n = model.x.nrows();
    let ones = Matrix::ones((n, 1));

    model
        .predictors
        .iter()
        .enumerate()
        .map(|(j, name)| -> Result<Vif> {
            let col = offset + j;
            let target = model.x.column(col).to_owned();
            let others: Vec<usize> = (offset..model.x.ncols()).filter(|&c| c != col).collect();
            let rest = model.x.select(Axis(1), &others);
            let design = concatenate(Axis(1), &[ones.view(), rest.view()])
                .map_err(|e| ModelError::numerical(e.to_string(), "vif"))?;

            let beta = Qr::new(&design, DEFAULT_RANK_TOLERANCE)
                .and_then(|qr| qr.solve_least_squares(&target))
                .map_err(|e| ModelError::numerical(e.to_string(), "vif"))?;

            let resid = &target - &design.dot(&beta);
            let rss = resid.dot(&resid);
            let mean = target.sum() / n as f64;
            let tss = target.mapv(|v| (v - mean).powi(2)).sum();

            let vif = if tss == 0.0 {
                f64::INFINITY
            } else {
                tss / rss
            };

            Ok(Vif {
                variable: name.clone(),
                vif,
                tolerance: 1.0 / vif,
            })
        })
        .collect()
}

/// Run all diagnostics
pub fn run_all(model: &FittedModel) -> Result<DiagnosticResults> {
    Ok(DiagnosticResults {
        leverage: leverage(model),
        cooks_distance: cooks_distance(model)?,
        vif: vif(model)?,
        durbin_watson: durbin_watson(&model.residuals)?,
        influential: influential_points(model, None)?,
        high_leverage: high_leverage(model),
    })
}

impl FittedModel {
    /// Run all diagnostics on the training fit
    pub fn diagnostics(&self) -> Result<DiagnosticResults> {
        run_all(self)
    }
}
