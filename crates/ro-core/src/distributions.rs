//! Reference distributions for regression inference
//!
//! Thin wrappers over `statrs` returning typed errors, so callers can use `?`
//! instead of unwrapping distribution constructors.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Distribution errors
#[derive(Debug, thiserror::Error)]
pub enum DistributionError {
    #[error("Invalid parameters for {distribution}: {message}")]
    InvalidParameters {
        distribution: &'static str,
        message: String,
    },

    #[error("Probability must lie in (0, 1), got {0}")]
    InvalidProbability(f64),

    /// A test statistic evaluated to NaN
    #[error("{statistic} statistic is NaN")]
    NotANumber { statistic: &'static str },
}

pub type Result<T> = std::result::Result<T, DistributionError>;

fn students_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|e| DistributionError::InvalidParameters {
        distribution: "Student's t",
        message: e.to_string(),
    })
}

fn fisher_snedecor(df1: f64, df2: f64) -> Result<FisherSnedecor> {
    FisherSnedecor::new(df1, df2).map_err(|e| DistributionError::InvalidParameters {
        distribution: "F",
        message: e.to_string(),
    })
}

/// `P(T ≤ t)` for Student's t with `df` degrees of freedom
pub fn t_cdf(t: f64, df: f64) -> Result<f64> {
    Ok(students_t(df)?.cdf(t))
}

/// Two-sided p-value `P(|T| ≥ |t|)`
pub fn t_two_sided_p_value(t: f64, df: f64) -> Result<f64> {
    if t.is_nan() {
        return Err(DistributionError::NotANumber { statistic: "t" });
    }
    let dist = students_t(df)?;
    if t.is_infinite() {
        return Ok(0.0);
    }
    Ok((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Quantile function of Student's t: the `t` with `P(T ≤ t) = p`
pub fn t_quantile(p: f64, df: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(DistributionError::InvalidProbability(p));
    }
    Ok(students_t(df)?.inverse_cdf(p))
}

/// Critical value for a two-sided interval at `level` (e.g. 0.95)
pub fn t_critical(level: f64, df: f64) -> Result<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(DistributionError::InvalidProbability(level));
    }
    t_quantile(1.0 - (1.0 - level) / 2.0, df)
}

/// Upper tail `P(F ≥ f)` of the F distribution
pub fn f_survival(f: f64, df1: f64, df2: f64) -> Result<f64> {
    if f.is_nan() {
        return Err(DistributionError::NotANumber { statistic: "F" });
    }
    let dist = fisher_snedecor(df1, df2)?;
    if f.is_infinite() {
        return Ok(0.0);
    }
    Ok(dist.sf(f).clamp(0.0, 1.0))
}
