//! Model summary structures

use super::coefficient::Coefficient;
use super::statistics::{ModelStatistics, ResidualStatistics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Printable summary of a fitted linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model formula
    pub formula: String,
    /// Number of observations
    pub n_obs: usize,
    /// Coefficients table
    pub coefficients: Vec<Coefficient>,
    /// Model statistics
    pub model_statistics: ModelStatistics,
    /// Residual statistics
    pub residual_statistics: Option<ResidualStatistics>,
    /// Level of the coefficient confidence intervals
    pub confidence_level: f64,
}

impl ModelSummary {
    /// Look up a coefficient row by name
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.model_statistics;

        writeln!(f, "Call:")?;
        writeln!(f, "lm(formula = {})", self.formula)?;
        writeln!(f)?;

        if let Some(resid) = &self.residual_statistics {
            writeln!(f, "Residuals:")?;
            writeln!(
                f,
                "{:>10} {:>10} {:>10} {:>10} {:>10}",
                "Min", "1Q", "Median", "3Q", "Max"
            )?;
            writeln!(
                f,
                "{:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                resid.min, resid.q1, resid.median, resid.q3, resid.max
            )?;
            writeln!(f)?;
        }

        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<16} {:>12} {:>12} {:>9} {:>10}",
            "", "Estimate", "Std. Error", "t value", "Pr(>|t|)"
        )?;
        for coeff in &self.coefficients {
            writeln!(
                f,
                "{:<16} {:>12.6} {:>12.6} {:>9.3} {:>10.4e} {}",
                coeff.name,
                coeff.estimate,
                coeff.std_error,
                coeff.t_stat,
                coeff.p_value,
                coeff.significance()
            )?;
        }
        writeln!(f, "---")?;
        writeln!(
            f,
            "Signif. codes:  0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1"
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "Residual standard error: {:.4} on {} degrees of freedom",
            stats.residual_std_error, stats.df_residual
        )?;
        writeln!(
            f,
            "Multiple R-squared: {:.4},\tAdjusted R-squared: {:.4}",
            stats.r_squared, stats.adj_r_squared
        )?;
        if let (Some(f_stat), Some(f_p)) = (stats.f_statistic, stats.f_p_value) {
            writeln!(
                f,
                "F-statistic: {:.2} on {} and {} DF,  p-value: {:.4e}",
                f_stat, stats.df_model, stats.df_residual, f_p
            )?;
        }
        writeln!(
            f,
            "Log-likelihood: {:.3},  AIC: {:.3},  BIC: {:.3}",
            stats.log_likelihood, stats.aic, stats.bic
        )?;

        Ok(())
    }
}
