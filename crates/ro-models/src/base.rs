//! Core traits and types for regression models
//!
//! This module defines the interface shared by fitted models and the
//! coefficient/statistics structures they report.

use ndarray::Array1;

use ro_core::data::DataFrame;

// Re-export core types
pub use coefficient::Coefficient;
pub use statistics::ModelStatistics;
pub use statistics::ResidualStatistics;
pub use summary::ModelSummary;

pub use crate::error::ModelError;

pub mod coefficient;
pub mod statistics;
pub mod summary;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Interface of a fitted regression model
pub trait RegressionResult: Send + Sync {
    /// Name of the response variable
    fn response(&self) -> &str;

    /// Predictor names, in coefficient order (intercept excluded)
    fn predictor_names(&self) -> &[String];

    /// Point predictions for every row of `data`
    fn predict(&self, data: &DataFrame) -> Result<Array1<f64>>;

    /// Get fitted values
    fn fitted_values(&self) -> &Array1<f64>;

    /// Get residuals
    fn residuals(&self) -> &Array1<f64>;

    /// Get model statistics
    fn statistics(&self) -> &ModelStatistics;
}
