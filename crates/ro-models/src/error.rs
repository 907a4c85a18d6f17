//! Model-related error types

use thiserror::Error;

use ro_core::data::DataError;
use ro_core::distributions::DistributionError;
use ro_core::formula::FormulaError;

/// Model-related errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// A requested predictor or response column does not exist
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// Not enough rows to leave positive residual degrees of freedom
    #[error("Not enough data: {n_samples} samples for {n_parameters} parameters")]
    InsufficientData {
        /// Number of samples
        n_samples: usize,
        /// Number of estimated coefficients, intercept included
        n_parameters: usize,
    },

    /// The design matrix is singular or numerically collinear
    #[error("Degenerate fit: column '{column}' is collinear with earlier columns")]
    DegenerateFit {
        /// Design matrix column that is linearly dependent
        column: String,
    },

    /// Formula parsing error
    #[error("Formula error: {0}")]
    Formula(FormulaError),

    /// Data-related error
    #[error("Data error: {0}")]
    Data(DataError),

    /// Numerical computation error
    #[error("Numerical error: {message} (operation: {operation})")]
    NumericalError {
        /// Error message
        message: String,
        /// Operation that failed
        operation: String,
    },

    /// Invalid model configuration
    #[error("Invalid model configuration: {message}")]
    InvalidConfig {
        /// Configuration error message
        message: String,
    },
}

impl ModelError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        ModelError::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn numerical(message: impl Into<String>, operation: &str) -> Self {
        ModelError::NumericalError {
            message: message.into(),
            operation: operation.to_string(),
        }
    }
}

impl From<DataError> for ModelError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::ColumnNotFound(name) => ModelError::UnknownField(name),
            other => ModelError::Data(other),
        }
    }
}

impl From<FormulaError> for ModelError {
    fn from(err: FormulaError) -> Self {
        match err {
            FormulaError::VariableNotFound { variable, .. } => ModelError::UnknownField(variable),
            FormulaError::InvalidStructure { message } => ModelError::InvalidConfig { message },
            FormulaError::Data(data) => data.into(),
            other => ModelError::Formula(other),
        }
    }
}

impl From<DistributionError> for ModelError {
    fn from(err: DistributionError) -> Self {
        ModelError::numerical(err.to_string(), "distribution")
    }
}
