//! Linear regression models for RegOxide
//!
//! - `lm`: ordinary least squares fitting, prediction, stepwise AIC
//!   selection and diagnostics
//! - `compare`: side-by-side evaluation of fitted models on held-out rows
//! - `base`: coefficient tables, model statistics and summaries shared by
//!   the models

pub mod base;
pub mod compare;
pub mod error;
pub mod lm;

pub use base::{
    Coefficient, ModelStatistics, ModelSummary, RegressionResult, ResidualStatistics, Result,
};
pub use compare::{ComparisonMetrics, ComparisonRow, ModelComparison};
pub use error::ModelError;
pub use lm::{
    Direction, FittedModel, Interval, LinearConfig, LinearRegression, Prediction, SelectionStep,
    StepAction, Stepwise, StepwiseConfig, StepwiseResult, fit, lm, predict, select_backward,
    select_forward,
};
