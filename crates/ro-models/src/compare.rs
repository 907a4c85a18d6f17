//! Side-by-side evaluation of fitted models on held-out data
//!
//! Every model added to a [`ModelComparison`] predicts the same test frame.
//! The results are exposed as one row per (record, model) pair, the long
//! format plotting tools expect, along with per-model error metrics and
//! residual summaries for box plots.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::base::{ModelError, RegressionResult, ResidualStatistics, Result};
use ro_core::data::{DataFrame, Series};

#[cfg(test)]
mod tests;

/// One prediction of one model for one test record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Record identifier (index label or row position)
    pub record: String,
    /// Model name
    pub model: String,
    pub actual: f64,
    pub predicted: f64,
    /// `actual − predicted`
    pub residual: f64,
}

/// Test-set accuracy of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub model: String,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// `1 − SSE/SST` on the test rows; may be negative
    pub r_squared: f64,
}

/// Predictions of several models on a shared test frame
#[derive(Debug, Clone)]
pub struct ModelComparison {
    test: DataFrame,
    records: Vec<String>,
    actual: Array1<f64>,
    response: String,
    models: Vec<(String, Array1<f64>)>,
}

impl ModelComparison {
    /// Prepare a comparison on `test`, reading the observed `response`
    pub fn new(test: &DataFrame, response: &str) -> Result<Self> {
        let actual = test.column_f64(response)?;
        let records = (0..test.nrows())
            .map(|i| test.record_id(i))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            test: test.clone(),
            records,
            actual,
            response: response.to_string(),
            models: Vec::new(),
        })
    }

    /// Predict the test rows with `model` and store them under `name`
    pub fn add_model<M>(&mut self, name: &str, model: &M) -> Result<&mut Self>
    where
        M: RegressionResult + ?Sized,
    {
        if self.models.iter().any(|(n, _)| n == name) {
            return Err(ModelError::invalid_config(format!(
                "model '{}' already added",
                name
            )));
        }
        if model.response() != self.response {
            return Err(ModelError::invalid_config(format!(
                "model '{}' predicts '{}', comparison is on '{}'",
                name,
                model.response(),
                self.response
            )));
        }
        let predicted = model.predict(&self.test)?;
        self.models.push((name.to_string(), predicted));
        Ok(self)
    }

    /// Model names, in insertion order
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Observed response on the test rows
    pub fn actual(&self) -> &Array1<f64> {
        &self.actual
    }

    /// Long-format rows: models in insertion order, records in test order
    pub fn rows(&self) -> Vec<ComparisonRow> {
        self.models
            .iter()
            .flat_map(|(name, predicted)| {
                self.records
                    .iter()
                    .zip(self.actual.iter().zip(predicted.iter()))
                    .map(move |(record, (&actual, &predicted))| ComparisonRow {
                        record: record.clone(),
                        model: name.clone(),
                        actual,
                        predicted,
                        residual: actual - predicted,
                    })
            })
            .collect()
    }

    /// The rows as a DataFrame with columns
    /// `record, model, actual, predicted, residual`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let rows = self.rows();

        let df = DataFrame::from_columns([
            (
                "record",
                Series::string(rows.iter().map(|r| r.record.clone()).collect::<Vec<_>>()),
            ),
            (
                "model",
                Series::string(rows.iter().map(|r| r.model.clone()).collect::<Vec<_>>()),
            ),
            (
                "actual",
                Series::float(rows.iter().map(|r| r.actual).collect::<Array1<_>>()),
            ),
            (
                "predicted",
                Series::float(rows.iter().map(|r| r.predicted).collect::<Array1<_>>()),
            ),
            (
                "residual",
                Series::float(rows.iter().map(|r| r.residual).collect::<Array1<_>>()),
            ),
        ])?;

        Ok(df)
    }

    /// Residuals of each model on the test rows
    pub fn residuals(&self) -> Vec<(String, Array1<f64>)> {
        self.models
            .iter()
            .map(|(name, predicted)| (name.clone(), &self.actual - predicted))
            .collect()
    }

    /// Error metrics of each model. An empty test frame yields NaN.
    pub fn metrics(&self) -> Vec<ComparisonMetrics> {
        let n = self.actual.len() as f64;
        let mean = self.actual.sum() / n;
        let sst = self.actual.mapv(|y| (y - mean).powi(2)).sum();

        self.residuals()
            .into_iter()
            .map(|(model, resid)| {
                let sse = resid.dot(&resid);
                let r_squared = if sst == 0.0 { 0.0 } else { 1.0 - sse / sst };
                ComparisonMetrics {
                    model,
                    rmse: (sse / n).sqrt(),
                    mae: resid.mapv(f64::abs).sum() / n,
                    r_squared,
                }
            })
            .collect()
    }

    /// Residual quartiles of each model, for box plots.
    ///
    /// Models are skipped when the test frame is empty.
    pub fn residual_summaries(&self) -> Vec<(String, ResidualStatistics)> {
        self.residuals()
            .into_iter()
            .filter_map(|(model, resid)| {
                ResidualStatistics::from_residuals(&resid.to_vec()).map(|stats| (model, stats))
            })
            .collect()
    }
}
