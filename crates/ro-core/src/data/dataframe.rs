//! DataFrame implementation for tabular data
//!
//! A DataFrame is a 2-dimensional labeled data structure with columns of
//! potentially different types. Model code reads numeric columns out of it
//! as `f64` vectors and design matrices.

use super::*;

use indexmap::IndexMap;
use ndarray::{Axis, stack};

/// Main DataFrame structure
#[derive(Clone, Debug)]
pub struct DataFrame {
    pub(crate) columns: IndexMap<String, Series>,
    pub(crate) index: Index,
    pub(crate) nrows: usize,
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
            index: Index::range(0),
            nrows: 0,
        }
    }

    /// Create DataFrame from columns
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        let mut builder = DataFrameBuilder::new();

        for (name, series) in columns.into_iter() {
            builder = builder.with_column(name, series)?;
        }

        builder.build()
    }

    /// Get the number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Get the number of columns
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Get a reference to a column
    pub fn get_column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Record identifier of row `idx`: its index label
    pub fn record_id(&self, idx: usize) -> Result<String> {
        self.index.label(idx).ok_or(DataError::IndexOutOfBounds {
            index: idx,
            len: self.nrows,
        })
    }

    /// Gather rows at `indices`, in that order. The index labels travel
    /// with their rows.
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let mut builder = DataFrameBuilder::new().with_index(self.index.take(indices)?);

        for (name, series) in &self.columns {
            builder = builder.with_column(name.clone(), series.take(indices)?)?;
        }

        builder.build()
    }

    /// Get a single value
    pub fn get(&self, row: usize, col: &str) -> Result<SeriesValue> {
        let series = self
            .columns
            .get(col)
            .ok_or_else(|| DataError::ColumnNotFound(col.to_string()))?;

        series.get(row).ok_or(DataError::IndexOutOfBounds {
            index: row,
            len: self.nrows,
        })
    }

    /// Read a numeric column as `f64`.
    ///
    /// Int and Bool columns are coerced; NaN values are rejected as missing
    /// data.
    pub fn column_f64(&self, name: &str) -> Result<FloatArray> {
        let series = self
            .columns
            .get(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))?;

        let values = series.to_float()?;
        if values.iter().any(|v| v.is_nan()) {
            return Err(DataError::MissingData(name.to_string()));
        }

        Ok(values)
    }

    /// Stack the named numeric columns into an `nrows × names.len()` matrix
    pub fn numeric_matrix<S: AsRef<str>>(&self, names: &[S]) -> Result<Matrix> {
        if names.is_empty() {
            return Ok(Matrix::zeros((self.nrows, 0)));
        }

        let float_cols: Vec<FloatArray> = names
            .iter()
            .map(|name| self.column_f64(name.as_ref()))
            .collect::<Result<_>>()?;

        let arrays: Vec<ndarray::ArrayView1<f64>> =
            float_cols.iter().map(|arr| arr.view()).collect();

        stack(Axis(1), &arrays).map_err(|e| DataError::DimensionMismatch {
            expected: "compatible dimensions".to_string(),
            actual: e.to_string(),
        })
    }

    /// Names of the numeric columns, in column order
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, s)| s.is_numeric())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Split rows into a training and a test frame.
    ///
    /// See [`train_test_split`] for the sampling rules.
    pub fn train_test_split(&self, seed: u64, train_fraction: f64) -> Result<(Self, Self)> {
        let split = train_test_split(self.nrows, seed, train_fraction)?;
        Ok((self.take(&split.train)?, self.take(&split.test)?))
    }
}

impl std::fmt::Display for DataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataFrame({} rows × {} cols)", self.nrows, self.ncols())
    }
}
