//! Builder pattern for constructing DataFrames

use indexmap::IndexMap;

use super::*;

/// Builder for creating DataFrames
#[derive(Default)]
pub struct DataFrameBuilder {
    columns: IndexMap<String, Series>,
    nrows: Option<usize>,
    index: Option<Index>,
}

impl DataFrameBuilder {
    /// Create a new DataFrameBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column to the DataFrame
    pub fn with_column<S: Into<String>>(mut self, name: S, series: Series) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        // Check dimension consistency
        match self.nrows {
            Some(n) if series.len() != n => {
                return Err(DataError::DimensionMismatch {
                    expected: format!("{} rows", n),
                    actual: format!("{} rows", series.len()),
                });
            }
            None => {
                self.nrows = Some(series.len());
            }
            _ => {}
        }

        self.columns.insert(name, series);
        Ok(self)
    }

    /// Set the row index
    pub fn with_index(mut self, index: Index) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the DataFrame
    pub fn build(self) -> Result<DataFrame> {
        let nrows = match (self.nrows, &self.index) {
            (Some(n), _) => n,
            (None, Some(index)) => index.len(),
            (None, None) => 0,
        };

        let index = match self.index {
            Some(index) if index.len() != nrows => {
                return Err(DataError::DimensionMismatch {
                    expected: format!("index of length {}", nrows),
                    actual: format!("index of length {}", index.len()),
                });
            }
            Some(index) => index,
            None => Index::range(nrows),
        };

        Ok(DataFrame {
            columns: self.columns,
            index,
            nrows,
        })
    }
}
