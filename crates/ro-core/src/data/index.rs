//! Row index for DataFrames
//!
//! The index identifies records: either by position or by a label such as a
//! car name. It is what comparison tables report as the record identifier.

use std::fmt;

use super::{DataError, Result};

/// Row index of a DataFrame
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    /// Positional labels, each row keeps the position it had when the index
    /// was created
    Range(Vec<usize>),
    /// String labels
    Labels(Vec<String>),
}

impl Index {
    /// Create a positional index `0..n`
    pub fn range(n: usize) -> Self {
        Index::Range((0..n).collect())
    }

    /// Create a labelled index
    pub fn labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Index::Labels(labels.into_iter().map(Into::into).collect())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        match self {
            Index::Range(v) => v.len(),
            Index::Labels(v) => v.len(),
        }
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label of row `idx`
    pub fn label(&self, idx: usize) -> Option<String> {
        match self {
            Index::Range(v) => v.get(idx).map(|p| p.to_string()),
            Index::Labels(v) => v.get(idx).cloned(),
        }
    }

    /// Gather the entries at `indices`, in that order
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let len = self.len();
        if let Some(&bad) = indices.iter().find(|&&idx| idx >= len) {
            return Err(DataError::IndexOutOfBounds { index: bad, len });
        }

        Ok(match self {
            Index::Range(v) => Index::Range(indices.iter().map(|&i| v[i]).collect()),
            Index::Labels(v) => Index::Labels(indices.iter().map(|&i| v[i].clone()).collect()),
        })
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Range(v) => write!(f, "RangeIndex(len={})", v.len()),
            Index::Labels(v) => write!(f, "LabelIndex(len={})", v.len()),
        }
    }
}
