//! R-style model formulas
//!
//! A formula names the response and the predictor columns of a linear model,
//! e.g. `mpg ~ wt + qsec + am` or `mpg ~ .`. Resolving it against a
//! DataFrame yields the concrete, ordered predictor list.

use crate::data::DataFrame;
pub use crate::formula::error::{FormulaError, FormulaResult};

use std::str::FromStr;

pub mod error;
mod parser;

#[cfg(test)]
mod tests;

pub use parser::FormulaParser;

/// A right-hand side term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A named column
    Variable(String),
    /// `.`: every numeric column other than the response
    Dot,
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "{}", name),
            Term::Dot => write!(f, "."),
        }
    }
}

/// A parsed formula specifying a linear model
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// Response variable (left-hand side)
    pub response: Option<String>,

    /// Terms on the right-hand side, in order of first appearance
    pub terms: Vec<Term>,

    /// Variables removed with `- name`
    pub removed: Vec<String>,

    /// Whether to include an intercept
    pub has_intercept: bool,

    /// Original formula string
    pub original: String,
}

impl Formula {
    /// Parse a formula from a string
    pub fn parse(formula: &str) -> FormulaResult<Self> {
        FormulaParser::parse(formula)
    }

    /// Build `response ~ p1 + p2 + ...` from names
    pub fn with_response<S: AsRef<str>>(response: &str, predictors: &[S]) -> Self {
        let mut formula = Self {
            response: Some(response.to_string()),
            terms: predictors
                .iter()
                .map(|p| Term::Variable(p.as_ref().to_string()))
                .collect(),
            removed: Vec::new(),
            has_intercept: true,
            original: String::new(),
        };
        formula.original = formula.to_string();
        formula
    }

    /// Remove the intercept from the formula
    pub fn without_intercept(mut self) -> Self {
        self.has_intercept = false;
        self
    }

    /// Check if formula has a response variable
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// The response name, or `MissingResponse`
    pub fn response(&self) -> FormulaResult<&str> {
        self.response
            .as_deref()
            .ok_or(FormulaError::MissingResponse)
    }

    /// Resolve the right-hand side against `df`.
    ///
    /// `.` expands to every numeric column except the response, in column
    /// order. Removed variables are dropped, duplicates collapse to their
    /// first occurrence. Every named variable must exist and be numeric.
    pub fn predictors(&self, df: &DataFrame) -> FormulaResult<Vec<String>> {
        let mut names: Vec<String> = Vec::new();

        if let Some(resp) = &self.response {
            self.check_column(df, resp)?;
        }

        for term in &self.terms {
            match term {
                Term::Variable(name) => {
                    self.check_column(df, name)?;
                    if Some(name) == self.response.as_ref() {
                        return Err(FormulaError::InvalidStructure {
                            message: format!("response '{}' also appears as a predictor", name),
                        });
                    }
                    if !names.contains(name) {
                        names.push(name.clone());
                    }
                }
                Term::Dot => {
                    for col in df.numeric_column_names() {
                        if Some(col) != self.response.as_deref()
                            && !names.iter().any(|n| n == col)
                        {
                            names.push(col.to_string());
                        }
                    }
                }
            }
        }

        names.retain(|n| !self.removed.contains(n));
        Ok(names)
    }

    fn check_column(&self, df: &DataFrame, name: &str) -> FormulaResult<()> {
        let series = df
            .get_column(name)
            .ok_or_else(|| FormulaError::variable_not_found(name, &df.column_names()))?;

        if !series.is_numeric() {
            return Err(FormulaError::TypeMismatch {
                variable: name.to_string(),
                expected_type: "numeric",
                actual_type: series.dtype().to_string(),
            });
        }

        Ok(())
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> FormulaResult<Self> {
        Formula::parse(s)
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(response) = &self.response {
            write!(f, "{} ~ ", response)?;
        } else {
            write!(f, "~ ")?;
        }

        if self.terms.is_empty() {
            write!(f, "{}", if self.has_intercept { "1" } else { "0" })?;
        } else {
            let mut first = true;

            if !self.has_intercept {
                write!(f, "0")?;
                first = false;
            }

            for term in &self.terms {
                if !first {
                    write!(f, " + ")?;
                }
                write!(f, "{}", term)?;
                first = false;
            }
        }

        for name in &self.removed {
            write!(f, " - {}", name)?;
        }

        Ok(())
    }
}
