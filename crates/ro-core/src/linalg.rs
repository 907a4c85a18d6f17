//! Dense linear algebra for least squares
//!
//! Householder QR factorization of a tall design matrix and the `(XᵀX)⁻¹`
//! needed for coefficient standard errors, backed by `nalgebra`. Callers work
//! with `ndarray` matrices; rank deficiency is reported as an error instead of
//! being carried forward as NaN.

use nalgebra::linalg::QR;
use nalgebra::{DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2};

pub type Matrix = Array2<f64>;
pub type Vector = Array1<f64>;

/// Default relative tolerance below which a column is considered linearly
/// dependent on the columns before it.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-10;

/// Linear algebra errors
#[derive(Debug, thiserror::Error)]
pub enum LinalgError {
    /// Matrix is singular; `column` is the first dependent column
    #[error("Matrix is singular: column {column} is linearly dependent on earlier columns")]
    Singular { column: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Least squares needs at least as many rows as columns, got {rows}×{cols}")]
    Underdetermined { rows: usize, cols: usize },
}

pub type Result<T> = std::result::Result<T, LinalgError>;

/// QR factorization `X = QR` of an `n × p` matrix, `n ≥ p`.
#[derive(Debug, Clone)]
pub struct Qr {
    qr: QR<f64, Dyn, Dyn>,
    /// Upper triangular factor, `p × p`
    r: DMatrix<f64>,
    nrows: usize,
}

impl Qr {
    /// Factorize `x`, rejecting rank-deficient input.
    ///
    /// Column `j` is considered dependent when `|R[j, j]| ≤ tolerance · ‖x_j‖`.
    /// An all-zero column is always dependent. Columns are not pivoted, so the
    /// reported column is the first one spanned by those before it.
    pub fn new(x: &Matrix, tolerance: f64) -> Result<Self> {
        let (n, p) = x.dim();
        if n < p {
            return Err(LinalgError::Underdetermined { rows: n, cols: p });
        }

        let column_norms: Vec<f64> = x.columns().into_iter().map(|c| c.dot(&c).sqrt()).collect();

        let qr = to_nalgebra(x).qr();
        let r = qr.r();

        for (k, &norm) in column_norms.iter().enumerate() {
            let diag = r[(k, k)].abs();
            if norm == 0.0 || !diag.is_finite() || diag <= tolerance * norm {
                return Err(LinalgError::Singular { column: k });
            }
        }

        Ok(Self { qr, r, nrows: n })
    }

    /// The upper triangular factor
    pub fn r(&self) -> Matrix {
        from_nalgebra(&self.r)
    }

    /// Apply `Qᵀ` to a vector of length `n`
    pub fn qt_mul(&self, y: &Vector) -> Result<Vector> {
        let mut out = self.checked_rhs(y)?;
        self.qr.q_tr_mul(&mut out);
        Ok(out.iter().copied().collect())
    }

    /// Coefficients `β` minimizing `‖y − Xβ‖²`
    pub fn solve_least_squares(&self, y: &Vector) -> Result<Vector> {
        let p = self.r.ncols();
        let mut qty = self.checked_rhs(y)?;
        self.qr.q_tr_mul(&mut qty);

        let head = qty.rows(0, p).into_owned();
        let beta = self
            .r
            .solve_upper_triangular(&head)
            .ok_or_else(|| self.singular_column())?;

        Ok(beta.iter().copied().collect())
    }

    /// `(XᵀX)⁻¹ = R⁻¹R⁻ᵀ`
    pub fn xtx_inverse(&self) -> Result<Matrix> {
        let p = self.r.ncols();
        let r_inv = self
            .r
            .solve_upper_triangular(&DMatrix::identity(p, p))
            .ok_or_else(|| self.singular_column())?;

        Ok(from_nalgebra(&(&r_inv * r_inv.transpose())))
    }

    fn checked_rhs(&self, y: &Vector) -> Result<DVector<f64>> {
        if y.len() != self.nrows {
            return Err(LinalgError::DimensionMismatch {
                expected: format!("vector of length {}", self.nrows),
                actual: format!("vector of length {}", y.len()),
            });
        }
        Ok(DVector::from_iterator(y.len(), y.iter().copied()))
    }

    fn singular_column(&self) -> LinalgError {
        let column = (0..self.r.ncols())
            .find(|&k| self.r[(k, k)] == 0.0)
            .unwrap_or(0);
        LinalgError::Singular { column }
    }
}

fn to_nalgebra(x: &Matrix) -> DMatrix<f64> {
    let (n, p) = x.dim();
    DMatrix::from_fn(n, p, |i, j| x[(i, j)])
}

fn from_nalgebra(m: &DMatrix<f64>) -> Matrix {
    Matrix::from_shape_fn(m.shape(), |(i, j)| m[(i, j)])
}
