//! Dense complex matrix helpers
//!
//! States and operators are stored as `ndarray` arrays of `Complex64`.
//! The Hermitian eigensolver and matrix inversion are delegated to
//! `nalgebra`, converting at the boundary.

use std::cmp::Ordering;

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, Axis};
use num_complex::Complex64;

use crate::error::{QuantumError, Result};

/// Numeric thresholds shared by the validity checks
pub mod tolerance {
    /// Base threshold for the density-matrix checks (eigenvalue sign,
    /// trace, purity). Scaled by the matrix dimension at the use site.
    pub const EPSILON: f64 = 1e-15;

    /// Relative precision of [`is_approx`](super::is_approx)
    pub const APPROX_PRECISION: f64 = 1e-12;

    /// Iteration cap handed to the eigensolver
    pub const MAX_EIGEN_ITERATIONS: usize = 10_000;

    /// `EPSILON` scaled by the dimension of the matrix under test
    pub fn scaled_epsilon(dim: usize) -> f64 {
        EPSILON * dim.max(1) as f64
    }
}

/// Whether the matrix has as many rows as columns
pub fn is_square(m: &Array2<Complex64>) -> bool {
    m.nrows() == m.ncols()
}

/// The `n × n` identity matrix
pub fn identity(n: usize) -> Array2<Complex64> {
    Array2::eye(n)
}

/// Conjugate transpose
pub fn adjoint(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().map(|x| x.conj())
}

/// Sum of the diagonal
pub fn trace(m: &Array2<Complex64>) -> Complex64 {
    m.diag().sum()
}

/// Frobenius norm
pub fn frobenius_norm(m: &Array2<Complex64>) -> f64 {
    m.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Kronecker product `a ⊗ b`; indices of `a` vary slowest
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (a_rows, a_cols) = a.dim();
    let (b_rows, b_cols) = b.dim();

    let mut result = Array2::zeros((a_rows * b_rows, a_cols * b_cols));

    for i in 0..a_rows {
        for j in 0..a_cols {
            let factor = a[[i, j]];
            for k in 0..b_rows {
                for l in 0..b_cols {
                    result[[i * b_rows + k, j * b_cols + l]] = factor * b[[k, l]];
                }
            }
        }
    }

    result
}

/// Approximate equality: `‖a − b‖ ≤ p · min(‖a‖, ‖b‖)` in the Frobenius norm.
///
/// Matrices of different shapes are never approximately equal. Two zero
/// matrices compare equal.
pub fn is_approx(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
    if a.dim() != b.dim() {
        return false;
    }

    let diff = frobenius_norm(&(a - b));
    diff <= tolerance::APPROX_PRECISION * frobenius_norm(a).min(frobenius_norm(b))
}

/// Whether `m ≈ m†`
pub fn is_hermitian(m: &Array2<Complex64>) -> bool {
    is_square(m) && is_approx(m, &adjoint(m))
}

/// Whether `m · m† ≈ I`
pub fn is_unitary(m: &Array2<Complex64>) -> bool {
    is_square(m) && is_approx(&m.dot(&adjoint(m)), &identity(m.nrows()))
}

/// Scale every column to unit norm. Zero columns cannot be normalized.
pub fn normalize_columns(m: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    let mut result = m.clone();

    for (j, mut column) in result.axis_iter_mut(Axis(1)).enumerate() {
        let norm = column.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(QuantumError::invalid_argument(format!(
                "Column {} has zero norm and cannot be normalized",
                j
            )));
        }
        column.mapv_inplace(|z| z / norm);
    }

    Ok(result)
}

fn to_nalgebra(m: &Array2<Complex64>) -> DMatrix<Complex64> {
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[[i, j]])
}

fn from_nalgebra(m: &DMatrix<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Inverse of a square matrix
pub fn inverse(m: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    if !is_square(m) {
        return Err(QuantumError::invalid_argument(format!(
            "Cannot invert a non-square {}x{} matrix",
            m.nrows(),
            m.ncols()
        )));
    }

    to_nalgebra(m)
        .try_inverse()
        .map(|inv| from_nalgebra(&inv))
        .ok_or_else(|| QuantumError::invalid_argument("Matrix is singular"))
}

/// Spectral decomposition of a Hermitian matrix.
///
/// Returns the eigenvalues in ascending order and the matching
/// eigenvectors as columns. The caller is responsible for checking that
/// `m` is Hermitian; only its lower triangle is read.
pub fn hermitian_eigen(m: &Array2<Complex64>) -> Result<(Array1<f64>, Array2<Complex64>)> {
    let n = m.nrows();
    if n == 0 || !is_square(m) {
        return Err(QuantumError::invalid_argument(
            "Eigen decomposition needs a non-empty square matrix",
        ));
    }

    let eigen = SymmetricEigen::try_new(
        to_nalgebra(m),
        f64::EPSILON,
        tolerance::MAX_EIGEN_ITERATIONS,
    )
    .ok_or_else(|| QuantumError::runtime_failure("Eigen solver did not converge"))?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(Ordering::Equal)
    });

    let values = order.iter().map(|&k| eigen.eigenvalues[k]).collect::<Array1<f64>>();
    let vectors = Array2::from_shape_fn((n, n), |(i, j)| eigen.eigenvectors[(i, order[j])]);

    Ok((values, vectors))
}
