// src/quantum/state.rs
//! Density-matrix quantum states
//!
//! A [`QuantumState`] owns a validated density matrix over a
//! [`HilbertSpace`] together with its spectral decomposition. Every way
//! of producing or changing a state goes through the same validation,
//! and the matrix and its spectrum are only ever replaced together.

use std::fmt::{self, Display};

use ndarray::{Array1, Array2, Axis};
use num_complex::Complex64;
use tracing::{debug, trace};

use crate::error::{QuantumError, Result};
use super::hilbert_space::{ravel_index, unravel_index, HilbertSpace};
use super::linalg::{self, tolerance};

/// A (possibly mixed) quantum state represented by its density matrix
#[derive(Clone, Debug)]
pub struct QuantumState {
    density: Array2<Complex64>,
    space: HilbertSpace,
    eigen_values: Array1<f64>,
    eigen_vectors: Array2<Complex64>,
}

/// Density matrix plus its spectrum, produced only by [`validate`]
struct Validated {
    density: Array2<Complex64>,
    eigen_values: Array1<f64>,
    eigen_vectors: Array2<Complex64>,
}

impl QuantumState {
    /// Create a state over `space`.
    ///
    /// A single-column matrix is read as a ket: it is normalized and the
    /// state is `|ψ⟩⟨ψ|`. Any other matrix must be square and is used as
    /// the density matrix directly.
    ///
    /// # Errors
    /// `InvalidArgument` if the matrix is not square, not Hermitian, has a
    /// negative eigenvalue, does not have unit trace, or its dimension
    /// differs from `space.total_dimension()`. `RuntimeFailure` if the
    /// eigen solver does not converge.
    pub fn new(matrix: Array2<Complex64>, space: &HilbertSpace) -> Result<Self> {
        let density = if matrix.ncols() == 1 {
            pure_density(&matrix)?
        } else {
            matrix
        };

        let validated = validate(density, space)?;

        Ok(QuantumState {
            density: validated.density,
            space: space.clone(),
            eigen_values: validated.eigen_values,
            eigen_vectors: validated.eigen_vectors,
        })
    }

    /// Pure state `|ψ⟩⟨ψ|` from a (not necessarily normalized) ket
    pub fn from_amplitudes(amplitudes: Array1<Complex64>, space: &HilbertSpace) -> Result<Self> {
        Self::new(amplitudes.insert_axis(Axis(1)), space)
    }

    /// `first ⊗ second`; the basis of `first` varies slowest
    pub fn tensor(first: &QuantumState, second: &QuantumState) -> Result<Self> {
        let density = linalg::kron(&first.density, &second.density);
        let space = first.space.tensor(&second.space);

        debug!(
            first = %first.space,
            second = %second.space,
            "tensoring quantum states"
        );

        Self::new(density, &space)
    }

    /// Trace out factor `index`, giving the reduced state on the remaining
    /// factors in their original order.
    ///
    /// Computes `ρ_red[i, j] = Σ_k ⟨i,k|ρ|j,k⟩` where `k` runs over the
    /// traced factor and sits at position `index` of the full multi-index.
    pub fn partial_trace(&self, index: usize) -> Result<Self> {
        if index >= self.space.rank() {
            return Err(QuantumError::invalid_argument(format!(
                "Cannot trace out subsystem {} of a space with rank {}",
                index,
                self.space.rank()
            )));
        }

        let full_dims = self.space.dimensions();
        let mut reduced_dims = full_dims.to_vec();
        let traced_dim = reduced_dims.remove(index);
        let reduced = HilbertSpace::from_dimensions(reduced_dims)?;
        let dim = reduced.total_dimension();

        // full_index[r][k]: flat index of |r, k⟩ in the full space
        let full_index: Vec<Vec<usize>> = (0..dim)
            .map(|r| {
                let reduced_vec = unravel_index(reduced.dimensions(), r);
                (0..traced_dim)
                    .map(|k| embed_index(full_dims, &reduced_vec, index, k))
                    .collect()
            })
            .collect();

        let mut result = Array2::zeros((dim, dim));

        for i in 0..dim {
            for j in 0..dim {
                let mut sum = Complex64::new(0.0, 0.0);
                for k in 0..traced_dim {
                    sum += self.density[[full_index[i][k], full_index[j][k]]];
                }
                result[[i, j]] = sum;
            }
        }

        debug!(
            space = %self.space,
            traced = index,
            reduced = %reduced,
            "partial trace"
        );

        Self::new(result, &reduced)
    }

    /// Replace the density matrix, keeping the space.
    ///
    /// The candidate is fully validated before anything is committed; on
    /// error the state is unchanged.
    pub fn set_matrix(&mut self, matrix: Array2<Complex64>) -> Result<()> {
        check_square(&matrix)?;
        check_space_dimension(&matrix, &self.space)?;

        let validated = validate(matrix, &self.space)?;

        self.density = validated.density;
        self.eigen_values = validated.eigen_values;
        self.eigen_vectors = validated.eigen_vectors;

        Ok(())
    }

    /// Whether `Tr(ρ²) = 1`
    pub fn is_pure(&self) -> bool {
        (self.purity() - 1.0).abs() < tolerance::scaled_epsilon(self.dimension())
    }

    /// Calculate the purity `Tr(ρ²)`
    pub fn purity(&self) -> f64 {
        let dim = self.dimension();
        let mut sum = Complex64::new(0.0, 0.0);
        for i in 0..dim {
            for j in 0..dim {
                sum += self.density[[i, j]] * self.density[[j, i]];
            }
        }
        sum.re
    }

    /// Trace of the density matrix
    pub fn trace(&self) -> f64 {
        linalg::trace(&self.density).re
    }

    /// Dimension of the underlying space
    pub fn dimension(&self) -> usize {
        self.space.total_dimension()
    }

    pub fn space(&self) -> &HilbertSpace {
        &self.space
    }

    pub fn density_matrix(&self) -> &Array2<Complex64> {
        &self.density
    }

    /// Eigenvalues of the density matrix, ascending
    pub fn eigen_values(&self) -> &Array1<f64> {
        &self.eigen_values
    }

    /// Eigenvectors as columns, matching [`eigen_values`](Self::eigen_values)
    pub fn eigen_vectors(&self) -> &Array2<Complex64> {
        &self.eigen_vectors
    }
}

/// Normalize a ket and form `|ψ⟩⟨ψ|`
fn pure_density(ket: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    let norm = linalg::frobenius_norm(ket);
    if norm == 0.0 {
        return Err(QuantumError::invalid_argument(
            "A zero vector does not describe a state",
        ));
    }

    let normalized = ket.mapv(|z| z / norm);
    Ok(normalized.dot(&linalg::adjoint(&normalized)))
}

fn check_square(matrix: &Array2<Complex64>) -> Result<()> {
    if !linalg::is_square(matrix) {
        trace!(rows = matrix.nrows(), cols = matrix.ncols(), "rejecting non-square matrix");
        return Err(QuantumError::invalid_argument(format!(
            "Matrix should be square, got {}x{}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    Ok(())
}

fn check_space_dimension(matrix: &Array2<Complex64>, space: &HilbertSpace) -> Result<()> {
    if matrix.nrows() != space.total_dimension() {
        trace!(
            matrix = matrix.nrows(),
            space = space.total_dimension(),
            "rejecting matrix: dimension does not match space"
        );
        return Err(QuantumError::invalid_argument(format!(
            "Space total dimension {} differs from matrix dimension {}",
            space.total_dimension(),
            matrix.nrows()
        )));
    }
    Ok(())
}

/// Run every density-matrix check in order: shape, Hermiticity and
/// spectrum, positivity and trace, then the space dimension.
fn validate(density: Array2<Complex64>, space: &HilbertSpace) -> Result<Validated> {
    check_square(&density)?;

    if density.is_empty() {
        return Err(QuantumError::invalid_argument("Density matrix is empty"));
    }

    if !linalg::is_hermitian(&density) {
        trace!("rejecting matrix: not self-adjoint");
        return Err(QuantumError::invalid_argument("Matrix should be self-adjoint"));
    }

    let (eigen_values, eigen_vectors) = linalg::hermitian_eigen(&density)?;

    let eps = tolerance::scaled_epsilon(density.nrows());

    // Eigenvalues are sorted, so the first is the smallest
    let min_eigen = eigen_values[0];
    if min_eigen < -eps {
        trace!(min_eigenvalue = min_eigen, "rejecting matrix: negative eigenvalue");
        return Err(QuantumError::invalid_argument(format!(
            "Not a density matrix: it has a negative eigenvalue {:e}",
            min_eigen
        )));
    }

    let tr = linalg::trace(&density);
    if (tr - Complex64::new(1.0, 0.0)).norm() > eps {
        trace!(trace = %tr, "rejecting matrix: trace is not 1");
        return Err(QuantumError::invalid_argument(format!(
            "Matrix should have trace equal to 1, got {}",
            tr
        )));
    }

    check_space_dimension(&density, space)?;

    Ok(Validated {
        density,
        eigen_values,
        eigen_vectors,
    })
}

/// Flat index in the full space of the reduced multi-index `reduced_vec`
/// with coordinate `k` inserted at `position`
fn embed_index(full_dims: &[usize], reduced_vec: &[usize], position: usize, k: usize) -> usize {
    let mut full_vec = Vec::with_capacity(full_dims.len());
    full_vec.extend_from_slice(&reduced_vec[..position]);
    full_vec.push(k);
    full_vec.extend_from_slice(&reduced_vec[position..]);
    ravel_index(full_dims, &full_vec)
}

impl PartialEq for QuantumState {
    fn eq(&self, other: &Self) -> bool {
        linalg::is_approx(&self.density, &other.density) && self.space == other.space
    }
}

impl Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Quantum state on {}:", self.space)?;

        let threshold = 1e-10;
        let dim = self.dimension();
        let dims = self.space.dimensions();

        let purity = self.purity();
        writeln!(f, "Purity: {:.6} (pure: {})", purity, self.is_pure())?;

        let label = |index: usize| -> String {
            unravel_index(dims, index)
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };

        if dim <= 16 {
            for i in 0..dim {
                for j in 0..dim {
                    let elem = self.density[[i, j]];
                    if elem.norm_sqr() > threshold {
                        writeln!(
                            f,
                            "  |{}⟩⟨{}|: {:.6}{:+.6}i",
                            label(i), label(j), elem.re, elem.im
                        )?;
                    }
                }
            }
        } else {
            writeln!(f, "  (Matrix too large to display fully)")?;

            for i in 0..dim {
                let prob = self.density[[i, i]].re;
                if prob > threshold {
                    writeln!(f, "  |{}⟩: [{:.1}%]", label(i), prob * 100.0)?;
                }
            }
        }

        Ok(())
    }
}
