//! Unitary transformations
//!
//! A [`UnitaryTransformation`] is a validated unitary matrix. It can be
//! given directly or derived as the change-of-basis operator between two
//! bases, and evolves states by conjugation `ρ → U ρ U†`.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, trace};

use crate::error::{QuantumError, Result};
use super::hilbert_space::HilbertSpace;
use super::linalg;
use super::state::QuantumState;

/// A unitary operator on a finite-dimensional space
#[derive(Clone, Debug, PartialEq)]
pub struct UnitaryTransformation {
    transform_matrix: Array2<Complex64>,
}

impl UnitaryTransformation {
    /// Wrap a unitary matrix acting on `space`.
    ///
    /// # Errors
    /// `InvalidArgument` if the matrix is not square, not unitary, or its
    /// dimension differs from `space.total_dimension()`.
    pub fn new(matrix: Array2<Complex64>, space: &HilbertSpace) -> Result<Self> {
        if !linalg::is_square(&matrix) {
            return Err(QuantumError::invalid_argument(format!(
                "Transform matrix should be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }

        if !linalg::is_unitary(&matrix) {
            trace!(dim = matrix.nrows(), "rejecting non-unitary transform matrix");
            return Err(QuantumError::invalid_argument("Transform matrix should be unitary"));
        }

        if matrix.nrows() != space.total_dimension() {
            return Err(QuantumError::invalid_argument(format!(
                "Space total dimension {} differs from transform dimension {}",
                space.total_dimension(),
                matrix.nrows()
            )));
        }

        Ok(UnitaryTransformation {
            transform_matrix: matrix,
        })
    }

    /// Change-of-basis operator from `old_basis` to `new_basis`.
    ///
    /// Both matrices hold basis vectors as columns, written in the same
    /// reference frame. Columns are normalized first; the transform is
    /// `old⁻¹ · new`, which reduces to the normalized `new_basis` when
    /// `old_basis` is the standard basis.
    pub fn from_bases(
        old_basis: &Array2<Complex64>,
        new_basis: &Array2<Complex64>,
        space: &HilbertSpace,
    ) -> Result<Self> {
        for (name, basis) in [("Old", old_basis), ("New", new_basis)] {
            if !linalg::is_square(basis) {
                return Err(QuantumError::invalid_argument(format!(
                    "{} basis matrix should be square, got {}x{}",
                    name,
                    basis.nrows(),
                    basis.ncols()
                )));
            }
        }

        if old_basis.dim() != new_basis.dim() {
            return Err(QuantumError::invalid_argument(format!(
                "Bases have different dimensions: {} and {}",
                old_basis.nrows(),
                new_basis.nrows()
            )));
        }

        let old_normalized = linalg::normalize_columns(old_basis)?;
        let new_normalized = linalg::normalize_columns(new_basis)?;

        let transform = linalg::inverse(&old_normalized)
            .map_err(|_| QuantumError::invalid_argument("Old basis vectors are linearly dependent"))?
            .dot(&new_normalized);

        debug!(dim = transform.nrows(), "derived change-of-basis transform");

        Self::new(transform, space)
    }

    /// The validated unitary matrix
    pub fn transform_matrix(&self) -> &Array2<Complex64> {
        &self.transform_matrix
    }

    /// Dimension of the space the transform acts on
    pub fn dimension(&self) -> usize {
        self.transform_matrix.nrows()
    }

    /// The inverse transformation `U†`
    pub fn adjoint(&self) -> UnitaryTransformation {
        UnitaryTransformation {
            transform_matrix: linalg::adjoint(&self.transform_matrix),
        }
    }

    /// Apply `self`, then `next`: the product `next · self`
    pub fn compose(&self, next: &UnitaryTransformation) -> Result<UnitaryTransformation> {
        if self.dimension() != next.dimension() {
            return Err(QuantumError::invalid_argument(format!(
                "Cannot compose transforms of dimensions {} and {}",
                self.dimension(),
                next.dimension()
            )));
        }

        Ok(UnitaryTransformation {
            transform_matrix: next.transform_matrix.dot(&self.transform_matrix),
        })
    }

    /// Evolve `state` in place: `ρ → U ρ U†`.
    ///
    /// The result goes through the state's full validation; if it fails,
    /// `state` is left as it was.
    pub fn apply_to(&self, state: &mut QuantumState) -> Result<()> {
        if state.dimension() != self.dimension() {
            return Err(QuantumError::invalid_argument(format!(
                "State dimension {} differs from transform dimension {}",
                state.dimension(),
                self.dimension()
            )));
        }

        let evolved = self
            .transform_matrix
            .dot(state.density_matrix())
            .dot(&linalg::adjoint(&self.transform_matrix));

        debug!(dim = self.dimension(), "applying unitary transformation");

        state.set_matrix(evolved)
    }
}
