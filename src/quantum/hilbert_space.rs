//! Composite Hilbert spaces
//!
//! A space is an ordered list of finite factor dimensions. Flat basis
//! indices map to multi-indices by mixed-radix decomposition, with the
//! last factor least significant. This matches the Kronecker-product
//! ordering used when states are tensored together.

use std::fmt::{self, Display};

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::{QuantumError, Result};

/// Tensor product of finite-dimensional factor spaces
#[derive(Clone, Debug, Default)]
pub struct HilbertSpace {
    dimensions: Vec<usize>,
    total_dimension: usize,
}

impl HilbertSpace {
    /// Single-factor space of the given dimension
    pub fn new(dim: usize) -> Result<Self> {
        Self::from_dimensions(vec![dim])
    }

    /// Multi-factor space. Every factor must have dimension at least 1.
    ///
    /// An empty list gives a rank-0 space of total dimension 1 (the
    /// scalar space), which is what tracing out the last factor yields.
    pub fn from_dimensions(dimensions: Vec<usize>) -> Result<Self> {
        if let Some(i) = dimensions.iter().position(|&d| d == 0) {
            return Err(QuantumError::invalid_argument(format!(
                "Dimension cannot be zero (factor {})",
                i
            )));
        }

        let total_dimension = dimensions.iter().product();

        Ok(HilbertSpace {
            dimensions,
            total_dimension,
        })
    }

    /// The degenerate placeholder space: rank 0, total dimension 0
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of tensor factors
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Dimension of factor `index`
    pub fn dimension(&self, index: usize) -> Result<usize> {
        self.dimensions.get(index).copied().ok_or_else(|| {
            QuantumError::out_of_range(format!(
                "Factor {} does not exist in a space of rank {}",
                index,
                self.rank()
            ))
        })
    }

    /// All factor dimensions, in order
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Product of the factor dimensions
    pub fn total_dimension(&self) -> usize {
        self.total_dimension
    }

    /// Compose with `other` in place, appending its factors after ours
    pub fn tensor_with(&mut self, other: &HilbertSpace) {
        self.dimensions.extend_from_slice(&other.dimensions);

        // The degenerate space contributes no factors; recompute from the
        // factor list so it acts as an empty prefix instead of zeroing.
        self.total_dimension = if self.dimensions.is_empty() {
            self.total_dimension * other.total_dimension
        } else {
            self.dimensions.iter().product()
        };
    }

    /// New space `self ⊗ other`; see [`tensor`]
    pub fn tensor(&self, other: &HilbertSpace) -> HilbertSpace {
        tensor(self, other)
    }

    /// Decode a flat basis index into one coordinate per factor
    pub fn get_vector(&self, index: usize) -> Result<Vec<usize>> {
        if index >= self.total_dimension {
            return Err(QuantumError::out_of_range(format!(
                "Basis index {} is outside a space of total dimension {}",
                index, self.total_dimension
            )));
        }

        Ok(unravel_index(&self.dimensions, index))
    }

    /// Encode a multi-index back into a flat basis index
    pub fn get_index(&self, vector: &[usize]) -> Result<usize> {
        if vector.len() != self.rank() {
            return Err(QuantumError::invalid_argument(format!(
                "Multi-index has {} coordinates but the space has rank {}",
                vector.len(),
                self.rank()
            )));
        }

        for (i, (&coord, &dim)) in vector.iter().zip(&self.dimensions).enumerate() {
            if coord >= dim {
                return Err(QuantumError::invalid_argument(format!(
                    "Coordinate {} = {} exceeds factor dimension {}",
                    i, coord, dim
                )));
            }
        }

        Ok(ravel_index(&self.dimensions, vector))
    }

    /// Computational basis ket `|vector⟩` of the full space
    pub fn basis_vector(&self, vector: &[usize]) -> Result<Array1<Complex64>> {
        let index = self.get_index(vector)?;
        let mut ket = Array1::zeros(self.total_dimension);
        ket[index] = Complex64::new(1.0, 0.0);
        Ok(ket)
    }
}

/// `first ⊗ second`: factors of `first` come first
pub fn tensor(first: &HilbertSpace, second: &HilbertSpace) -> HilbertSpace {
    let mut space = first.clone();
    space.tensor_with(second);
    space
}

/// Mixed-radix decomposition of `index` over `dimensions`.
///
/// Walks the factors from last to first taking `index mod d` each time.
/// Every dimension must be non-zero; `index` is not checked against
/// their product.
pub fn unravel_index(dimensions: &[usize], mut index: usize) -> Vec<usize> {
    let mut vector = vec![0; dimensions.len()];
    for (coord, &dim) in vector.iter_mut().zip(dimensions).rev() {
        *coord = index % dim;
        index /= dim;
    }
    vector
}

/// Inverse of [`unravel_index`]: the last coordinate has weight 1, each
/// earlier one the product of the dimensions after it.
pub fn ravel_index(dimensions: &[usize], vector: &[usize]) -> usize {
    vector
        .iter()
        .zip(dimensions)
        .fold(0, |index, (&coord, &dim)| index * dim + coord)
}

impl PartialEq for HilbertSpace {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions
    }
}

impl Eq for HilbertSpace {}

impl Display for HilbertSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.dimensions.is_empty() {
            return write!(f, "∅");
        }

        let factors: Vec<String> = self.dimensions.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", factors.join(" ⊗ "))
    }
}
