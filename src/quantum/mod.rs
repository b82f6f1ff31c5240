// src/quantum/mod.rs
//! Finite-dimensional quantum systems
//!
//! This module implements composite Hilbert spaces, density-matrix
//! states over them, and unitary transformations acting on those states.

pub mod linalg;
pub mod hilbert_space;
pub mod state;
pub mod transformation;

pub use hilbert_space::HilbertSpace;
pub use state::QuantumState;
pub use transformation::UnitaryTransformation;

/// Re-export commonly used types
pub mod prelude {
    pub use super::{HilbertSpace, QuantumState, UnitaryTransformation};
}
