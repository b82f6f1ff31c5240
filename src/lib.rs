//! Quantum models for finite-dimensional systems
//!
//! This crate models composite Hilbert spaces, quantum states given by
//! density matrices, and unitary basis transformations. It supports
//! tensor composition, partial trace and state evolution.

pub mod error;
pub mod quantum;

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{QuantumError, Result};
    pub use crate::quantum::prelude::*;
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
