use ndarray::{array, Array2};
use num_complex::Complex64;

use qmodels::quantum::linalg;
use qmodels::quantum::{HilbertSpace, QuantumState, UnitaryTransformation};

/// Helper function for comparing matrices with tolerance
fn matrix_approx_eq(a: &Array2<Complex64>, b: &Array2<Complex64>, epsilon: f64) -> bool {
    a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(&x, &y)| (x - y).norm() < epsilon)
}

fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

fn hadamard() -> Array2<Complex64> {
    let s = 1.0 / 2.0_f64.sqrt();
    array![[c(s), c(s)], [c(s), c(-s)]]
}

#[test]
fn test_construct_with_bases() {
    // { |0⟩, |1⟩ } -> { (|0⟩ + |1⟩)/√2, (|0⟩ - |1⟩)/√2 }, normalized inside
    let old_basis = linalg::identity(2);
    let new_basis = array![[c(1.0), c(1.0)], [c(1.0), c(-1.0)]];
    let space = HilbertSpace::new(2).unwrap();

    let ut = UnitaryTransformation::from_bases(&old_basis, &new_basis, &space).unwrap();

    assert!(linalg::is_approx(&hadamard(), ut.transform_matrix()));
}

#[test]
fn test_construct_with_non_standard_old_basis() {
    // Going from the Hadamard basis back to the standard one gives H⁻¹ = H
    let old_basis = array![[c(2.0), c(3.0)], [c(2.0), c(-3.0)]];
    let new_basis = linalg::identity(2);
    let space = HilbertSpace::new(2).unwrap();

    let ut = UnitaryTransformation::from_bases(&old_basis, &new_basis, &space).unwrap();

    assert!(matrix_approx_eq(ut.transform_matrix(), &hadamard(), 1e-12));
}

#[test]
fn test_construct_with_non_square_basis_matrix() {
    let mut old_basis = Array2::from_elem((2, 3), c(0.3));
    let mut new_basis = array![[c(0.1), c(0.7)], [c(-0.4), c(0.2)]];
    let space = HilbertSpace::new(2).unwrap();

    let err = UnitaryTransformation::from_bases(&old_basis, &new_basis, &space).unwrap_err();
    assert!(err.is_invalid_argument());

    std::mem::swap(&mut old_basis, &mut new_basis);

    let err = UnitaryTransformation::from_bases(&old_basis, &new_basis, &space).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_construct_with_different_size_bases() {
    let old_basis = linalg::identity(2);
    let new_basis = linalg::identity(3);
    let space = HilbertSpace::new(2).unwrap();

    assert!(UnitaryTransformation::from_bases(&old_basis, &new_basis, &space).is_err());
}

#[test]
fn test_construct_with_dependent_old_basis() {
    let old_basis = array![[c(1.0), c(2.0)], [c(1.0), c(2.0)]];
    let space = HilbertSpace::new(2).unwrap();

    let err = UnitaryTransformation::from_bases(&old_basis, &linalg::identity(2), &space).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_construct_with_non_orthogonal_new_basis() {
    let new_basis = array![[c(1.0), c(1.0)], [c(0.0), c(1.0)]];
    let space = HilbertSpace::new(2).unwrap();

    assert!(UnitaryTransformation::from_bases(&linalg::identity(2), &new_basis, &space).is_err());
}

#[test]
fn test_construct_with_matrix() {
    let matrix = array![[c(1.0), c(0.0)], [c(0.0), c(1.0)]];
    let space = HilbertSpace::new(2).unwrap();

    let ut = UnitaryTransformation::new(matrix.clone(), &space).unwrap();

    assert_eq!(ut.transform_matrix(), &matrix);
    assert_eq!(ut.dimension(), 2);
}

#[test]
fn test_construct_with_non_square_matrix() {
    let matrix = array![
        [c(1.0), c(2.0), c(3.0)],
        [c(4.0), c(5.0), c(6.0)]
    ];
    let space = HilbertSpace::new(2).unwrap();

    assert!(UnitaryTransformation::new(matrix, &space).unwrap_err().is_invalid_argument());
}

#[test]
fn test_construct_with_non_unitary_matrix() {
    let matrix = Array2::from_elem((2, 2), c(1.0));
    let space = HilbertSpace::new(2).unwrap();

    assert!(UnitaryTransformation::new(matrix, &space).unwrap_err().is_invalid_argument());
}

#[test]
fn test_construct_with_wrong_space() {
    let space = HilbertSpace::new(3).unwrap();

    assert!(UnitaryTransformation::new(linalg::identity(2), &space)
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn test_applying_hadamard_transform() {
    let space = HilbertSpace::new(2).unwrap();
    let mut state = QuantumState::new(Array2::from_elem((2, 2), c(0.5)), &space).unwrap();
    let ut = UnitaryTransformation::new(hadamard(), &space).unwrap();

    ut.apply_to(&mut state).unwrap();

    let expected = array![[c(1.0), c(0.0)], [c(0.0), c(0.0)]];
    assert!(linalg::is_approx(state.density_matrix(), &expected));
    assert!(state.is_pure());
    assert!((state.eigen_values()[1] - 1.0).abs() < 1e-12);
}

#[test]
fn test_apply_then_adjoint_restores_state() {
    let space = HilbertSpace::new(2).unwrap();
    let rho = array![
        [c(0.7), Complex64::new(0.1, 0.2)],
        [Complex64::new(0.1, -0.2), c(0.3)]
    ];
    let mut state = QuantumState::new(rho.clone(), &space).unwrap();
    let phase = UnitaryTransformation::new(
        array![[c(1.0), c(0.0)], [c(0.0), Complex64::new(0.0, 1.0)]],
        &space,
    )
    .unwrap();

    phase.apply_to(&mut state).unwrap();
    assert!(!matrix_approx_eq(state.density_matrix(), &rho, 1e-12));

    phase.adjoint().apply_to(&mut state).unwrap();
    assert!(matrix_approx_eq(state.density_matrix(), &rho, 1e-12));
}

#[test]
fn test_apply_to_state_of_other_dimension() {
    let mut state = QuantumState::new(
        Array2::from_diag(&ndarray::Array1::from_elem(3, c(1.0 / 3.0))),
        &HilbertSpace::new(3).unwrap(),
    )
    .unwrap();
    let before = state.density_matrix().clone();
    let ut = UnitaryTransformation::new(hadamard(), &HilbertSpace::new(2).unwrap()).unwrap();

    assert!(ut.apply_to(&mut state).unwrap_err().is_invalid_argument());
    assert_eq!(state.density_matrix(), &before);
}

#[test]
fn test_bell_state_preparation_and_reduction() {
    let space = HilbertSpace::from_dimensions(vec![2, 2]).unwrap();
    let zero_zero = space.basis_vector(&[0, 0]).unwrap();
    let mut state = QuantumState::from_amplitudes(zero_zero, &space).unwrap();

    let h_on_first = linalg::kron(&hadamard(), &linalg::identity(2));
    let cnot = array![
        [c(1.0), c(0.0), c(0.0), c(0.0)],
        [c(0.0), c(1.0), c(0.0), c(0.0)],
        [c(0.0), c(0.0), c(0.0), c(1.0)],
        [c(0.0), c(0.0), c(1.0), c(0.0)]
    ];

    let circuit = UnitaryTransformation::new(h_on_first, &space)
        .unwrap()
        .compose(&UnitaryTransformation::new(cnot, &space).unwrap())
        .unwrap();
    circuit.apply_to(&mut state).unwrap();

    let rho = state.density_matrix();
    assert!((rho[[0, 0]] - c(0.5)).norm() < 1e-12);
    assert!((rho[[0, 3]] - c(0.5)).norm() < 1e-12);
    assert!((rho[[3, 3]] - c(0.5)).norm() < 1e-12);
    assert!(state.is_pure());

    let reduced = state.partial_trace(0).unwrap();
    assert!(!reduced.is_pure());
    assert!(matrix_approx_eq(
        reduced.density_matrix(),
        &Array2::from_diag(&ndarray::Array1::from_elem(2, c(0.5))),
        1e-12
    ));
}
