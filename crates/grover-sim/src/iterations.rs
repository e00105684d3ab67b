//! Closed-form results for single-target Grover search.
//!
//! With one marked item in N = 2^n, the start state makes angle θ with the
//! unmarked subspace, sin θ = 1/√N. Each Grover iteration rotates by 2θ, so
//! after k iterations the marked item is measured with probability
//! sin²((2k+1)θ).

use std::f64::consts::FRAC_PI_4;

/// Calculate the optimal number of Grover iterations.
///
/// For a single marked item in a space of size N = 2^n this is ⌊(π/4)·√N⌋,
/// never less than 1.
///
/// Any width is accepted; the count saturates at `usize::MAX` for widths far
/// beyond anything a register can hold.
pub fn optimal_iterations(num_qubits: usize) -> usize {
    let optimal = (FRAC_PI_4 * space_size(num_qubits).sqrt()).floor() as usize;
    optimal.max(1)
}

/// Rotation angle θ with sin θ = 1/√N.
pub fn rotation_angle(num_qubits: usize) -> f64 {
    (1.0 / space_size(num_qubits).sqrt()).asin()
}

/// Probability of measuring the marked item after `iterations` iterations.
pub fn theoretical_success_probability(num_qubits: usize, iterations: usize) -> f64 {
    let theta = rotation_angle(num_qubits);
    ((2.0 * iterations as f64 + 1.0) * theta).sin().powi(2)
}

/// N = 2^n as a float; infinite past the f64 exponent range.
fn space_size(num_qubits: usize) -> f64 {
    2.0_f64.powi(i32::try_from(num_qubits).unwrap_or(i32::MAX))
}
