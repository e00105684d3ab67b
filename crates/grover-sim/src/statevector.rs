//! Dense statevector with the operators Grover's algorithm needs.
//!
//! Qubit `q` is bit `q` of the basis index. Every public mutation re-checks
//! the total probability. Rounding drift past [`NORM_TOLERANCE`] is rescaled
//! away; anything past [`DRIFT_TOLERANCE`] (or a non-finite total) is reported
//! as [`GroverError::NumericDrift`] without rescaling.

use num_complex::Complex64;
use tracing::trace;

use crate::error::{GroverError, GroverResult};
use crate::probability::ProbabilityTable;

/// Allowed deviation of Σ|aᵢ|² from 1.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Largest deviation of Σ|aᵢ|² from 1 still treated as rounding error.
///
/// Long closed-form searches on wide registers accumulate about 1e-9.
pub const DRIFT_TOLERANCE: f64 = 1e-6;

/// Largest register a dense statevector is allowed to hold (2^24 amplitudes,
/// 256 MiB).
pub const MAX_QUBITS: usize = 24;

/// A statevector over `2^n` computational basis states.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl StateVector {
    /// Create a statevector initialized to |0...0⟩.
    pub fn zero(num_qubits: usize) -> GroverResult<Self> {
        let size = register_dimension(num_qubits)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Create the uniform superposition H^⊗n |0...0⟩.
    pub fn uniform(num_qubits: usize) -> GroverResult<Self> {
        let mut sv = Self::zero(num_qubits)?;
        sv.init_uniform_superposition();
        Ok(sv)
    }

    /// Wrap caller-provided amplitudes.
    ///
    /// The length must be a power of two (at least 2) and the vector must be
    /// normalized.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> GroverResult<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(GroverError::InvalidAmplitudes(format!(
                "length {len} is not a power of two of at least 2"
            )));
        }
        let num_qubits = len.trailing_zeros() as usize;
        register_dimension(num_qubits)?;
        let sv = Self {
            amplitudes,
            num_qubits,
        };
        sv.check_normalization()?;
        Ok(sv)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states, `2^n`.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Read-only view of the amplitudes in index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude of one basis state.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Σ|aᵢ|².
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Mean amplitude μ = (Σaᵢ)/N of the current state.
    pub fn mean_amplitude(&self) -> Complex64 {
        let sum: Complex64 = self.amplitudes.iter().sum();
        sum / self.dimension() as f64
    }

    /// Snapshot of |aᵢ|² for every basis state.
    pub fn probabilities(&self) -> ProbabilityTable {
        ProbabilityTable::new(
            self.num_qubits,
            self.amplitudes.iter().map(Complex64::norm_sqr).collect(),
        )
    }

    // =========================================================================
    // Grover operators
    // =========================================================================

    /// Reset to the uniform superposition: every amplitude becomes 1/√N.
    ///
    /// Equivalent to a Hadamard on each qubit of |0...0⟩.
    pub fn init_uniform_superposition(&mut self) {
        let amp = Complex64::new(1.0 / (self.dimension() as f64).sqrt(), 0.0);
        self.amplitudes.fill(amp);
    }

    /// Negate the amplitude of `index`, leaving every other amplitude alone.
    ///
    /// This is the net effect of the ancilla-assisted oracle: with the ancilla
    /// held in |−⟩, a multi-controlled X that fires only on the marked pattern
    /// maps |x⟩|−⟩ to −|x⟩|−⟩ and leaves the ancilla unentangled, so the data
    /// register sees exactly this sign flip. See [`crate::kickback`].
    pub fn apply_phase_flip(&mut self, index: usize) -> GroverResult<()> {
        let amp = self
            .amplitudes
            .get_mut(index)
            .ok_or(GroverError::IndexOutOfRange {
                index,
                width: self.num_qubits,
            })?;
        *amp = -*amp;
        self.settle_norm()
    }

    /// Inversion about the mean: aᵢ := 2μ − aᵢ with μ taken from the current
    /// amplitudes.
    pub fn apply_diffusion(&mut self) -> GroverResult<()> {
        let two_mean = 2.0 * self.mean_amplitude();
        for amp in &mut self.amplitudes {
            *amp = two_mean - *amp;
        }
        self.settle_norm()
    }

    /// Inversion about the mean built from gates: H^⊗n, then 2|0⟩⟨0| − I,
    /// then H^⊗n.
    ///
    /// Produces the same amplitudes as [`Self::apply_diffusion`].
    pub fn apply_diffusion_decomposed(&mut self) -> GroverResult<()> {
        self.h_all();
        // 2|0⟩⟨0| − I: every basis state except |0...0⟩ changes sign.
        for amp in self.amplitudes.iter_mut().skip(1) {
            *amp = -*amp;
        }
        self.h_all();
        self.settle_norm()
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Hadamard on one qubit.
    pub fn apply_h(&mut self, qubit: usize) -> GroverResult<()> {
        self.check_qubit(qubit)?;
        self.h(qubit);
        self.settle_norm()
    }

    /// Hadamard on every qubit.
    pub fn apply_h_all(&mut self) -> GroverResult<()> {
        self.h_all();
        self.settle_norm()
    }

    /// Pauli X on one qubit.
    pub fn apply_x(&mut self, qubit: usize) -> GroverResult<()> {
        self.check_qubit(qubit)?;
        self.x(qubit);
        self.settle_norm()
    }

    /// Multi-controlled X: flips `target` on basis states where every control
    /// qubit is 1.
    pub fn apply_mcx(&mut self, controls: &[usize], target: usize) -> GroverResult<()> {
        self.check_qubit(target)?;
        let mut ctrl_mask = 0;
        for &control in controls {
            self.check_qubit(control)?;
            if control == target {
                return Err(GroverError::InvalidGate(format!(
                    "qubit {target} is both control and target"
                )));
            }
            ctrl_mask |= 1 << control;
        }
        let tgt_mask = 1 << target;
        for i in 0..self.dimension() {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
        self.settle_norm()
    }

    fn h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.dimension() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn h_all(&mut self) {
        for qubit in 0..self.num_qubits {
            self.h(qubit);
        }
    }

    fn x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.dimension() {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn check_qubit(&self, qubit: usize) -> GroverResult<()> {
        if qubit >= self.num_qubits {
            return Err(GroverError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Strict check for caller-provided amplitudes.
    fn check_normalization(&self) -> GroverResult<()> {
        let total = self.total_probability();
        if !total.is_finite() || (total - 1.0).abs() > NORM_TOLERANCE {
            return Err(GroverError::NumericDrift {
                total,
                tolerance: NORM_TOLERANCE,
            });
        }
        Ok(())
    }

    /// Rescale after an operator when rounding pushed the norm out of
    /// [`NORM_TOLERANCE`]; fail when the deviation is beyond rounding.
    fn settle_norm(&mut self) -> GroverResult<()> {
        let total = self.total_probability();
        let deviation = (total - 1.0).abs();
        if !total.is_finite() || deviation > DRIFT_TOLERANCE {
            return Err(GroverError::NumericDrift {
                total,
                tolerance: DRIFT_TOLERANCE,
            });
        }
        if deviation > NORM_TOLERANCE {
            trace!(total, "renormalizing register");
            let scale = total.sqrt().recip();
            for amp in &mut self.amplitudes {
                *amp *= scale;
            }
        }
        Ok(())
    }
}

fn register_dimension(num_qubits: usize) -> GroverResult<usize> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(GroverError::InvalidWidth {
            width: num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(1 << num_qubits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn real(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    #[test]
    fn test_initial_state() {
        let sv = StateVector::zero(2).unwrap();
        assert!(approx_eq(sv.amplitudes[0], real(1.0)));
        assert!(approx_eq(sv.amplitudes[1], real(0.0)));
        assert!(approx_eq(sv.amplitudes[2], real(0.0)));
        assert!(approx_eq(sv.amplitudes[3], real(0.0)));
    }

    #[test]
    fn test_width_limits() {
        assert!(matches!(
            StateVector::zero(0),
            Err(GroverError::InvalidWidth { width: 0, .. })
        ));
        assert!(StateVector::zero(MAX_QUBITS + 1).is_err());
    }

    #[test]
    fn test_hadamard() {
        let mut sv = StateVector::zero(1).unwrap();
        sv.apply_h(0).unwrap();

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], real(sqrt2_inv)));
        assert!(approx_eq(sv.amplitudes[1], real(sqrt2_inv)));
    }

    #[test]
    fn test_hadamard_all_matches_uniform() {
        let mut sv = StateVector::zero(3).unwrap();
        sv.apply_h_all().unwrap();
        let uniform = StateVector::uniform(3).unwrap();
        for (a, b) in sv.amplitudes().iter().zip(uniform.amplitudes()) {
            assert!(approx_eq(*a, *b));
        }
    }

    #[test]
    fn test_x_gate() {
        let mut sv = StateVector::zero(1).unwrap();
        sv.apply_x(0).unwrap();

        assert!(approx_eq(sv.amplitudes[0], real(0.0)));
        assert!(approx_eq(sv.amplitudes[1], real(1.0)));
    }

    #[test]
    fn test_bell_state_via_single_control_mcx() {
        let mut sv = StateVector::zero(2).unwrap();
        sv.apply_h(0).unwrap();
        sv.apply_mcx(&[0], 1).unwrap();

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], real(sqrt2_inv)));
        assert!(approx_eq(sv.amplitudes[1], real(0.0)));
        assert!(approx_eq(sv.amplitudes[2], real(0.0)));
        assert!(approx_eq(sv.amplitudes[3], real(sqrt2_inv)));
    }

    #[test]
    fn test_mcx_fires_only_when_all_controls_set() {
        // |011⟩ (qubits 0 and 1 set) → |111⟩
        let mut sv = StateVector::zero(3).unwrap();
        sv.apply_x(0).unwrap();
        sv.apply_x(1).unwrap();
        sv.apply_mcx(&[0, 1], 2).unwrap();
        assert!(approx_eq(sv.amplitudes[0b111], real(1.0)));

        // |001⟩ stays put
        let mut sv = StateVector::zero(3).unwrap();
        sv.apply_x(0).unwrap();
        sv.apply_mcx(&[0, 1], 2).unwrap();
        assert!(approx_eq(sv.amplitudes[0b001], real(1.0)));
    }

    #[test]
    fn test_gate_validation() {
        let mut sv = StateVector::zero(2).unwrap();
        assert!(matches!(
            sv.apply_h(2),
            Err(GroverError::QubitOutOfRange { qubit: 2, num_qubits: 2 })
        ));
        assert!(matches!(
            sv.apply_mcx(&[0, 1], 1),
            Err(GroverError::InvalidGate(_))
        ));
    }

    #[test]
    fn test_phase_flip_touches_only_target() {
        let mut sv = StateVector::uniform(2).unwrap();
        sv.apply_phase_flip(2).unwrap();
        assert!(approx_eq(sv.amplitudes[0], real(0.5)));
        assert!(approx_eq(sv.amplitudes[1], real(0.5)));
        assert!(approx_eq(sv.amplitudes[2], real(-0.5)));
        assert!(approx_eq(sv.amplitudes[3], real(0.5)));

        assert!(matches!(
            sv.apply_phase_flip(4),
            Err(GroverError::IndexOutOfRange { index: 4, width: 2 })
        ));
    }

    #[test]
    fn test_diffusion_reflects_about_mean() {
        // [.5, .5, -.5, .5] has mean .25, so 2μ − a = [0, 0, 1, 0].
        let mut sv = StateVector::uniform(2).unwrap();
        sv.apply_phase_flip(2).unwrap();
        assert!(approx_eq(sv.mean_amplitude(), real(0.25)));
        sv.apply_diffusion().unwrap();
        assert!(approx_eq(sv.amplitudes[0], real(0.0)));
        assert!(approx_eq(sv.amplitudes[1], real(0.0)));
        assert!(approx_eq(sv.amplitudes[2], real(1.0)));
        assert!(approx_eq(sv.amplitudes[3], real(0.0)));
    }

    #[test]
    fn test_decomposed_diffusion_matches_reflection() {
        let mut reflected = StateVector::uniform(3).unwrap();
        reflected.apply_phase_flip(5).unwrap();
        let mut decomposed = reflected.clone();

        reflected.apply_diffusion().unwrap();
        decomposed.apply_diffusion_decomposed().unwrap();

        for (a, b) in reflected.amplitudes().iter().zip(decomposed.amplitudes()) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn test_diffusion_leaves_uniform_state_fixed() {
        let mut sv = StateVector::uniform(4).unwrap();
        let before = sv.clone();
        sv.apply_diffusion().unwrap();
        for (a, b) in sv.amplitudes().iter().zip(before.amplitudes()) {
            assert!(approx_eq(*a, *b));
        }
    }

    #[test]
    fn test_rounding_drift_is_rescaled() {
        let mut sv = StateVector::uniform(4).unwrap();
        for amp in &mut sv.amplitudes {
            *amp *= 1.0 + 2e-8;
        }
        sv.apply_diffusion().unwrap();
        assert!((sv.total_probability() - 1.0).abs() <= NORM_TOLERANCE);

        for amp in &mut sv.amplitudes {
            *amp *= 1.0 - 2e-8;
        }
        sv.apply_diffusion_decomposed().unwrap();
        assert!((sv.total_probability() - 1.0).abs() <= NORM_TOLERANCE);
    }

    #[test]
    fn test_large_drift_is_an_error() {
        let mut sv = StateVector::uniform(3).unwrap();
        for amp in &mut sv.amplitudes {
            *amp *= 1.01;
        }
        assert!(matches!(
            sv.apply_diffusion(),
            Err(GroverError::NumericDrift { tolerance, .. }) if tolerance == DRIFT_TOLERANCE
        ));
    }

    #[test]
    fn test_nan_state_is_rejected() {
        assert!(matches!(
            StateVector::from_amplitudes(vec![real(f64::NAN), real(0.0)]),
            Err(GroverError::NumericDrift { .. })
        ));

        let mut sv = StateVector::uniform(2).unwrap();
        sv.amplitudes[1] = real(f64::NAN);
        assert!(matches!(
            sv.apply_diffusion(),
            Err(GroverError::NumericDrift { .. })
        ));
        assert!(matches!(
            sv.apply_phase_flip(0),
            Err(GroverError::NumericDrift { .. })
        ));
    }

    #[test]
    fn test_from_amplitudes_validation() {
        assert!(matches!(
            StateVector::from_amplitudes(vec![real(1.0); 3]),
            Err(GroverError::InvalidAmplitudes(_))
        ));
        assert!(matches!(
            StateVector::from_amplitudes(vec![real(1.0), real(1.0)]),
            Err(GroverError::NumericDrift { .. })
        ));
        let sv = StateVector::from_amplitudes(vec![real(0.6), Complex64::new(0.0, 0.8)]).unwrap();
        assert_eq!(sv.num_qubits(), 1);
    }

    #[test]
    fn test_probabilities_snapshot() {
        let sv = StateVector::uniform(3).unwrap();
        let table = sv.probabilities();
        assert_eq!(table.len(), 8);
        for p in table.as_slice() {
            assert!((p - 0.125).abs() < 1e-12);
        }
    }
}
