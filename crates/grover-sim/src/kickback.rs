//! Gate-level Grover circuit using an ancilla for phase kickback.
//!
//! The register holds `n` data qubits plus one ancilla (qubit `n`). The
//! ancilla is prepared in |−⟩ = (|0⟩ − |1⟩)/√2 with X then H. Because
//! X|−⟩ = −|−⟩, a multi-controlled X targeting the ancilla multiplies exactly
//! the basis states that satisfy its controls by −1 and leaves the ancilla in
//! |−⟩. That is how both reflections are built here without a phase gate:
//!
//! - oracle: X on data qubits whose target bit is 0, MCX(data → ancilla), undo X;
//! - diffuser: H, X on all data qubits, MCX(data → ancilla), X, H.
//!
//! The gate diffuser realizes I − 2|s⟩⟨s|, the negative of the closed-form
//! 2|s⟩⟨s| − I used by [`crate::StateVector::apply_diffusion`]. After `k`
//! iterations the data amplitudes therefore equal (−1)^k times the engine's,
//! and every probability agrees.

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;
use tracing::debug;

use crate::error::{GroverError, GroverResult};
use crate::probability::ProbabilityTable;
use crate::statevector::{MAX_QUBITS, StateVector};

/// Data register plus one phase-kickback ancilla.
#[derive(Debug, Clone)]
pub struct PhaseKickbackCircuit {
    num_data_qubits: usize,
    data_qubits: Vec<usize>,
    register: StateVector,
}

impl PhaseKickbackCircuit {
    /// Allocate `num_data_qubits` data qubits and the ancilla, all in |0⟩.
    pub fn new(num_data_qubits: usize) -> GroverResult<Self> {
        if num_data_qubits == 0 || num_data_qubits >= MAX_QUBITS {
            return Err(GroverError::InvalidWidth {
                width: num_data_qubits,
                max: MAX_QUBITS - 1,
            });
        }
        Ok(Self {
            num_data_qubits,
            data_qubits: (0..num_data_qubits).collect(),
            register: StateVector::zero(num_data_qubits + 1)?,
        })
    }

    /// Build, prepare and iterate a full search for `pattern` (qubit 0 first).
    pub fn run(num_data_qubits: usize, pattern: &[u8], iterations: usize) -> GroverResult<Self> {
        let mut circuit = Self::new(num_data_qubits)?;
        circuit.prepare()?;
        for _ in 0..iterations {
            circuit.apply_oracle(pattern)?;
            circuit.apply_diffuser()?;
        }
        debug!(num_data_qubits, iterations, "ran gate-level Grover circuit");
        Ok(circuit)
    }

    /// Number of data qubits.
    pub fn num_data_qubits(&self) -> usize {
        self.num_data_qubits
    }

    /// Index of the ancilla qubit.
    pub fn ancilla(&self) -> usize {
        self.num_data_qubits
    }

    /// Full (n+1)-qubit register.
    pub fn register(&self) -> &StateVector {
        &self.register
    }

    /// H on every data qubit; X then H on the ancilla.
    pub fn prepare(&mut self) -> GroverResult<()> {
        for &q in &self.data_qubits {
            self.register.apply_h(q)?;
        }
        let ancilla = self.ancilla();
        self.register.apply_x(ancilla)?;
        self.register.apply_h(ancilla)
    }

    /// Phase-flip the data state equal to `pattern` (qubit 0 first).
    pub fn apply_oracle(&mut self, pattern: &[u8]) -> GroverResult<()> {
        if pattern.len() != self.num_data_qubits || pattern.iter().any(|&bit| bit > 1) {
            return Err(GroverError::InvalidBitstring(format!("{pattern:?}")));
        }
        let ancilla = self.ancilla();
        self.flip_zero_bits(pattern)?;
        self.register.apply_mcx(&self.data_qubits, ancilla)?;
        self.flip_zero_bits(pattern)
    }

    /// Gate-level inversion about the mean (up to a global −1).
    pub fn apply_diffuser(&mut self) -> GroverResult<()> {
        let ancilla = self.ancilla();
        for &q in &self.data_qubits {
            self.register.apply_h(q)?;
            self.register.apply_x(q)?;
        }
        self.register.apply_mcx(&self.data_qubits, ancilla)?;
        for &q in &self.data_qubits {
            self.register.apply_x(q)?;
            self.register.apply_h(q)?;
        }
        Ok(())
    }

    /// Data-register amplitudes with the |−⟩ ancilla factored out.
    pub fn data_amplitudes(&self) -> Vec<Complex64> {
        let amps = self.register.amplitudes();
        let ancilla_mask = 1 << self.ancilla();
        (0..ancilla_mask)
            .map(|i| (amps[i] - amps[i | ancilla_mask]) * FRAC_1_SQRT_2)
            .collect()
    }

    /// Marginal distribution of the data register.
    pub fn data_probabilities(&self) -> ProbabilityTable {
        let amps = self.register.amplitudes();
        let ancilla_mask = 1 << self.ancilla();
        let probabilities = (0..ancilla_mask)
            .map(|i| amps[i].norm_sqr() + amps[i | ancilla_mask].norm_sqr())
            .collect();
        ProbabilityTable::new(self.num_data_qubits, probabilities)
    }

    /// Largest |a(x, 0) + a(x, 1)| over data states; zero while the ancilla
    /// is exactly |−⟩ and unentangled.
    pub fn ancilla_residual(&self) -> f64 {
        let amps = self.register.amplitudes();
        let ancilla_mask = 1 << self.ancilla();
        (0..ancilla_mask)
            .map(|i| (amps[i] + amps[i | ancilla_mask]).norm())
            .fold(0.0, f64::max)
    }

    fn flip_zero_bits(&mut self, pattern: &[u8]) -> GroverResult<()> {
        for (q, &bit) in pattern.iter().enumerate() {
            if bit == 0 {
                self.register.apply_x(q)?;
            }
        }
        Ok(())
    }
}
