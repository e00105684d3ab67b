//! The phase oracle marking a single basis state.

use crate::bitspace::{self, BitSpace};
use crate::error::{GroverError, GroverResult};
use crate::statevector::StateVector;

/// Marks one basis state of an `n`-qubit register with a −1 phase.
///
/// The target is fixed at construction. Three ways in, all landing on the
/// same basis index:
///
/// - [`Oracle::new`] takes the index directly.
/// - [`Oracle::from_bitstring`] takes the MSB-first bitstring a user reads off
///   a measurement tally.
/// - [`Oracle::from_qubit_pattern`] takes per-qubit bits, qubit 0 first, the
///   order a gate-level oracle walks the register in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oracle {
    space: BitSpace,
    target: usize,
}

impl Oracle {
    /// Oracle for basis index `target` of a `num_qubits`-qubit register.
    pub fn new(num_qubits: usize, target: usize) -> GroverResult<Self> {
        let space = BitSpace::new(num_qubits)?;
        if !space.contains(target) {
            return Err(GroverError::IndexOutOfRange {
                index: target,
                width: num_qubits,
            });
        }
        Ok(Self { space, target })
    }

    /// Oracle for an MSB-first bitstring; its length sets the register width.
    pub fn from_bitstring(bitstring: &str) -> GroverResult<Self> {
        let target = bitspace::from_bitstring(bitstring)?;
        Self::new(bitstring.len(), target)
    }

    /// Oracle for a per-qubit pattern, qubit 0 first.
    pub fn from_qubit_pattern(pattern: &[u8]) -> GroverResult<Self> {
        if pattern.is_empty() || pattern.iter().any(|&bit| bit > 1) {
            return Err(GroverError::InvalidBitstring(format!("{pattern:?}")));
        }
        let target = pattern
            .iter()
            .enumerate()
            .fold(0usize, |acc, (qubit, &bit)| acc | (usize::from(bit) << qubit));
        Self::new(pattern.len(), target)
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.space.width()
    }

    /// Marked basis index.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Marked state as an MSB-first bitstring.
    pub fn target_bitstring(&self) -> String {
        format!("{:0width$b}", self.target, width = self.space.width())
    }

    /// Marked state as per-qubit bits, qubit 0 first.
    pub fn qubit_pattern(&self) -> Vec<u8> {
        (0..self.space.width())
            .map(|qubit| ((self.target >> qubit) & 1) as u8)
            .collect()
    }

    /// Flip the sign of the marked amplitude.
    pub fn apply(&self, state: &mut StateVector) -> GroverResult<()> {
        if state.num_qubits() != self.space.width() {
            return Err(GroverError::InvalidWidth {
                width: state.num_qubits(),
                max: self.space.width(),
            });
        }
        state.apply_phase_flip(self.target)
    }
}
