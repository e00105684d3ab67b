//! Error types for the simulator crate.

use thiserror::Error;

use crate::engine::EngineState;

/// Errors produced by the Grover simulator and its test harness.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum GroverError {
    /// A basis index does not fit the register width.
    #[error("index {index} is out of range for a {width}-qubit register")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Register width in qubits.
        width: usize,
    },

    /// Register width is zero or exceeds what the caller supports.
    #[error("register width must be between 1 and {max} qubits, got {width}")]
    InvalidWidth {
        /// Requested width.
        width: usize,
        /// Largest supported width.
        max: usize,
    },

    /// A gate addressed a qubit the register does not have.
    #[error("gate references qubit {qubit} but register only has {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// A gate's control and target qubits overlap.
    #[error("invalid gate: {0}")]
    InvalidGate(String),

    /// A bitstring contained something other than '0' and '1', or was empty.
    #[error("invalid bitstring {0:?}: expected a non-empty string of '0' and '1'")]
    InvalidBitstring(String),

    /// The engine is not in a state that allows the requested operation.
    #[error("cannot {operation} while engine is {state}")]
    InvalidState {
        /// Current engine state.
        state: EngineState,
        /// The rejected operation.
        operation: &'static str,
    },

    /// Total probability left the normalization tolerance.
    ///
    /// This signals a broken operator, not bad input.
    #[error("total probability drifted to {total} (tolerance {tolerance:e})")]
    NumericDrift {
        /// Observed Σ|aᵢ|².
        total: f64,
        /// Allowed deviation from 1.
        tolerance: f64,
    },

    /// Amplitudes handed to the state vector are unusable.
    #[error("invalid amplitudes: {0}")]
    InvalidAmplitudes(String),

    /// Sampling requires at least one shot.
    #[error("shots must be at least 1")]
    InvalidShots,

    /// Success thresholds are probabilities.
    #[error("success threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f64),

    /// The probability table could not be turned into a sampling distribution.
    #[error("invalid sampling distribution: {0}")]
    InvalidDistribution(String),
}

impl GroverError {
    /// Whether the error stems from an out-of-range input (index, width or
    /// bitstring) that the caller can correct and retry.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::InvalidWidth { .. } | Self::InvalidBitstring(_)
        )
    }
}

/// Result type for simulator operations.
pub type GroverResult<T> = Result<T, GroverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_classification() {
        assert!(GroverError::IndexOutOfRange { index: 5, width: 2 }.is_range_error());
        assert!(GroverError::InvalidWidth { width: 0, max: 20 }.is_range_error());
        assert!(!GroverError::InvalidShots.is_range_error());
        assert!(
            !GroverError::InvalidState {
                state: EngineState::Uninitialized,
                operation: "step",
            }
            .is_range_error()
        );
    }

    #[test]
    fn test_messages() {
        let err = GroverError::IndexOutOfRange { index: 5, width: 2 };
        assert_eq!(
            err.to_string(),
            "index 5 is out of range for a 2-qubit register"
        );
        let err = GroverError::InvalidState {
            state: EngineState::Uninitialized,
            operation: "measure",
        };
        assert_eq!(err.to_string(), "cannot measure while engine is uninitialized");
    }
}
