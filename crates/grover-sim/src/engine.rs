//! The Grover search driver.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::diffuser::{DiffusionMethod, Diffuser};
use crate::error::{GroverError, GroverResult};
use crate::oracle::Oracle;
use crate::probability::ProbabilityTable;
use crate::statevector::StateVector;

/// Lifecycle of a [`GroverEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Register allocated in |0...0⟩, nothing applied yet.
    Uninitialized,
    /// Uniform superposition prepared, no iteration applied.
    Superposed,
    /// At least one Grover iteration applied.
    Iterating,
    /// Final distribution taken.
    Measured,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Superposed => "superposed",
            Self::Iterating => "iterating",
            Self::Measured => "measured",
        };
        f.write_str(name)
    }
}

/// Runs a fixed number of Grover iterations for one marked item.
///
/// The engine owns its register; independent engines share nothing and can
/// run on separate threads.
///
/// Calling [`GroverEngine::run`] on an engine that has already been measured
/// starts over from a fresh superposition, so repeated runs return identical
/// tables.
#[derive(Debug, Clone)]
pub struct GroverEngine {
    oracle: Oracle,
    diffuser: Diffuser,
    iterations: usize,
    register: StateVector,
    state: EngineState,
    applied: usize,
}

impl GroverEngine {
    /// Engine searching a `num_qubits` register for basis index `target`,
    /// applying `iterations` Grover iterations per run.
    ///
    /// Range errors are reported before any register is allocated.
    pub fn new(num_qubits: usize, target: usize, iterations: usize) -> GroverResult<Self> {
        let oracle = Oracle::new(num_qubits, target)?;
        Self::from_oracle(oracle, iterations)
    }

    /// Engine driven by an existing oracle.
    pub fn from_oracle(oracle: Oracle, iterations: usize) -> GroverResult<Self> {
        let register = StateVector::zero(oracle.num_qubits())?;
        debug!(
            num_qubits = oracle.num_qubits(),
            target = oracle.target(),
            iterations,
            "created Grover engine"
        );
        Ok(Self {
            oracle,
            diffuser: Diffuser::new(),
            iterations,
            register,
            state: EngineState::Uninitialized,
            applied: 0,
        })
    }

    /// Choose how the diffuser is realized.
    #[must_use]
    pub fn with_diffusion_method(mut self, method: DiffusionMethod) -> Self {
        self.diffuser = Diffuser::with_method(method);
        self
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.oracle.num_qubits()
    }

    /// The oracle in use.
    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    /// Iterations applied by each run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Iterations applied since the last initialization.
    pub fn iterations_applied(&self) -> usize {
        self.applied
    }

    /// The register, once it has been prepared.
    pub fn state_vector(&self) -> GroverResult<&StateVector> {
        self.require_initialized("inspect the register")?;
        Ok(&self.register)
    }

    /// Prepare the uniform superposition, discarding any previous progress.
    pub fn initialize(&mut self) {
        self.register.init_uniform_superposition();
        self.applied = 0;
        self.transition(EngineState::Superposed);
    }

    /// Apply one Grover iteration: oracle, then diffuser.
    pub fn step(&mut self) -> GroverResult<()> {
        match self.state {
            EngineState::Superposed | EngineState::Iterating => {}
            state => {
                return Err(GroverError::InvalidState {
                    state,
                    operation: "apply a Grover iteration",
                });
            }
        }
        self.oracle.apply(&mut self.register)?;
        self.diffuser.apply(&mut self.register)?;
        self.applied += 1;
        if self.state == EngineState::Superposed {
            self.transition(EngineState::Iterating);
        }
        trace!(
            iteration = self.applied,
            marked_probability = self.register.amplitudes()[self.oracle.target()].norm_sqr(),
            "applied Grover iteration"
        );
        Ok(())
    }

    /// Take the final distribution and mark the engine measured.
    pub fn measure(&mut self) -> GroverResult<ProbabilityTable> {
        self.require_initialized("measure")?;
        self.transition(EngineState::Measured);
        Ok(self.register.probabilities())
    }

    /// Prepare, iterate and measure.
    #[instrument(
        level = "debug",
        skip(self),
        fields(
            num_qubits = self.num_qubits(),
            target = self.oracle.target(),
            iterations = self.iterations
        )
    )]
    pub fn run(&mut self) -> GroverResult<ProbabilityTable> {
        if self.state == EngineState::Measured {
            debug!("engine already measured, starting over");
        }
        self.initialize();
        for _ in 0..self.iterations {
            self.step()?;
        }
        let table = self.measure()?;
        debug!(
            marked_probability = table.as_slice()[self.oracle.target()],
            "Grover run complete"
        );
        Ok(table)
    }

    /// Current distribution, without changing state.
    pub fn probabilities(&self) -> GroverResult<ProbabilityTable> {
        self.require_initialized("read probabilities")?;
        Ok(self.register.probabilities())
    }

    /// Current probability of the marked item.
    pub fn marked_probability(&self) -> GroverResult<f64> {
        self.require_initialized("read probabilities")?;
        Ok(self.register.amplitudes()[self.oracle.target()].norm_sqr())
    }

    fn require_initialized(&self, operation: &'static str) -> GroverResult<()> {
        if self.state == EngineState::Uninitialized {
            return Err(GroverError::InvalidState {
                state: self.state,
                operation,
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: EngineState) {
        trace!(from = %self.state, to = %next, "engine state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_target() {
        assert!(matches!(
            GroverEngine::new(2, 4, 1),
            Err(GroverError::IndexOutOfRange { index: 4, width: 2 })
        ));
        assert!(matches!(
            GroverEngine::new(0, 0, 1),
            Err(GroverError::InvalidWidth { width: 0, .. })
        ));
    }

    #[test]
    fn test_state_transitions() {
        let mut engine = GroverEngine::new(3, 5, 2).unwrap();
        assert_eq!(engine.state(), EngineState::Uninitialized);

        engine.initialize();
        assert_eq!(engine.state(), EngineState::Superposed);

        engine.step().unwrap();
        assert_eq!(engine.state(), EngineState::Iterating);
        assert_eq!(engine.iterations_applied(), 1);

        engine.measure().unwrap();
        assert_eq!(engine.state(), EngineState::Measured);
    }

    #[test]
    fn test_uninitialized_operations_fail() {
        let mut engine = GroverEngine::new(2, 1, 1).unwrap();
        assert!(matches!(
            engine.step(),
            Err(GroverError::InvalidState {
                state: EngineState::Uninitialized,
                ..
            })
        ));
        assert!(engine.measure().is_err());
        assert!(engine.probabilities().is_err());
        assert!(engine.marked_probability().is_err());
        assert!(engine.state_vector().is_err());
    }

    #[test]
    fn test_step_after_measure_fails() {
        let mut engine = GroverEngine::new(2, 1, 1).unwrap();
        engine.run().unwrap();
        assert!(matches!(
            engine.step(),
            Err(GroverError::InvalidState {
                state: EngineState::Measured,
                ..
            })
        ));
    }

    #[test]
    fn test_two_qubit_search_is_certain() {
        let mut engine = GroverEngine::new(2, 2, 1).unwrap();
        let table = engine.run().unwrap();
        assert!(table.get(2).unwrap() > 0.9);
        assert!((table.get(2).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_iterations_is_uniform() {
        let mut engine = GroverEngine::new(3, 6, 0).unwrap();
        let table = engine.run().unwrap();
        for p in table.as_slice() {
            assert!((p - 0.125).abs() < 1e-9);
        }
        assert_eq!(engine.state(), EngineState::Measured);
        assert_eq!(engine.iterations_applied(), 0);
    }

    #[test]
    fn test_rerun_resets_and_repeats() {
        let mut engine = GroverEngine::new(4, 13, 3).unwrap();
        let first = engine.run().unwrap();
        let second = engine.run().unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.iterations_applied(), 3);
    }

    #[test]
    fn test_requery_is_idempotent() {
        let mut engine = GroverEngine::new(3, 0, 2).unwrap();
        engine.run().unwrap();
        let a = engine.probabilities().unwrap();
        let b = engine.probabilities().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decomposed_diffuser_gives_same_distribution() {
        let mut closed = GroverEngine::new(4, 7, 3).unwrap();
        let mut gates =
            GroverEngine::new(4, 7, 3).unwrap().with_diffusion_method(DiffusionMethod::Decomposed);
        let a = closed.run().unwrap();
        let b = gates.run().unwrap();
        for (p, q) in a.as_slice().iter().zip(b.as_slice()) {
            assert!((p - q).abs() < 1e-9);
        }
    }
}
