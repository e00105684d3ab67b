//! `grover-sim` — noiseless statevector simulation of Grover search.
//!
//! A register of `n` qubits is held as `2^n` complex amplitudes. One Grover
//! iteration is a phase oracle that negates the marked basis state followed
//! by a diffuser that reflects every amplitude about the mean. After the
//! iterations the squared magnitudes give the final distribution, which the
//! harness samples a fixed number of times and judges against a threshold.
//!
//! - [`GroverEngine`] drives a single search through its lifecycle
//! - [`PhaseKickbackCircuit`] builds the same search from H, X and
//!   multi-controlled X gates with an ancilla in |−⟩
//! - [`run_grover_test`] and [`sweep::run_sweep`] sample and score searches
//!
//! Qubit `q` is bit `q` of a basis index. Bitstrings, including measurement
//! tally keys, are written most significant bit first.
//!
//! # Quick start
//!
//! ```rust
//! use grover_sim::{GroverEngine, HarnessConfig, optimal_iterations, run_grover_test_with};
//!
//! // Two qubits need exactly one iteration to find |10⟩.
//! let mut engine = GroverEngine::new(2, 2, optimal_iterations(2)).unwrap();
//! let table = engine.run().unwrap();
//! assert!(table.get_bitstring("10").unwrap() > 0.999);
//!
//! let config = HarnessConfig::default().with_seed(7);
//! let report = run_grover_test_with(2, 2, 1, &config).unwrap();
//! assert!(report.passed);
//! assert_eq!(report.counts.total(), 1024);
//! ```

pub mod bitspace;
pub mod config;
pub mod diffuser;
pub mod engine;
pub mod error;
pub mod harness;
pub mod iterations;
pub mod kickback;
pub mod oracle;
pub mod probability;
pub mod sampler;
pub mod statevector;
pub mod sweep;

pub use bitspace::BitSpace;
pub use config::{DEFAULT_SHOTS, DEFAULT_SUCCESS_THRESHOLD, HarnessConfig};
pub use diffuser::{DiffusionMethod, Diffuser};
pub use engine::{EngineState, GroverEngine};
pub use error::{GroverError, GroverResult};
pub use harness::{FailureReason, GroverTestReport, run_grover_test, run_grover_test_with};
pub use iterations::{optimal_iterations, theoretical_success_probability};
pub use kickback::PhaseKickbackCircuit;
pub use oracle::Oracle;
pub use probability::ProbabilityTable;
pub use sampler::{Counts, Verdict, evaluate, sample, sample_seeded};
pub use statevector::{DRIFT_TOLERANCE, MAX_QUBITS, NORM_TOLERANCE, StateVector};
pub use sweep::{Scenario, ScenarioOutcome, SweepSummary, default_scenarios};
