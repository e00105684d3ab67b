//! End-to-end Grover test: simulate, sample, judge.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::bitspace;
use crate::config::HarnessConfig;
use crate::engine::GroverEngine;
use crate::error::GroverResult;
use crate::sampler::{self, Counts, Verdict};

/// Why a test run did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The marked item never showed up in the tally.
    NotObserved,
    /// The marked item showed up, but less often than the threshold.
    BelowThreshold,
}

/// Everything a single Grover test produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverTestReport {
    /// Register width.
    pub num_qubits: usize,
    /// Marked basis index.
    pub marked_item: usize,
    /// Grover iterations applied.
    pub iterations: usize,
    /// Marked item as an MSB-first bitstring (the tally key).
    pub target_bitstring: String,
    /// Shots drawn.
    pub shots: u64,
    /// Threshold the observed frequency was held to.
    pub success_threshold: f64,
    /// Whether the observed frequency reached the threshold.
    pub passed: bool,
    /// Fraction of shots that produced the marked item.
    pub observed_probability: f64,
    /// Marked-item probability in the simulated final state.
    pub exact_probability: f64,
    /// Set when `passed` is false.
    pub failure: Option<FailureReason>,
    /// Raw measurement tally.
    pub counts: Counts,
}

/// Run one Grover search and judge it against `config`.
///
/// Input errors (width, marked item, shots, threshold) are returned before
/// any simulation work happens. A low success rate is not an error; it is
/// reported through [`GroverTestReport::passed`] and
/// [`GroverTestReport::failure`].
#[instrument(level = "debug", skip(config), fields(shots = config.shots))]
pub fn run_grover_test_with(
    num_qubits: usize,
    marked_item: usize,
    iterations: usize,
    config: &HarnessConfig,
) -> GroverResult<GroverTestReport> {
    config.validate()?;
    let target_bitstring = bitspace::to_bitstring(marked_item, num_qubits)?;

    let mut engine = GroverEngine::new(num_qubits, marked_item, iterations)?
        .with_diffusion_method(config.diffusion);
    let table = engine.run()?;
    let exact_probability = table.get(marked_item).unwrap_or(0.0);

    let counts = sampler::sample_seeded(&table, config.shots, config.seed)?;
    let verdict = sampler::evaluate(
        &counts,
        &target_bitstring,
        config.shots,
        config.success_threshold,
    );

    let failure = failure_reason(&verdict, &counts, &target_bitstring);

    debug!(
        target = %target_bitstring,
        observed = verdict.observed_probability,
        exact = exact_probability,
        passed = verdict.passed,
        "Grover test finished"
    );

    Ok(GroverTestReport {
        num_qubits,
        marked_item,
        iterations,
        target_bitstring,
        shots: config.shots,
        success_threshold: config.success_threshold,
        passed: verdict.passed,
        observed_probability: verdict.observed_probability,
        exact_probability,
        failure,
        counts,
    })
}

fn failure_reason(verdict: &Verdict, counts: &Counts, target: &str) -> Option<FailureReason> {
    if verdict.passed {
        None
    } else if counts.contains(target) {
        Some(FailureReason::BelowThreshold)
    } else {
        Some(FailureReason::NotObserved)
    }
}

/// Run one Grover search with the given shots and threshold, returning the
/// verdict and the raw tally.
///
/// Errors never escape: an out-of-range marked item (or any other rejected
/// input) is logged and yields `(false, Counts::new())`.
pub fn run_grover_test(
    num_qubits: usize,
    marked_item: usize,
    iterations: usize,
    shots: u64,
    success_threshold: f64,
) -> (bool, Counts) {
    let config = HarnessConfig::default()
        .with_shots(shots)
        .with_threshold(success_threshold);
    match run_grover_test_with(num_qubits, marked_item, iterations, &config) {
        Ok(report) => (report.passed, report.counts),
        Err(err) if err.is_range_error() => {
            warn!(num_qubits, marked_item, %err, "Grover test rejected");
            (false, Counts::new())
        }
        Err(err) => {
            error!(num_qubits, marked_item, %err, "Grover test aborted");
            (false, Counts::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_SHOTS, DEFAULT_SUCCESS_THRESHOLD};
    use crate::error::GroverError;

    #[test]
    fn test_two_qubit_scenario_passes() {
        let (passed, counts) = run_grover_test(2, 2, 1, DEFAULT_SHOTS, DEFAULT_SUCCESS_THRESHOLD);
        assert!(passed);
        assert_eq!(counts.total(), DEFAULT_SHOTS);
        assert!(counts.get("10") as f64 / DEFAULT_SHOTS as f64 >= 0.75);
    }

    #[test]
    fn test_out_of_range_returns_empty() {
        let (passed, counts) = run_grover_test(2, 5, 1, DEFAULT_SHOTS, DEFAULT_SUCCESS_THRESHOLD);
        assert!(!passed);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_report_propagates_range_error() {
        let config = HarnessConfig::default().with_seed(1);
        assert_eq!(
            run_grover_test_with(2, 5, 1, &config),
            Err(GroverError::IndexOutOfRange { index: 5, width: 2 })
        );
    }

    #[test]
    fn test_zero_iterations_fails_threshold() {
        let config = HarnessConfig::default().with_seed(11);
        let report = run_grover_test_with(3, 5, 0, &config).unwrap();
        assert!(!report.passed);
        assert!((report.exact_probability - 0.125).abs() < 1e-9);
        assert!(report.observed_probability < 0.25);
        assert!(report.failure.is_some());
    }

    #[test]
    fn test_failure_reasons() {
        let mut counts = Counts::new();
        counts.insert("01", 90);
        counts.insert("10", 10);

        let below = sampler::evaluate(&counts, "10", 100, 0.75);
        assert_eq!(
            failure_reason(&below, &counts, "10"),
            Some(FailureReason::BelowThreshold)
        );

        let missing = sampler::evaluate(&counts, "11", 100, 0.75);
        assert_eq!(
            failure_reason(&missing, &counts, "11"),
            Some(FailureReason::NotObserved)
        );

        let passed = sampler::evaluate(&counts, "01", 100, 0.75);
        assert_eq!(failure_reason(&passed, &counts, "01"), None);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_simulation() {
        let config = HarnessConfig::default().with_shots(0);
        assert_eq!(
            run_grover_test_with(2, 1, 1, &config),
            Err(GroverError::InvalidShots)
        );
        let (passed, counts) = run_grover_test(2, 1, 1, 1024, 2.0);
        assert!(!passed);
        assert!(counts.is_empty());
    }
}
