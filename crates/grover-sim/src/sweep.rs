//! Named scenarios and parallel parameter sweeps.
//!
//! Every point of a sweep is an independent engine, so points run on the
//! rayon pool with nothing shared between them. When the configuration
//! carries a seed, point `i` samples with `seed + i`; the sequential and
//! parallel runners therefore produce identical reports for the same input.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::HarnessConfig;
use crate::error::{GroverError, GroverResult};
use crate::harness::{GroverTestReport, run_grover_test_with};
use crate::iterations::optimal_iterations;
use crate::statevector::MAX_QUBITS;

/// One `(width, marked item, iterations)` point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scenario {
    /// Register width.
    pub num_qubits: usize,
    /// Marked basis index.
    pub marked_item: usize,
    /// Grover iterations to apply.
    pub iterations: usize,
}

impl Scenario {
    /// Scenario with an explicit iteration count. Nothing is validated until
    /// the scenario runs.
    pub fn new(num_qubits: usize, marked_item: usize, iterations: usize) -> Self {
        Self {
            num_qubits,
            marked_item,
            iterations,
        }
    }

    /// Scenario using the optimal iteration count for its width.
    pub fn optimal(num_qubits: usize, marked_item: usize) -> Self {
        Self::new(num_qubits, marked_item, optimal_iterations(num_qubits))
    }

    /// Short label such as `n=3 target=5 k=2`.
    pub fn label(&self) -> String {
        format!(
            "n={} target={} k={}",
            self.num_qubits, self.marked_item, self.iterations
        )
    }
}

/// The four reference searches: 2, 3, 3 and 4 qubits at optimal iterations.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(2, 2, 1),
        Scenario::new(3, 5, 2),
        Scenario::new(3, 0, 2),
        Scenario::new(4, 13, 3),
    ]
}

/// Every marked item of every width in `widths`, each at optimal iterations.
///
/// Widths outside `1..=MAX_QUBITS` are rejected before anything is built.
pub fn exhaustive_scenarios(
    widths: impl IntoIterator<Item = usize>,
) -> GroverResult<Vec<Scenario>> {
    let mut scenarios = Vec::new();
    for n in widths {
        if n == 0 || n > MAX_QUBITS {
            return Err(GroverError::InvalidWidth {
                width: n,
                max: MAX_QUBITS,
            });
        }
        scenarios.extend((0..1usize << n).map(|target| Scenario::optimal(n, target)));
    }
    Ok(scenarios)
}

/// Result of one scenario; errors stay attached to the point that caused them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub report: GroverResult<GroverTestReport>,
}

impl ScenarioOutcome {
    /// Whether the run completed and met its threshold.
    pub fn passed(&self) -> bool {
        matches!(&self.report, Ok(report) if report.passed)
    }
}

/// Pass/fail tally over a set of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Points run.
    pub total: usize,
    /// Points that met their threshold.
    pub passed: usize,
    /// Points that ran but fell below their threshold.
    pub failed: usize,
    /// Points whose inputs were rejected before simulation.
    pub rejected: usize,
}

impl SweepSummary {
    /// Tally a batch of outcomes.
    pub fn from_outcomes(outcomes: &[ScenarioOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut acc, outcome| {
            acc.total += 1;
            match &outcome.report {
                Ok(report) if report.passed => acc.passed += 1,
                Ok(_) => acc.failed += 1,
                Err(_) => acc.rejected += 1,
            }
            acc
        })
    }

    /// Whether every point passed (vacuously true for an empty batch).
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Run the scenario at position `index` of a batch.
///
/// A configured seed is offset by `index`.
pub fn run_scenario(index: usize, scenario: Scenario, config: &HarnessConfig) -> ScenarioOutcome {
    let mut point_config = config.clone();
    point_config.seed = config.seed.map(|seed| seed.wrapping_add(index as u64));
    let report = run_grover_test_with(
        scenario.num_qubits,
        scenario.marked_item,
        scenario.iterations,
        &point_config,
    );
    ScenarioOutcome { scenario, report }
}

/// Run scenarios one after another.
pub fn run_scenarios(scenarios: &[Scenario], config: &HarnessConfig) -> Vec<ScenarioOutcome> {
    scenarios
        .iter()
        .enumerate()
        .map(|(i, &scenario)| run_scenario(i, scenario, config))
        .collect()
}

/// Run scenarios on the rayon pool; outcomes keep input order.
#[instrument(level = "info", skip_all, fields(points = scenarios.len()))]
pub fn run_sweep(scenarios: &[Scenario], config: &HarnessConfig) -> Vec<ScenarioOutcome> {
    let outcomes: Vec<_> = scenarios
        .par_iter()
        .enumerate()
        .map(|(i, &scenario)| run_scenario(i, scenario, config))
        .collect();
    let summary = SweepSummary::from_outcomes(&outcomes);
    info!(
        passed = summary.passed,
        failed = summary.failed,
        rejected = summary.rejected,
        "sweep complete"
    );
    outcomes
}
