//! Shot sampling from a probability table and the success verdict.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GroverError, GroverResult};
use crate::probability::ProbabilityTable;

/// Measurement tally: MSB-first bitstring → number of shots that produced it.
///
/// Only observed outcomes are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` shots to `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Shots recorded for `bitstring` (0 when never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Whether `bitstring` was observed at least once.
    pub fn contains(&self, bitstring: &str) -> bool {
        self.counts.contains_key(bitstring)
    }

    /// Total number of shots.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Outcomes ordered by descending count, ties by bitstring.
    pub fn sorted(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(k, &v)| (k.clone(), v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(String, u64)> {
        self.sorted().into_iter().next()
    }
}

/// Draw `shots` independent outcomes from `table` using `rng`.
pub fn sample<R: Rng + ?Sized>(
    table: &ProbabilityTable,
    shots: u64,
    rng: &mut R,
) -> GroverResult<Counts> {
    if shots == 0 {
        return Err(GroverError::InvalidShots);
    }
    let dist = WeightedIndex::new(table.as_slice())
        .map_err(|e| GroverError::InvalidDistribution(e.to_string()))?;

    let mut hits = vec![0u64; table.len()];
    for _ in 0..shots {
        hits[dist.sample(rng)] += 1;
    }

    let width = table.num_qubits();
    let mut counts = Counts::new();
    for (index, n) in hits.into_iter().enumerate().filter(|&(_, n)| n > 0) {
        counts.insert(format!("{index:0width$b}"), n);
    }
    debug!(shots, outcomes = counts.len(), "sampled measurement outcomes");
    Ok(counts)
}

/// Draw `shots` outcomes, reproducibly when `seed` is given.
///
/// Without a seed the thread-local generator is used.
pub fn sample_seeded(
    table: &ProbabilityTable,
    shots: u64,
    seed: Option<u64>,
) -> GroverResult<Counts> {
    match seed {
        Some(seed) => sample(table, shots, &mut StdRng::seed_from_u64(seed)),
        None => sample(table, shots, &mut rand::thread_rng()),
    }
}

/// Outcome of checking a tally against a success threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// `observed_probability >= threshold`.
    pub passed: bool,
    /// Fraction of shots that produced the target.
    pub observed_probability: f64,
}

/// Compare the observed frequency of `target` with `threshold` (inclusive).
pub fn evaluate(counts: &Counts, target: &str, shots: u64, threshold: f64) -> Verdict {
    let observed_probability = if shots == 0 {
        0.0
    } else {
        counts.get(target) as f64 / shots as f64
    };
    Verdict {
        passed: observed_probability >= threshold,
        observed_probability,
    }
}
