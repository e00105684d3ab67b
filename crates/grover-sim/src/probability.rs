//! Measurement probability tables derived from a state vector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bitspace;

/// Probability of each computational basis state, indexed by basis index.
///
/// Tables are snapshots: they never alias the amplitudes they were derived
/// from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    num_qubits: usize,
    probabilities: Vec<f64>,
}

impl ProbabilityTable {
    pub(crate) fn new(num_qubits: usize, probabilities: Vec<f64>) -> Self {
        debug_assert_eq!(probabilities.len(), 1 << num_qubits);
        Self {
            num_qubits,
            probabilities,
        }
    }

    /// Register width the table was taken from.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false; a register has at least two basis states.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probability of basis index `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.probabilities.get(index).copied()
    }

    /// Probability of an MSB-first bitstring of the table's width.
    pub fn get_bitstring(&self, bitstring: &str) -> Option<f64> {
        if bitstring.len() != self.num_qubits {
            return None;
        }
        let index = bitspace::from_bitstring(bitstring).ok()?;
        self.get(index)
    }

    /// Raw probabilities in index order.
    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    /// `(bitstring, probability)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        let width = self.num_qubits;
        self.probabilities
            .iter()
            .enumerate()
            .map(move |(index, &p)| (format!("{index:0width$b}"), p))
    }

    /// Sum of all probabilities.
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// The most probable basis index and its probability.
    ///
    /// Ties resolve to the lowest index.
    pub fn most_likely(&self) -> (usize, f64) {
        self.probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (index, p)| {
                if p > best.1 { (index, p) } else { best }
            })
    }

    /// Bitstring-keyed view, ordered by bitstring.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().collect()
    }
}
