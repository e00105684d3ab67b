//! Conversions between basis indices and fixed-width bitstrings.
//!
//! Bitstrings are MSB-first: the leftmost character is qubit `width - 1`,
//! the rightmost is qubit 0. Inside the simulator qubit `q` is bit `q` of the
//! basis index, so the per-qubit view of an index ("qubit pattern", qubit 0
//! first) is the reverse of its bitstring. [`reverse`] is the one place that
//! crossing happens.

use crate::error::{GroverError, GroverResult};

/// Widest register the conversions accept (indices must fit a `usize`).
pub const MAX_WIDTH: usize = usize::BITS as usize - 1;

/// Render `index` as a zero-padded MSB-first bitstring of `width` characters.
///
/// Fails when `width` is zero or too wide, or when `index >= 2^width`.
pub fn to_bitstring(index: usize, width: usize) -> GroverResult<String> {
    let dimension = dimension(width)?;
    if index >= dimension {
        return Err(GroverError::IndexOutOfRange { index, width });
    }
    Ok(format!("{index:0width$b}"))
}

/// Split a bitstring into its digits, in the same (MSB-first) order.
pub fn to_index_list(bitstring: &str) -> GroverResult<Vec<u8>> {
    validate(bitstring)?;
    Ok(bitstring.bytes().map(|b| b - b'0').collect())
}

/// Reverse the bit order of a bitstring.
pub fn reverse(bitstring: &str) -> String {
    bitstring.chars().rev().collect()
}

/// Parse an MSB-first bitstring back into its basis index.
pub fn from_bitstring(bitstring: &str) -> GroverResult<usize> {
    validate(bitstring)?;
    if bitstring.len() > MAX_WIDTH {
        return Err(GroverError::InvalidWidth {
            width: bitstring.len(),
            max: MAX_WIDTH,
        });
    }
    usize::from_str_radix(bitstring, 2)
        .map_err(|_| GroverError::InvalidBitstring(bitstring.to_string()))
}

/// Number of basis states of a `width`-qubit register.
pub fn dimension(width: usize) -> GroverResult<usize> {
    if width == 0 || width > MAX_WIDTH {
        return Err(GroverError::InvalidWidth {
            width,
            max: MAX_WIDTH,
        });
    }
    Ok(1usize << width)
}

fn validate(bitstring: &str) -> GroverResult<()> {
    if bitstring.is_empty() || !bitstring.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(GroverError::InvalidBitstring(bitstring.to_string()));
    }
    Ok(())
}

/// The computational basis of a register of fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSpace {
    width: usize,
}

impl BitSpace {
    /// Create the basis of a `width`-qubit register.
    pub fn new(width: usize) -> GroverResult<Self> {
        dimension(width)?;
        Ok(Self { width })
    }

    /// Register width in qubits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of basis states, `2^width`.
    pub fn dimension(&self) -> usize {
        1 << self.width
    }

    /// Whether `index` names a basis state of this register.
    pub fn contains(&self, index: usize) -> bool {
        index < self.dimension()
    }

    /// MSB-first bitstring of `index`.
    pub fn bitstring(&self, index: usize) -> GroverResult<String> {
        to_bitstring(index, self.width)
    }

    /// Index of an MSB-first bitstring, which must have exactly `width` digits.
    pub fn index_of(&self, bitstring: &str) -> GroverResult<usize> {
        if bitstring.len() != self.width {
            return Err(GroverError::InvalidBitstring(bitstring.to_string()));
        }
        from_bitstring(bitstring)
    }

    /// Per-qubit bits of `index`, qubit 0 first.
    pub fn qubit_pattern(&self, index: usize) -> GroverResult<Vec<u8>> {
        let bitstring = self.bitstring(index)?;
        to_index_list(&reverse(&bitstring))
    }

    /// All bitstrings of the register in index order.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.dimension()).map(move |index| format!("{index:0width$b}", width = self.width))
    }
}
