//! Spreadsheet column addresses
//!
//! Column letters use bijective base-26: there is no zero digit, so `Z` is
//! followed by `AA`, not `BA`. Indices are zero-based (`A` = 0).

use crate::error::{Error, Result};

/// Converts column letters (`A`, `Z`, `AA`, `DF`) to a zero-based index.
/// Lower-case letters are accepted.
pub fn to_index(letters: &str) -> Result<usize> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress(letters.to_string()));
    }

    let mut index: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(letters.to_string()));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(digit))
            .ok_or_else(|| Error::InvalidAddress(letters.to_string()))?;
    }

    Ok(index - 1)
}

/// Converts a zero-based index back to column letters (0 -> `A`, 26 -> `AA`).
pub fn to_letters(index: usize) -> String {
    // u128 so that usize::MAX + 1 cannot overflow
    let mut n = index as u128 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Inclusive range of columns, e.g. `DF..=HV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub start: usize,
    pub end: usize,
}

impl ColumnRange {
    /// Builds a range from a pair of column letters.
    pub fn from_letters(start: &str, end: &str) -> Result<Self> {
        let start_idx = to_index(start)?;
        let end_idx = to_index(end)?;
        if start_idx > end_idx {
            return Err(Error::Config(format!(
                "column range {start}..{end} is reversed"
            )));
        }
        Ok(Self {
            start: start_idx,
            end: end_idx,
        })
    }

    pub fn overlaps(&self, other: &ColumnRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// `(label, value)` column pairs: `start`, `start + 2`, ... for as long as
    /// the value column stays inside the range.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.start..self.end)
            .step_by(2)
            .map(|label| (label, label + 1))
    }
}

impl std::fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", to_letters(self.start), to_letters(self.end))
    }
}
