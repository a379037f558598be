#![forbid(unsafe_code)]

//! Fixed, finite order of symbols for one tracing round.

use thiserror::Error;

/// Invalid symbol sequence definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("symbol sequence is empty")]
    Empty,

    #[error("symbol {0:?} appears more than once")]
    Duplicate(char),
}

/// Cursor over a non-empty list of distinct symbols.
///
/// The cursor starts on the first symbol and only moves forward. Once the
/// last symbol is reached, [`advance`](Self::advance) reports exhaustion and
/// the cursor stays put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSequence {
    symbols: Vec<char>,
    index: usize,
}

impl Default for SymbolSequence {
    /// The standard tracing round: `A`, `B`, `C`, `D`.
    fn default() -> Self {
        Self {
            symbols: vec!['A', 'B', 'C', 'D'],
            index: 0,
        }
    }
}

impl SymbolSequence {
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Result<Self, SequenceError> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(SequenceError::Empty);
        }
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].contains(symbol) {
                return Err(SequenceError::Duplicate(*symbol));
            }
        }
        Ok(Self { symbols, index: 0 })
    }

    /// Symbol currently being traced.
    #[must_use]
    pub fn current(&self) -> char {
        self.symbols[self.index]
    }

    /// Zero-based position of the current symbol.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.symbols.len()
    }

    /// Move to the next symbol, returning it, or `None` when already at the end.
    pub fn advance(&mut self) -> Option<char> {
        if self.is_last() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    /// Share of the round shown as reached, counting the current symbol.
    #[must_use]
    pub fn display_percent(&self) -> f64 {
        ((self.index + 1) as f64 / self.symbols.len() as f64) * 100.0
    }
}
