//! Positional numeral encoding over an arbitrary ordered symbol alphabet.
//!
//! `alphabet[0]` is the zero symbol and the radix is the alphabet length, so
//! `['0', '1']` gives binary and `['A'..='Z']` gives a plain (non-bijective)
//! base-26 numeral. Column labels in A1 notation are built on top of this in
//! [`crate::a1`].

use thiserror::Error;

/// A validated symbol alphabet: at least one symbol, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("alphabet must contain at least one symbol")]
    Empty,
    #[error("symbol {0:?} appears more than once in the alphabet")]
    Duplicate(char),
}

impl Alphabet {
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Result<Self, AlphabetError> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }
        for (i, s) in symbols.iter().enumerate() {
            if symbols[..i].contains(s) {
                return Err(AlphabetError::Duplicate(*s));
            }
        }
        Ok(Self { symbols })
    }

    /// The 26 upper-case Latin letters, `A` through `Z`.
    pub fn latin_upper() -> Self {
        Self {
            symbols: ('A'..='Z').collect(),
        }
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn radix(&self) -> usize {
        self.symbols.len()
    }

    pub fn encode(&self, value: u64, min_digits: usize) -> String {
        encode(value, &self.symbols, min_digits)
    }
}

/// Encodes `value` in the base given by `alphabet`, left-padding with the zero
/// symbol up to `min_digits`.
///
/// An empty alphabet yields an empty string. A single-symbol alphabet has no
/// digit besides zero, so every value encodes as the (padded) zero symbol.
pub fn encode(value: u64, alphabet: &[char], min_digits: usize) -> String {
    let Some(&zero) = alphabet.first() else {
        return String::new();
    };
    let radix = alphabet.len() as u64;

    let digits: Vec<char> = if radix == 1 {
        vec![zero]
    } else if value < radix {
        vec![alphabet[value as usize]]
    } else {
        let mut rest = value;
        let mut out = Vec::new();
        while rest > 0 {
            out.push(alphabet[(rest % radix) as usize]);
            rest /= radix;
        }
        out.reverse();
        out
    };

    let mut encoded = String::with_capacity(min_digits.max(digits.len()));
    for _ in digits.len()..min_digits {
        encoded.push(zero);
    }
    encoded.extend(digits);
    encoded
}
