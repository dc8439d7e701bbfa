//! A1 notation: spreadsheet coordinates such as `A1`, `$B$7`, `src!A1:A`.
//!
//! Indices are zero-based on the way in; rows print one-based and columns
//! print as bijective base-26 letters (`A`..`Z`, `AA`..`ZZ`, `AAA`..).
//! An [`Bound::Unbounded`] axis prints nothing, which is how open-ended ranges
//! like "the whole of column A" (`A1:A`) are written.

use std::fmt;

use crate::base_n::{self, Alphabet};

/// One axis of a coordinate: a zero-based index or "to the end".
///
/// `Unbounded` orders after every finite index, so `min`/`max` normalize a
/// range the same way for open and closed ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    At(u64),
    Unbounded,
}

impl From<u64> for Bound {
    fn from(i: u64) -> Self {
        Bound::At(i)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::At(i) => write!(f, "{i}"),
            Bound::Unbounded => f.write_str("∞"),
        }
    }
}

/// Which parts of a coordinate get a `$` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    #[default]
    Relative,
    AbsoluteColumn,
    AbsoluteRow,
    Absolute,
}

impl CoordinateMode {
    pub fn absolute_column(self) -> bool {
        matches!(self, CoordinateMode::AbsoluteColumn | CoordinateMode::Absolute)
    }

    pub fn absolute_row(self) -> bool {
        matches!(self, CoordinateMode::AbsoluteRow | CoordinateMode::Absolute)
    }
}

/// A (column, row) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub col: Bound,
    pub row: Bound,
}

impl Coordinate {
    pub fn new(col: u64, row: u64) -> Self {
        Self {
            col: Bound::At(col),
            row: Bound::At(row),
        }
    }
}

/// Formats a single coordinate.
pub fn to_a1(col: Bound, row: Bound, page: Option<&str>, mode: CoordinateMode) -> String {
    let mut out = String::new();
    if let Some(page) = page {
        out.push_str(page);
        out.push('!');
    }
    if mode.absolute_column() {
        out.push('$');
    }
    if let Bound::At(col) = col {
        out.push_str(&column_label(col));
    }
    if mode.absolute_row() {
        out.push('$');
    }
    if let Bound::At(row) = row {
        out.push_str(&(u128::from(row) + 1).to_string());
    }
    out
}

/// Formats the rectangular range spanning `from` and `to` (inclusive), the
/// way range requests are addressed: the page prefix goes on the first corner
/// only, and a single-cell range collapses to one coordinate.
///
/// Corners are normalized per axis first, so reversed input is accepted.
pub fn to_a1_range(page: Option<&str>, from: Coordinate, to: Coordinate) -> String {
    let start = Coordinate {
        col: from.col.min(to.col),
        row: from.row.min(to.row),
    };
    let end = Coordinate {
        col: from.col.max(to.col),
        row: from.row.max(to.row),
    };

    let mut range = to_a1(start.col, start.row, page, CoordinateMode::Relative);
    if start != end {
        range.push(':');
        range.push_str(&to_a1(end.col, end.row, None, CoordinateMode::Relative));
    }
    range
}

/// Column letters for a zero-based column index: 0 → `A`, 25 → `Z`, 26 → `AA`.
///
/// Column labels have no zero digit, so the width is found first by summing
/// 26¹ + 26² + … past `idx`; the index is then re-based inside that width and
/// encoded as a fixed-width plain base-26 numeral.
pub fn column_label(idx: u64) -> String {
    let alphabet = Alphabet::latin_upper();
    let radix = alphabet.radix() as u128;
    let idx = u128::from(idx);

    let mut offset: u128 = 0;
    let mut width: u32 = 0;
    let mut span: u128 = 1;
    while idx >= offset {
        span *= radix;
        offset += span;
        width += 1;
    }
    // `offset - span` is the number of labels shorter than `width`.
    let within = idx - (offset - span);

    base_n::encode(within as u64, alphabet.symbols(), width as usize)
}
