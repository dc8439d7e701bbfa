//! # sheet: navigating a data store shaped like a spreadsheet
//!
//! [`SheetDb`] computes row/column ranges and reshapes results; the actual
//! fetch goes through a [`SheetAdapter`] chosen at construction. The adapter
//! decides the transport (the CLI crate ships a Google Sheets client); tests use
//! the generated `MockSheetAdapter`.
//!
//! ## Conventions
//! - Indices are zero-based and bounds are inclusive on both ends.
//! - Rows are the outer dimension of a [`Grid`].
//! - Bounds are normalized so `from <= to` on each axis before the adapter
//!   sees them.
//! - Adapter errors are returned unchanged; nothing here retries.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::a1::{self, Bound, Coordinate};

/// Cell values, row-major.
pub type Grid = Vec<Vec<Value>>;

/// An inclusive range along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub from: Bound,
    pub to: Bound,
}

impl Span {
    pub fn new(from: impl Into<Bound>, to: impl Into<Bound>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Everything from index 0 to the end of the axis.
    pub fn all() -> Self {
        Self::new(Bound::At(0), Bound::Unbounded)
    }

    pub fn normalized(self) -> Self {
        Self {
            from: self.from.min(self.to),
            to: self.from.max(self.to),
        }
    }

    /// The A1 range covering `rows` x `cols` on `page`.
    pub fn to_a1_range(page: &str, rows: Span, cols: Span) -> String {
        a1::to_a1_range(
            Some(page),
            Coordinate {
                col: cols.from,
                row: rows.from,
            },
            Coordinate {
                col: cols.to,
                row: rows.to,
            },
        )
    }
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("request for range {range} failed: {message}")]
    Request { range: String, message: String },
    #[error("range {range} returned HTTP {status}: {body}")]
    Status {
        range: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response for range {range}: {message}")]
    Decode { range: String, message: String },
}

/// Reads one rectangular range from a named page.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SheetAdapter: Send + Sync {
    /// `rows` and `cols` are already normalized; either `to` may be unbounded.
    async fn fetch_range(&self, page: &str, rows: Span, cols: Span) -> Result<Grid, SheetError>;
}

pub struct SheetDb<A> {
    adapter: A,
}

impl<A: SheetAdapter> SheetDb<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// Rows `from..=to`, every column.
    pub async fn read_rows(
        &self,
        page: &str,
        from: impl Into<Bound>,
        to: impl Into<Bound>,
    ) -> Result<Grid, SheetError> {
        self.read_spans(page, Span::new(from, to), Span::all()).await
    }

    /// Columns `from..=to`, every row.
    pub async fn read_columns(
        &self,
        page: &str,
        from: impl Into<Bound>,
        to: impl Into<Bound>,
    ) -> Result<Grid, SheetError> {
        self.read_spans(page, Span::all(), Span::new(from, to)).await
    }

    pub async fn read_rectangle(
        &self,
        page: &str,
        from_row: impl Into<Bound>,
        to_row: impl Into<Bound>,
        from_col: impl Into<Bound>,
        to_col: impl Into<Bound>,
    ) -> Result<Grid, SheetError> {
        self.read_spans(
            page,
            Span::new(from_row, to_row),
            Span::new(from_col, to_col),
        )
        .await
    }

    async fn read_spans(&self, page: &str, rows: Span, cols: Span) -> Result<Grid, SheetError> {
        let (rows, cols) = (rows.normalized(), cols.normalized());
        tracing::debug!(page, rows = ?rows, cols = ?cols, "[SHEET] Reading range");
        self.adapter.fetch_range(page, rows, cols).await
    }
}

/// Swaps rows and columns. Short rows are padded with `null` up to the widest
/// row, so ragged input comes back rectangular.
pub fn transpose(grid: &[Vec<Value>]) -> Grid {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|c| {
            grid.iter()
                .map(|row| row.get(c).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}
