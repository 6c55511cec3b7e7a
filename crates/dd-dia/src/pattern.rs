//! The set of stored diagonals of a DIA matrix.

use std::fmt;
use std::ops::Range;

use crate::error::{DiaError, Result};

/// Sorted, duplicate-free diagonal offsets of a `rows x cols` matrix.
///
/// Offset `d` names the positions `(i, i + d)`: zero is the main diagonal,
/// positive offsets lie above it and negative ones below. Every stored offset
/// satisfies `-rows < d < cols`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiaPattern {
    rows: usize,
    cols: usize,
    offsets: Vec<i64>,
}

impl DiaPattern {
    /// Create a pattern, sorting `offsets` ascending.
    ///
    /// # Errors
    /// `OffsetOutOfRange` if an offset does not touch the matrix,
    /// `DuplicateOffset` if an offset appears twice.
    pub fn new(rows: usize, cols: usize, offsets: impl IntoIterator<Item = i64>) -> Result<Self> {
        let mut offsets: Vec<i64> = offsets.into_iter().collect();
        offsets.sort_unstable();

        if let Some(w) = offsets.windows(2).find(|w| w[0] == w[1]) {
            return Err(DiaError::DuplicateOffset(w[0]));
        }
        if let Some(&offset) = offsets
            .iter()
            .find(|&&d| d <= -(rows as i64) || d >= cols as i64)
        {
            return Err(DiaError::OffsetOutOfRange { offset, rows, cols });
        }

        Ok(DiaPattern {
            rows,
            cols,
            offsets,
        })
    }

    /// A `rows x cols` pattern holding every diagonal within `lower` below and
    /// `upper` above the main one, clipped to the matrix.
    pub fn banded(rows: usize, cols: usize, lower: usize, upper: usize) -> Result<Self> {
        let lo = -(lower.min(rows.saturating_sub(1)) as i64);
        let hi = upper.min(cols.saturating_sub(1)) as i64;
        let offsets: Vec<i64> = if rows == 0 || cols == 0 {
            Vec::new()
        } else {
            (lo..=hi).collect()
        };
        Self::new(rows, cols, offsets)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The stored offsets in ascending order.
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    /// Number of stored diagonals.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Position of `offset` in [`offsets`](Self::offsets), if stored.
    pub fn index_of(&self, offset: i64) -> Option<usize> {
        self.offsets.binary_search(&offset).ok()
    }

    /// Index range of the stored offsets lying in `lo..=hi`.
    ///
    /// Stored offsets are sorted, so the result is found by two binary
    /// searches and is always contiguous.
    pub fn offsets_in(&self, lo: i64, hi: i64) -> Range<usize> {
        let start = self.offsets.partition_point(|&d| d < lo);
        let end = self.offsets.partition_point(|&d| d <= hi);
        start..end.max(start)
    }

    /// Rows `i` for which `(i, i + d)` lies inside the matrix, `d` being the
    /// `k`-th stored offset.
    ///
    /// # Panics
    /// Panics if `k >= len()`.
    pub fn row_range(&self, k: usize) -> Range<usize> {
        diagonal_rows(self.offsets[k], self.rows, self.cols)
    }

    /// Number of in-bounds positions on the `k`-th stored diagonal.
    pub fn diagonal_len(&self, k: usize) -> usize {
        self.row_range(k).len()
    }

    /// Total number of in-bounds positions covered by the pattern.
    pub fn nnz(&self) -> usize {
        (0..self.len()).map(|k| self.diagonal_len(k)).sum()
    }

    /// Index of the stored diagonal through `(i, j)`, if any.
    pub fn diagonal_at(&self, i: usize, j: usize) -> Option<usize> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        self.index_of(j as i64 - i as i64)
    }
}

/// Rows `i` with `0 <= i < rows` and `0 <= i + d < cols`.
pub(crate) fn diagonal_rows(d: i64, rows: usize, cols: usize) -> Range<usize> {
    let start = (-d).max(0) as usize;
    let end = (cols as i64 - d).clamp(0, rows as i64) as usize;
    start.min(end)..end
}

impl fmt::Display for DiaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}x{}] offsets {:?}", self.rows, self.cols, self.offsets)
    }
}
