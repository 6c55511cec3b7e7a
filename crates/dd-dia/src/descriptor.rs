//! Block descriptors: a spatial index of the tiles a diagonal pattern crosses.
//!
//! The output index space is cut into `TILE_SIZE x TILE_SIZE` tiles on a
//! regular grid. A [`TiledBlockDescriptor`] keeps one [`BlockRecord`] for each
//! tile crossed by at least one stored diagonal, in row-major tile order, so
//! the tiled kernel never visits the (usually vast) empty part of the grid.
//! [`HostBlockDescriptor`] is the empty stand-in used by the sequential
//! kernel, which walks the diagonals directly.

use std::fmt::Debug;
use std::ops::Range;

use log::debug;
use rayon::prelude::*;

use crate::error::{DiaError, Result};
use crate::pattern::DiaPattern;

/// Side length of a tile.
pub const TILE_SIZE: usize = 16;

/// Most diagonals that can cross one tile.
pub const MAX_TILE_DIAGONALS: usize = 2 * TILE_SIZE - 1;

/// Slots reserved per record for local diagonal offsets.
pub const BLOCK_DIAG_CAPACITY: usize = 2 * TILE_SIZE;

/// Marks the end of a record's local offset list.
pub const DIAG_END: i32 = i32::MIN;

/// Interface shared by the descriptor of every execution target.
pub trait BlockDescriptor: Send + Sync + Debug {
    /// Number of stored block records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One tile crossed by at least one stored diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRecord {
    start_row: usize,
    start_col: usize,
    first_diag: usize,
    diags: [i32; BLOCK_DIAG_CAPACITY],
}

impl BlockRecord {
    /// Row of the tile's upper-left corner.
    pub fn start_row(&self) -> usize {
        self.start_row
    }

    /// Column of the tile's upper-left corner.
    pub fn start_col(&self) -> usize {
        self.start_col
    }

    /// Index in the pattern of the first diagonal crossing this tile.
    ///
    /// Crossing diagonals are consecutive in the pattern, so the `s`-th local
    /// offset belongs to pattern diagonal `first_diag() + s`.
    pub fn first_diag(&self) -> usize {
        self.first_diag
    }

    /// Number of diagonals crossing this tile.
    pub fn len(&self) -> usize {
        self.diags
            .iter()
            .position(|&d| d == DIAG_END)
            .unwrap_or(BLOCK_DIAG_CAPACITY)
    }

    pub fn is_empty(&self) -> bool {
        self.diags[0] == DIAG_END
    }

    /// Local offsets of the crossing diagonals, ascending.
    ///
    /// A local offset is the global offset minus `start_col - start_row`, so
    /// it always lies in `-(TILE_SIZE - 1)..=TILE_SIZE - 1`.
    pub fn diagonals(&self) -> &[i32] {
        &self.diags[..self.len()]
    }

    /// Pattern indices of the crossing diagonals.
    pub fn diagonal_indices(&self) -> Range<usize> {
        self.first_diag..self.first_diag + self.len()
    }
}

/// Descriptor for the sequential target. Holds nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostBlockDescriptor;

impl HostBlockDescriptor {
    /// Accepts the pattern only so both targets share one construction path.
    pub fn new(_pattern: &DiaPattern) -> Self {
        HostBlockDescriptor
    }
}

impl BlockDescriptor for HostBlockDescriptor {
    /// Always zero; the sequential kernel never consults the descriptor.
    fn len(&self) -> usize {
        0
    }
}

/// Compact index of the tiles crossed by a diagonal pattern.
///
/// Owns its records and a copy of the pattern it was built from; the tiled
/// kernel refuses to run against a matrix whose pattern differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiledBlockDescriptor {
    pattern: DiaPattern,
    tile_rows: usize,
    tile_cols: usize,
    records: Vec<BlockRecord>,
}

impl TiledBlockDescriptor {
    /// Build the descriptor, scanning tiles on the current rayon pool.
    ///
    /// Two passes: the first counts crossed tiles so the record array can be
    /// reserved at its exact size, the second fills it. Both keep row-major
    /// tile order, so the result does not depend on scheduling.
    ///
    /// A clipped tile's search window spans at most `MAX_TILE_DIAGONALS`
    /// distinct offsets, so a record never runs out of slots.
    ///
    /// # Errors
    /// `Allocation` if the record array cannot be reserved.
    pub fn build(pattern: &DiaPattern, min_tiles_per_task: usize) -> Result<Self> {
        let grid = TileGrid::new(pattern);
        let n_tiles = grid.len();
        let min_len = min_tiles_per_task.max(1);

        let kept = (0..n_tiles)
            .into_par_iter()
            .with_min_len(min_len)
            .filter(|&t| !grid.span(pattern, t).diags.is_empty())
            .count();

        let mut records = Vec::new();
        records
            .try_reserve_exact(kept)
            .map_err(|_| DiaError::Allocation {
                requested: kept,
                what: "block records",
            })?;
        records.par_extend(
            (0..n_tiles)
                .into_par_iter()
                .with_min_len(min_len)
                .filter_map(|t| grid.span(pattern, t).into_record(pattern)),
        );
        debug_assert_eq!(records.len(), kept);

        debug!(
            "block descriptor for {}: {}x{} tiles, {} crossed",
            pattern, grid.tile_rows, grid.tile_cols, kept
        );

        Ok(TiledBlockDescriptor {
            pattern: pattern.clone(),
            tile_rows: grid.tile_rows,
            tile_cols: grid.tile_cols,
            records,
        })
    }

    /// The block records, in row-major tile order.
    pub fn blocks(&self) -> &[BlockRecord] {
        &self.records
    }

    /// The pattern this descriptor was built from.
    pub fn pattern(&self) -> &DiaPattern {
        &self.pattern
    }

    /// True if this descriptor indexes exactly `pattern`.
    pub fn matches(&self, pattern: &DiaPattern) -> bool {
        self.pattern == *pattern
    }

    /// Tile grid dimensions `(tile_rows, tile_cols)`.
    pub fn grid(&self) -> (usize, usize) {
        (self.tile_rows, self.tile_cols)
    }
}

impl BlockDescriptor for TiledBlockDescriptor {
    fn len(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct TileGrid {
    rows: usize,
    cols: usize,
    tile_rows: usize,
    tile_cols: usize,
}

/// A tile and the index range of the pattern diagonals crossing it.
struct TileSpan {
    row: usize,
    col: usize,
    diags: Range<usize>,
}

impl TileGrid {
    fn new(pattern: &DiaPattern) -> Self {
        TileGrid {
            rows: pattern.rows(),
            cols: pattern.cols(),
            tile_rows: pattern.rows().div_ceil(TILE_SIZE),
            tile_cols: pattern.cols().div_ceil(TILE_SIZE),
        }
    }

    fn len(&self) -> usize {
        self.tile_rows * self.tile_cols
    }

    /// Diagonals crossing tile `t` (row-major tile index).
    ///
    /// The tile is clipped to the matrix, so edge tiles only report diagonals
    /// that have an in-bounds position inside them.
    fn span(&self, pattern: &DiaPattern, t: usize) -> TileSpan {
        let row = (t / self.tile_cols) * TILE_SIZE;
        let col = (t % self.tile_cols) * TILE_SIZE;
        let row_end = (row + TILE_SIZE).min(self.rows);
        let col_end = (col + TILE_SIZE).min(self.cols);

        let lo = col as i64 - (row_end as i64 - 1);
        let hi = (col_end as i64 - 1) - row as i64;
        TileSpan {
            row,
            col,
            diags: pattern.offsets_in(lo, hi),
        }
    }
}

impl TileSpan {
    fn into_record(self, pattern: &DiaPattern) -> Option<BlockRecord> {
        if self.diags.is_empty() {
            return None;
        }
        debug_assert!(self.diags.len() <= MAX_TILE_DIAGONALS);
        let base = self.col as i64 - self.row as i64;
        let mut diags = [DIAG_END; BLOCK_DIAG_CAPACITY];
        for (slot, &d) in diags.iter_mut().zip(&pattern.offsets()[self.diags.clone()]) {
            *slot = (d - base) as i32;
        }
        Some(BlockRecord {
            start_row: self.row,
            start_col: self.col,
            first_diag: self.diags.start,
            diags,
        })
    }
}
