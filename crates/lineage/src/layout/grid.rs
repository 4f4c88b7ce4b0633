//! Occupancy grid for row assignment.
//!
//! A [`Grid`] is a growable matrix of time-slots. Columns are slot offsets
//! from the start of the time axis and are fixed at construction; rows are
//! appended on demand and never removed. Every slot is either free or
//! blocked, and the grid knows nothing about the entries that block it.

use std::iter;

use thiserror::Error;

/// Errors raised by grid mutation.
///
/// Reaching one of these means the caller did not grow the grid before
/// touching a row, which is a defect in the caller rather than bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("row {row} does not exist in a grid of {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },
}

/// Boolean occupancy table of `rows × width` time-slots.
///
/// Spans are half-open `[start, end)` slot ranges. A degenerate span
/// (`start == end`) still covers one slot, so point entries take up room.
/// Reserving a span also blocks `padding` slots on either side of it, which
/// keeps neighbours on one row visually apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    padding: usize,
    rows: Vec<Vec<bool>>,
}

impl Grid {
    /// Creates an empty grid `width` slots wide with one slot of padding.
    pub fn new(width: usize) -> Self {
        Self::with_padding(width, 1)
    }

    /// Creates an empty grid with a custom number of padding slots.
    pub fn with_padding(width: usize, padding: usize) -> Self {
        Self {
            width,
            padding,
            rows: Vec::new(),
        }
    }

    /// Number of time-slots per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends one all-free row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(vec![false; self.width]);
        self.rows.len() - 1
    }

    /// Appends rows until row index `row` exists.
    pub fn grow_to(&mut self, row: usize) {
        while self.rows.len() <= row {
            self.add_row();
        }
    }

    /// Returns `true` if every slot of `[start, end)` on `row` is free.
    ///
    /// Slots past the grid width are ignored. A row that does not exist yet
    /// is never free.
    pub fn is_free(&self, row: usize, start: usize, end: usize) -> bool {
        let Some(cells) = self.rows.get(row) else {
            return false;
        };
        let (start, end) = self.clip(start, end);
        cells[start..end].iter().all(|blocked| !blocked)
    }

    /// Blocks `[start, end)` on `row` plus the padding around it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RowOutOfBounds`] if `row` does not exist.
    pub fn reserve(&mut self, row: usize, start: usize, end: usize) -> Result<(), GridError> {
        self.fill(row, start, end, true)
    }

    /// Frees `[start, end)` on `row` plus the padding around it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RowOutOfBounds`] if `row` does not exist.
    pub fn release(&mut self, row: usize, start: usize, end: usize) -> Result<(), GridError> {
        self.fill(row, start, end, false)
    }

    /// Finds a row where `[start, end)` is free, appending one if needed.
    ///
    /// Rows are probed outward from `near`, or from the middle row when no
    /// preference is given, in the order `o, o+1, o-1, o+2, o-2, …`. The
    /// grid only grows when no existing row has room.
    pub fn find_space(&mut self, start: usize, end: usize, near: Option<usize>) -> usize {
        let origin = near.unwrap_or(self.rows.len() / 2);
        if let Some(row) =
            probe_order(origin, self.rows.len()).find(|&row| self.is_free(row, start, end))
        {
            return row;
        }
        self.add_row()
    }

    /// Scans from `from` toward `to` for a row where `[start, end)` is free.
    ///
    /// `from` is included, `to` is not.
    pub fn find_free_row_between(
        &self,
        from: usize,
        to: usize,
        start: usize,
        end: usize,
    ) -> Option<usize> {
        if from <= to {
            (from..to).find(|&row| self.is_free(row, start, end))
        } else {
            (to + 1..=from).rev().find(|&row| self.is_free(row, start, end))
        }
    }

    /// Largest number of rows `lower` can slide up under the bottom of `upper`.
    ///
    /// Stacking the last `k` rows of `upper` onto the first `k` rows of
    /// `lower` must leave no slot blocked in both. `k` is at most
    /// `min(upper.len(), lower.len()) - 1`.
    pub fn max_overlap(upper: &Grid, lower: &Grid) -> usize {
        Self::max_overlap_within(upper, lower, usize::MAX)
    }

    /// [`Grid::max_overlap`] with the candidate additionally capped at `limit`.
    ///
    /// Candidates are tested from the largest down, since a conflict-free
    /// overlap of `k` rows says nothing about smaller ones.
    pub fn max_overlap_within(upper: &Grid, lower: &Grid, limit: usize) -> usize {
        let candidate = upper.len().min(lower.len()).saturating_sub(1).min(limit);
        (1..=candidate)
            .rev()
            .find(|&k| {
                let base = upper.len() - k;
                (0..k).all(|i| !rows_conflict(&upper.rows[base + i], &lower.rows[i]))
            })
            .unwrap_or(0)
    }

    /// ORs the occupancy of `other` into this grid starting at row `offset`.
    pub fn overlay(&mut self, other: &Grid, offset: usize) {
        if other.is_empty() {
            return;
        }
        self.grow_to(offset + other.len() - 1);

        for (target, source) in self.rows[offset..].iter_mut().zip(&other.rows) {
            for (cell, &blocked) in target.iter_mut().zip(source) {
                *cell |= blocked;
            }
        }
    }

    fn fill(
        &mut self,
        row: usize,
        start: usize,
        end: usize,
        blocked: bool,
    ) -> Result<(), GridError> {
        let rows = self.rows.len();
        let (lo, hi) = self.clip(
            start.saturating_sub(self.padding),
            span_end(start, end) + self.padding,
        );
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(GridError::RowOutOfBounds { row, rows })?;
        cells[lo..hi].fill(blocked);
        Ok(())
    }

    fn clip(&self, start: usize, end: usize) -> (usize, usize) {
        let end = span_end(start, end).min(self.width);
        (start.min(end), end)
    }
}

/// Exclusive end of a span, widening degenerate spans to one slot.
pub(super) fn span_end(start: usize, end: usize) -> usize {
    end.max(start + 1)
}

fn rows_conflict(a: &[bool], b: &[bool]) -> bool {
    a.iter().zip(b).any(|(&x, &y)| x && y)
}

/// Row indices below `len` in outward order around `origin`.
///
/// An origin past the last row probes the same order as one on the last row.
fn probe_order(origin: usize, len: usize) -> impl Iterator<Item = usize> {
    let origin = origin.min(len.saturating_sub(1));
    let reach = len;
    let outward = (1..=reach)
        .flat_map(move |step| [origin.checked_add(step), origin.checked_sub(step)])
        .flatten();
    iter::once(origin)
        .chain(outward)
        .filter(move |&row| row < len)
}
