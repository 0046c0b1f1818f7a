//! Character grid → message-sized text block.
//!
//! The budget is spent on whole rows only. Each row costs its width plus one
//! separator, and one row's worth is held back as headroom:
//!
//! ```text
//! row_budget = floor((M - W) / (W + 1))
//! ```
//!
//! A block that cannot hold a single row comes back empty; callers report
//! that as "output too large" rather than sending a sliver of a row.

use crate::error::{ImagingError, Result};

/// A rectangular grid of characters, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl CharGrid {
    /// `cells.len()` must equal `width * height`; the quantizer guarantees it.
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<char>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a grid from equal-width rows.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let width = rows
            .first()
            .map(|r| r.as_ref().chars().count())
            .ok_or(ImagingError::EmptyImage)?;
        if width == 0 {
            return Err(ImagingError::EmptyImage);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (i, row) in rows.iter().enumerate() {
            let before = cells.len();
            cells.extend(row.as_ref().chars());
            let actual = cells.len() - before;
            if actual != width {
                return Err(ImagingError::RaggedGrid {
                    row: i,
                    expected: width,
                    actual,
                });
            }
        }

        Ok(Self::from_cells(width, rows.len(), cells))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width)
    }
}

/// Result of rendering a grid into a bounded text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    pub text: String,
    /// Rows actually emitted.
    pub rows: usize,
    /// Rows in the source grid.
    pub total_rows: usize,
}

impl RenderedText {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn is_truncated(&self) -> bool {
        self.rows < self.total_rows
    }
}

/// How many complete `width`-char rows fit in `budget` characters.
pub fn row_budget(width: usize, budget: usize) -> usize {
    budget.saturating_sub(width) / (width + 1)
}

/// Render `grid` as newline-joined rows, never exceeding `budget` chars.
pub fn render_text_block(grid: &CharGrid, budget: usize) -> RenderedText {
    let rows = row_budget(grid.width(), budget).min(grid.height());

    let mut text = String::with_capacity(rows * (grid.width() + 1));
    for (i, row) in grid.rows().take(rows).enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.extend(row.iter());
    }

    RenderedText {
        text,
        rows,
        total_rows: grid.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize) -> CharGrid {
        let row: String = "#".repeat(width);
        let rows: Vec<String> = (0..height).map(|_| row.clone()).collect();
        CharGrid::from_rows(&rows).unwrap()
    }

    #[test]
    fn small_grid_renders_whole() {
        let g = CharGrid::from_rows(&["@#", ". "]).unwrap();
        let out = render_text_block(&g, 100);
        assert_eq!(out.text, "@#\n. ");
        assert_eq!(out.rows, 2);
        assert!(!out.is_truncated());
    }

    #[test]
    fn telegram_sized_budget_for_forty_columns() {
        // (4000 - 40) / 41 = 96
        assert_eq!(row_budget(40, 4000), 96);
        let out = render_text_block(&grid(40, 200), 4000);
        assert_eq!(out.rows, 96);
        assert_eq!(out.total_rows, 200);
        assert!(out.is_truncated());
        assert!(out.text.chars().count() <= 4000);
    }

    #[test]
    fn never_exceeds_budget_and_never_splits_a_row() {
        for width in 1..=12usize {
            for height in 1..=12usize {
                let g = grid(width, height);
                for budget in (width + 1)..=(width + 1) * (height + 2) {
                    let out = render_text_block(&g, budget);
                    let len = out.text.chars().count();
                    assert!(len <= budget, "w={width} h={height} m={budget} len={len}");
                    if out.rows > 0 {
                        assert!(out.text.split('\n').all(|r| r.chars().count() == width));
                        assert_eq!(out.text.split('\n').count(), out.rows);
                    }
                }
            }
        }
    }

    #[test]
    fn budget_too_small_yields_empty_block() {
        let out = render_text_block(&grid(40, 10), 80);
        assert!(out.is_empty());
        assert_eq!(out.text, "");
    }

    #[test]
    fn budget_below_width_does_not_underflow() {
        assert_eq!(row_budget(40, 10), 0);
    }

    #[test]
    fn multibyte_rows_are_counted_in_chars() {
        let g = CharGrid::from_rows(&["██", "░░"]).unwrap();
        let out = render_text_block(&g, 8);
        assert_eq!(out.rows, 2);
        assert_eq!(out.text, "██\n░░");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(matches!(
            CharGrid::from_rows(&["###", "#"]),
            Err(ImagingError::RaggedGrid { row: 1, .. })
        ));
    }

    #[test]
    fn empty_rows_are_rejected() {
        let rows: [&str; 0] = [];
        assert!(matches!(
            CharGrid::from_rows(&rows),
            Err(ImagingError::EmptyImage)
        ));
    }
}
