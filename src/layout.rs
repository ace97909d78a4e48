//! Card grid geometry shared by the reducer and the renderer.

use std::ops::Range;

/// Search bar + type filter row.
pub const HEADER_HEIGHT: u16 = 3;
/// Status bar.
pub const FOOTER_HEIGHT: u16 = 1;

pub const CARD_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 13;

/// Extra rows below the viewport that still count as visible for the
/// pagination sensor.
pub const PREFETCH_ROWS: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    pub columns: usize,
    pub visible_rows: usize,
}

impl GridGeometry {
    /// Geometry for a grid drawn into an area of the given size.
    pub fn for_area(width: u16, height: u16) -> Self {
        Self {
            columns: usize::from((width / CARD_WIDTH).max(1)),
            visible_rows: usize::from((height / CARD_HEIGHT).max(1)),
        }
    }

    /// Geometry for the grid area of a full terminal.
    pub fn for_terminal(width: u16, height: u16) -> Self {
        Self::for_area(width, height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT))
    }

    pub fn row_of(&self, index: usize) -> usize {
        index / self.columns
    }

    pub fn rows_for(&self, count: usize) -> usize {
        count.div_ceil(self.columns)
    }

    pub fn cards_per_page(&self) -> usize {
        self.columns * self.visible_rows
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll(&self, count: usize) -> usize {
        self.rows_for(count).saturating_sub(self.visible_rows)
    }

    /// Indices of the cards drawn when the grid starts at `scroll_row`.
    pub fn visible_indices(&self, scroll_row: usize, count: usize) -> Range<usize> {
        let start = (scroll_row * self.columns).min(count);
        let end = (start + self.cards_per_page()).min(count);
        start..end
    }

    /// Scroll offset that keeps `index` on screen, moving as little as possible.
    pub fn scroll_to(&self, index: usize, scroll_row: usize) -> usize {
        let row = self.row_of(index);
        if row < scroll_row {
            row
        } else if row >= scroll_row + self.visible_rows {
            row + 1 - self.visible_rows
        } else {
            scroll_row
        }
    }
}
