// ABOUTME: Pure grid layout computation from image count and terminal geometry
// ABOUTME: Chooses rows/columns and thumbnail cell size so the grid fits the window width

use crate::geometry::TerminalGeometry;

/// Narrowest usable thumbnail, in character cells.
pub const MIN_CELL_WIDTH: u16 = 16;

/// Terminal cells are roughly twice as tall as they are wide, so a square
/// thumbnail `w` cells wide needs `w / 2` rows.
pub const CELL_ASPECT_RATIO: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
    pub cell_width: u16,
    pub cell_height: u16,
}

impl GridLayout {
    /// Layout for an empty image set.
    pub const EMPTY: GridLayout = GridLayout {
        rows: 0,
        columns: 0,
        cell_width: 0,
        cell_height: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }

    /// Grid position `(row, column)` of the image at `index`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        if self.columns == 0 {
            return (0, 0);
        }
        (index / self.columns, index % self.columns)
    }

    /// Leftmost terminal column of the cell holding `index`.
    pub fn cell_origin(&self, index: usize) -> u16 {
        let (_, column) = self.position(index);
        (column as u16).saturating_mul(self.cell_width)
    }

    /// Total width in cells occupied by one grid row.
    pub fn total_width(&self) -> usize {
        self.columns * self.cell_width as usize
    }
}

/// Compute the grid for `image_count` images in a terminal of `geometry`.
pub fn compute_layout(image_count: usize, geometry: TerminalGeometry) -> GridLayout {
    if image_count == 0 {
        return GridLayout::EMPTY;
    }

    let fitting = (geometry.columns / MIN_CELL_WIDTH) as usize;
    let columns = image_count.min(fitting).max(1);
    let rows = image_count.div_ceil(columns);

    let cell_width = (geometry.columns as usize / columns) as u16;
    let cell_height = cell_width.div_ceil(CELL_ASPECT_RATIO).max(1);

    GridLayout {
        rows,
        columns,
        cell_width,
        cell_height,
    }
}
