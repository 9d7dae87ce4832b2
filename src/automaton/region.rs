//! Region extraction, import and centered stamping.

use super::grid::Grid;
use crate::error::{AutomatonError, Result};

impl Grid {
    /// Top-left corner at which a `width` x `height` pattern sits centered.
    ///
    /// Returns `None` if the pattern is larger than the grid on either axis.
    pub fn centered_origin(&self, width: usize, height: usize) -> Option<(usize, usize)> {
        if width > self.width() || height > self.height() {
            return None;
        }
        Some(((self.width() - width) / 2, (self.height() - height) / 2))
    }

    /// Copy the `width` x `height` rectangle whose top-left corner is `(x, y)`.
    pub fn extract_region(&self, x: usize, y: usize, width: usize, height: usize) -> Result<Grid> {
        self.check_region(x, y, width, height)?;

        let mut cells = Vec::with_capacity(width * height);
        for row in y..y + height {
            let start = self.index_of(x, row);
            cells.extend_from_slice(&self.cells()[start..start + width]);
        }

        Grid::from_cells(width, height, cells)
    }

    /// Overwrite the rectangle at `(x, y)` with `pattern`.
    ///
    /// Nothing is written unless the whole pattern fits.
    pub fn import_region(&mut self, pattern: &Grid, x: usize, y: usize) -> Result<()> {
        self.check_region(x, y, pattern.width(), pattern.height())?;

        for (dy, row) in pattern.cells().chunks(pattern.width()).enumerate() {
            let start = self.index_of(x, y + dy);
            self.cells_mut()[start..start + row.len()].copy_from_slice(row);
        }

        Ok(())
    }

    /// Overwrite the centered region of matching size with `pattern`.
    pub fn stamp(&mut self, pattern: &Grid) -> Result<()> {
        let (x, y) = self
            .centered_origin(pattern.width(), pattern.height())
            .ok_or(AutomatonError::OutOfBounds {
                x: pattern.width(),
                y: pattern.height(),
                width: self.width(),
                height: self.height(),
            })?;

        self.import_region(pattern, x, y)
    }

    fn check_region(&self, x: usize, y: usize, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(AutomatonError::InvalidDimensions { width, height });
        }

        let x_end = x.checked_add(width).filter(|&end| end <= self.width());
        let y_end = y.checked_add(height).filter(|&end| end <= self.height());
        if x_end.is_none() || y_end.is_none() {
            return Err(AutomatonError::OutOfBounds {
                x: x.saturating_add(width).saturating_sub(1),
                y: y.saturating_add(height).saturating_sub(1),
                width: self.width(),
                height: self.height(),
            });
        }

        Ok(())
    }
}
