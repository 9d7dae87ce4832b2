//! Grid storage, cell access helpers and text rendering.

use std::fmt;

use rand::Rng;

use super::kernel::Kernel;
use crate::error::{AutomatonError, Result};

/// Glyph drawn for a high cell.
pub const HIGH_GLYPH: char = '█';
/// Glyph drawn for a low cell.
pub const LOW_GLYPH: char = ' ';

/// A fixed-size 2D field of binary cells.
///
/// Cells are stored row-major: `(x, y)` lives at `y * width + x`, with `x`
/// the column (0 is the left edge) and `y` the row (0 is the top edge).
/// `render` emits rows in the same order, so what is drawn on line `y`
/// column `x` is exactly `get(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-low grid.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let size = checked_size(width, height)?;
        Ok(Grid {
            width,
            height,
            cells: vec![false; size],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        let size = checked_size(width, height)?;
        if cells.len() != size {
            return Err(AutomatonError::InvalidDimensions { width, height });
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from rows of glyphs.
    ///
    /// `█`, `#`, `O`, `*` and `1` are high; space, `.` and `0` are low.
    /// Short rows are padded with low cells up to the longest row.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text.lines().collect();
        let height = rows.len();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Grid::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let alive = match glyph {
                    HIGH_GLYPH | '#' | 'O' | '*' | '1' => true,
                    LOW_GLYPH | '.' | '0' => false,
                    _ => {
                        return Err(AutomatonError::InvalidGlyph {
                            glyph,
                            row: y,
                            column: x,
                        })
                    }
                };
                let idx = grid.index_of(x, y);
                grid.cells[idx] = alive;
            }
        }

        Ok(grid)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// Exchange the cell buffer with a same-sized next-generation buffer.
    pub(crate) fn swap_cells(&mut self, next: &mut Vec<bool>) {
        debug_assert_eq!(next.len(), self.cells.len());
        std::mem::swap(&mut self.cells, next);
    }

    /// Calculate the linear index for a 2D coordinate.
    #[inline]
    pub(crate) fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Linear index of `(x + dx, y + dy)`, or `None` when it falls off the grid.
    #[inline]
    pub(crate) fn offset_index(
        &self,
        x: usize,
        y: usize,
        (dx, dy): (isize, isize),
    ) -> Option<usize> {
        let nx = x.checked_add_signed(dx).filter(|&nx| nx < self.width)?;
        let ny = y.checked_add_signed(dy).filter(|&ny| ny < self.height)?;
        Some(self.index_of(nx, ny))
    }

    fn check(&self, x: usize, y: usize) -> Result<usize> {
        if x < self.width && y < self.height {
            Ok(self.index_of(x, y))
        } else {
            Err(AutomatonError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Get the state of a cell.
    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        let idx = self.check(x, y)?;
        Ok(self.cells[idx])
    }

    /// Set the state of a cell.
    pub fn set(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        let idx = self.check(x, y)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Set every cell low.
    pub fn empty(&mut self) {
        self.fill(false);
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: bool) {
        self.cells.fill(value);
    }

    /// Set each cell high with probability `density`, independently.
    ///
    /// Densities outside `[0, 1]` are clamped. `NaN` is rejected.
    pub fn randomize<G: Rng + ?Sized>(&mut self, density: f64, rng: &mut G) -> Result<()> {
        if density.is_nan() {
            return Err(AutomatonError::InvalidProbability(density));
        }
        let clamped = density.clamp(0.0, 1.0);
        if clamped != density {
            log::warn!("density {density} clamped to {clamped}");
        }

        for cell in &mut self.cells {
            *cell = rng.gen_bool(clamped);
        }
        Ok(())
    }

    /// Number of high cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Count high cells around `(x, y)` over the kernel offsets.
    ///
    /// Positions outside the grid count as low.
    #[inline]
    pub fn count_neighbors(&self, kernel: &Kernel, x: usize, y: usize) -> u32 {
        let mut count = 0;

        for &offset in kernel.offsets() {
            if let Some(idx) = self.offset_index(x, y, offset) {
                count += self.cells[idx] as u32;
            }
        }

        count
    }

    /// Rows of glyphs, top to bottom.
    pub fn render(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|&alive| if alive { HIGH_GLYPH } else { LOW_GLYPH })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render().join("\n"))
    }
}

fn checked_size(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(AutomatonError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(AutomatonError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_create_grid() {
        let grid = Grid::new(8, 5).unwrap();
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.cells().len(), 40);
        assert!(grid.cells().iter().all(|&c| !c));
    }

    #[test]
    fn test_create_grid_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::new(0, 4),
            Err(AutomatonError::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(matches!(
            Grid::new(4, 0),
            Err(AutomatonError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Grid::new(usize::MAX, 2),
            Err(AutomatonError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_from_cells_length_mismatch() {
        assert!(Grid::from_cells(2, 2, vec![true; 4]).is_ok());
        assert!(matches!(
            Grid::from_cells(2, 2, vec![true; 3]),
            Err(AutomatonError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_index_of() {
        let grid = Grid::new(4, 3).unwrap();

        assert_eq!(grid.index_of(0, 0), 0);
        assert_eq!(grid.index_of(3, 2), 11);
        assert_eq!(grid.index_of(1, 0), 1);
        assert_eq!(grid.index_of(0, 1), 4);
    }

    #[test]
    fn test_offset_index() {
        let grid = Grid::new(4, 3).unwrap();

        assert_eq!(grid.offset_index(1, 1, (-1, -1)), Some(0));
        assert_eq!(grid.offset_index(2, 1, (1, 1)), Some(11));

        assert_eq!(grid.offset_index(0, 0, (-1, 0)), None);
        assert_eq!(grid.offset_index(3, 0, (1, 0)), None);
        assert_eq!(grid.offset_index(0, 0, (0, -1)), None);
        assert_eq!(grid.offset_index(0, 2, (0, 1)), None);
    }

    #[test]
    fn test_offset_index_extreme_offsets() {
        let grid = Grid::new(4, 3).unwrap();

        assert_eq!(grid.offset_index(3, 2, (isize::MAX, 0)), None);
        assert_eq!(grid.offset_index(0, 0, (isize::MIN, 0)), None);
        assert_eq!(grid.offset_index(3, 2, (0, isize::MAX)), None);
        assert_eq!(grid.offset_index(0, 2, (1, isize::MIN)), None);
    }

    #[test]
    fn test_set_get() {
        let mut grid = Grid::new(6, 4).unwrap();

        grid.set(5, 3, true).unwrap();
        assert!(grid.get(5, 3).unwrap());
        assert!(!grid.get(3, 0).unwrap());

        grid.set(5, 3, false).unwrap();
        assert!(!grid.get(5, 3).unwrap());
    }

    #[test]
    fn test_set_get_out_of_bounds() {
        let mut grid = Grid::new(6, 4).unwrap();

        assert!(matches!(
            grid.get(6, 0),
            Err(AutomatonError::OutOfBounds { x: 6, y: 0, width: 6, height: 4 })
        ));
        assert!(matches!(
            grid.set(0, 4, true),
            Err(AutomatonError::OutOfBounds { .. })
        ));
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_empty_is_idempotent() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.fill(true);
        assert_eq!(grid.population(), 25);

        grid.empty();
        grid.empty();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_randomize_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(16, 16).unwrap();

        grid.randomize(0.0, &mut rng).unwrap();
        assert_eq!(grid.population(), 0);

        grid.randomize(1.0, &mut rng).unwrap();
        assert_eq!(grid.population(), 256);
    }

    #[test]
    fn test_randomize_clamps_density() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(8, 8).unwrap();

        grid.randomize(3.5, &mut rng).unwrap();
        assert_eq!(grid.population(), 64);

        grid.randomize(-0.2, &mut rng).unwrap();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_randomize_rejects_nan() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(8, 8).unwrap();
        grid.fill(true);

        assert!(matches!(
            grid.randomize(f64::NAN, &mut rng),
            Err(AutomatonError::InvalidProbability(_))
        ));
        // Untouched on failure
        assert_eq!(grid.population(), 64);
    }

    #[test]
    fn test_randomize_is_reproducible() {
        let mut a = Grid::new(32, 32).unwrap();
        let mut b = Grid::new(32, 32).unwrap();

        a.randomize(0.5, &mut StdRng::seed_from_u64(42)).unwrap();
        b.randomize(0.5, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(a, b);
        let population = a.population();
        assert!(population > 300 && population < 724, "population {population}");
    }

    #[test]
    fn test_count_neighbors() {
        let mut grid = Grid::new(8, 8).unwrap();
        let kernel = Kernel::moore();

        // Plus shape around (4, 4)
        for (x, y) in [(4, 4), (3, 4), (5, 4), (4, 3), (4, 5)] {
            grid.set(x, y, true).unwrap();
        }

        assert_eq!(grid.count_neighbors(&kernel, 4, 4), 4);
        assert_eq!(grid.count_neighbors(&kernel, 3, 4), 3);
        assert_eq!(grid.count_neighbors(&kernel, 3, 3), 3);
        assert_eq!(grid.count_neighbors(&kernel, 0, 0), 0);
    }

    #[test]
    fn test_parse_and_render_agree() {
        let grid = Grid::parse("#..\n.#.\n..#").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert!(grid.get(0, 0).unwrap());
        assert!(grid.get(1, 1).unwrap());
        assert!(grid.get(2, 2).unwrap());
        assert!(!grid.get(2, 0).unwrap());

        assert_eq!(grid.render(), vec!["█  ", " █ ", "  █"]);
        assert_eq!(grid.to_string(), "█  \n █ \n  █");
    }

    #[test]
    fn test_render_orientation_matches_coordinates() {
        let mut grid = Grid::new(4, 2).unwrap();
        grid.set(3, 0, true).unwrap();
        grid.set(0, 1, true).unwrap();

        let rows = grid.render();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "   █");
        assert_eq!(rows[1], "█   ");
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let grid = Grid::parse("O\n.OO").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.population(), 3);
        assert!(!grid.get(2, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_unknown_glyph() {
        assert!(matches!(
            Grid::parse("..\n.x"),
            Err(AutomatonError::InvalidGlyph { glyph: 'x', row: 1, column: 1 })
        ));
        assert!(matches!(
            Grid::parse(""),
            Err(AutomatonError::InvalidDimensions { .. })
        ));
    }
}
