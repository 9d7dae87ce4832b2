//! Neighborhood kernels: the relative offsets that define "neighbor".

use crate::error::{AutomatonError, Result};

/// A fixed set of `(dx, dy)` offsets, never containing `(0, 0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kernel {
    offsets: Vec<(isize, isize)>,
}

impl Kernel {
    /// Build a kernel from explicit offsets. Duplicates are dropped.
    pub fn new(offsets: impl IntoIterator<Item = (isize, isize)>) -> Result<Self> {
        let mut unique: Vec<(isize, isize)> = Vec::new();
        for offset in offsets {
            if offset == (0, 0) {
                return Err(AutomatonError::InvalidKernel(
                    "offset (0, 0) would count the cell itself".to_string(),
                ));
            }
            if !unique.contains(&offset) {
                unique.push(offset);
            }
        }

        if unique.is_empty() {
            return Err(AutomatonError::InvalidKernel(
                "kernel has no offsets".to_string(),
            ));
        }

        Ok(Kernel { offsets: unique })
    }

    /// Moore neighborhood: the 3x3 square minus its center (8 neighbors).
    pub fn moore() -> Self {
        let mut offsets = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                // Skip the center cell
                if dx == 0 && dy == 0 {
                    continue;
                }
                offsets.push((dx, dy));
            }
        }
        Kernel { offsets }
    }

    /// Von Neumann neighborhood: the 4 orthogonal neighbors.
    pub fn von_neumann() -> Self {
        Kernel {
            offsets: vec![(0, -1), (-1, 0), (1, 0), (0, 1)],
        }
    }

    /// Build a kernel from a boolean mask centered on the cell.
    ///
    /// The mask must be rectangular with odd width and height, and its
    /// center entry must be false. Row `r`, column `c` maps to the offset
    /// `(c - cols / 2, r - rows / 2)`.
    pub fn from_mask<R: AsRef<[bool]>>(mask: &[R]) -> Result<Self> {
        let rows = mask.len();
        let cols = mask.first().map(|row| row.as_ref().len()).unwrap_or(0);

        if rows % 2 == 0 || cols % 2 == 0 {
            return Err(AutomatonError::InvalidKernel(format!(
                "mask must have odd dimensions, got {cols}x{rows}"
            )));
        }
        if mask.iter().any(|row| row.as_ref().len() != cols) {
            return Err(AutomatonError::InvalidKernel(
                "mask rows have different lengths".to_string(),
            ));
        }

        let (cx, cy) = ((cols / 2) as isize, (rows / 2) as isize);
        let offsets = mask.iter().enumerate().flat_map(|(r, row)| {
            row.as_ref()
                .iter()
                .enumerate()
                .filter(|&(_, &on)| on)
                .map(move |(c, _)| (c as isize - cx, r as isize - cy))
        });

        Kernel::new(offsets.collect::<Vec<_>>())
    }

    /// The `(dx, dy)` offsets, in insertion order.
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// Number of offsets, the largest possible neighbor count.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false; construction rejects empty kernels.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::moore()
    }
}
