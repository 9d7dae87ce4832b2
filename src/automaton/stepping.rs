//! The automaton engine: neighbor counting and synchronous stepping.
//!
//! Core invariant: every rule evaluation within a tick sees neighbor counts
//! taken from the generation-N grid. The sequential path counts the whole
//! grid before writing anything; the parallel path reads an immutable
//! generation-N snapshot and writes generation N+1 into a separate buffer
//! that is swapped in once every row is done.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use super::grid::Grid;
use super::kernel::Kernel;
use crate::error::Result;
use crate::rules::{GameOfLife, Labyrinth, Minotaur, Rule};

/// Engine configuration.
///
/// `AutomatonConfig::default()` gives the Moore kernel, sequential stepping
/// and an entropy-seeded random source.
#[derive(Clone, Debug, Default)]
pub struct AutomatonConfig {
    /// Neighborhood used for counting.
    pub kernel: Kernel,
    /// Worker threads for stepping. `None`, 0 or 1 means sequential.
    pub threads: Option<usize>,
    /// Seed for the random source used by `randomize` and `seed`.
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl AutomatonConfig {
    /// Use `kernel` for neighbor counting.
    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Step on a pool of `n` threads when `n > 1`.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Seed the random source for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Live-neighbor count for every cell, row-major like [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborCounts {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl NeighborCounts {
    /// Columns in the counted grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows in the counted grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Count at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.counts[y * self.width + x])
        } else {
            None
        }
    }

    /// Row-major counts.
    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }
}

/// A binary cellular automaton: one grid, one kernel, one rule.
pub struct Automaton<R: Rule> {
    grid: Grid,
    /// Generation N+1 buffer for the parallel path.
    next: Vec<bool>,
    /// Scratch counts for the sequential path.
    counts: Vec<u32>,
    kernel: Kernel,
    rule: R,
    rng: StdRng,
    generation: u64,
    pool: Option<rayon::ThreadPool>,
}

impl<R: Rule> Automaton<R> {
    /// Create an all-low automaton with the default configuration.
    pub fn new(width: usize, height: usize, rule: R) -> Result<Self> {
        Self::with_config(width, height, rule, AutomatonConfig::default())
    }

    /// Create an all-low automaton; builds the thread pool if one is requested.
    pub fn with_config(
        width: usize,
        height: usize,
        rule: R,
        config: AutomatonConfig,
    ) -> Result<Self> {
        let grid = Grid::new(width, height)?;

        let pool = match config.threads {
            Some(n) if n > 1 => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            _ => None,
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::debug!(
            "created {}x{} automaton: {} kernel offsets, {} stepping thread(s)",
            width,
            height,
            config.kernel.len(),
            pool.as_ref().map_or(1, |p| p.current_num_threads())
        );

        let size = grid.cells().len();
        Ok(Automaton {
            grid,
            next: vec![false; size],
            counts: vec![0; size],
            kernel: config.kernel,
            rule,
            rng,
            generation: 0,
            pool,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// The current generation.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Neighborhood used for counting.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// The rule applied on each tick.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Replace the rule. Takes effect on the next tick.
    pub fn set_rule(&mut self, rule: R) {
        self.rule = rule;
    }

    /// Number of ticks applied since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of high cells.
    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// State of the cell at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        self.grid.get(x, y)
    }

    /// Set the cell at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        self.grid.set(x, y, value)
    }

    /// Set every cell low.
    pub fn empty(&mut self) {
        self.grid.empty();
    }

    /// Set each cell high with probability `density` (clamped to `[0, 1]`).
    pub fn randomize(&mut self, density: f64) -> Result<()> {
        self.grid.randomize(density, &mut self.rng)
    }

    /// Overwrite the centered region with `pattern`.
    pub fn stamp(&mut self, pattern: &Grid) -> Result<()> {
        self.grid.stamp(pattern)
    }

    /// Stamp a random `size` x `size` pattern of the given density at the
    /// center of the grid.
    pub fn seed(&mut self, size: usize, density: f64) -> Result<()> {
        let mut pattern = Grid::new(size, size)?;
        pattern.randomize(density, &mut self.rng)?;
        self.grid.stamp(&pattern)
    }

    /// Rows of glyphs, top to bottom.
    pub fn render(&self) -> Vec<String> {
        self.grid.render()
    }

    /// Live-neighbor count of every cell in the current generation.
    ///
    /// Positions outside the grid count as low; nothing wraps.
    pub fn count_neighbors(&self) -> NeighborCounts {
        let mut counts = vec![0; self.grid.cells().len()];
        fill_counts(&self.grid, &self.kernel, &mut counts);

        NeighborCounts {
            width: self.grid.width(),
            height: self.grid.height(),
            counts,
        }
    }

    /// Advance one generation.
    pub fn tick(&mut self) {
        match &self.pool {
            Some(pool) => {
                let width = self.grid.width();
                let grid = &self.grid;
                let kernel = &self.kernel;
                let rule = &self.rule;
                let next = &mut self.next;

                pool.install(|| {
                    next.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
                        for (x, cell) in row.iter_mut().enumerate() {
                            let current = grid.cells()[grid.index_of(x, y)];
                            let neighbors = grid.count_neighbors(kernel, x, y);
                            *cell = rule.evaluate(current, neighbors).unwrap_or(current);
                        }
                    });
                });

                self.grid.swap_cells(&mut self.next);
            }
            None => {
                fill_counts(&self.grid, &self.kernel, &mut self.counts);

                for (cell, &neighbors) in self.grid.cells_mut().iter_mut().zip(&self.counts) {
                    if let Some(state) = self.rule.evaluate(*cell, neighbors) {
                        *cell = state;
                    }
                }
            }
        }

        self.generation += 1;
        log::trace!("advanced to generation {}", self.generation);
    }

    /// Advance `n` generations.
    pub fn steps(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }
}

impl Automaton<GameOfLife> {
    /// Conway's Game of Life on a `width` x `height` grid.
    pub fn game_of_life(width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, GameOfLife)
    }
}

impl Automaton<Labyrinth> {
    /// Labyrinth (B3/S12345) on a `width` x `height` grid.
    pub fn labyrinth(width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, Labyrinth)
    }
}

impl Automaton<Minotaur> {
    /// Labyrinth generator; bootstrap it with [`Automaton::seed`].
    pub fn minotaur(width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, Minotaur)
    }
}

fn fill_counts(grid: &Grid, kernel: &Kernel, counts: &mut [u32]) {
    let width = grid.width();
    for (idx, count) in counts.iter_mut().enumerate() {
        *count = grid.count_neighbors(kernel, idx % width, idx / width);
    }
}
