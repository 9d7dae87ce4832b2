//! Core automaton logic and grid operations.
//!
//! `grid` and `region` own cell storage and the coordinate conventions,
//! `kernel` defines neighborhoods, and `stepping` drives generations.

pub mod grid;
pub mod kernel;
pub mod region;
pub mod stepping;

pub use grid::{Grid, HIGH_GLYPH, LOW_GLYPH};
pub use kernel::Kernel;
pub use stepping::{Automaton, AutomatonConfig, NeighborCounts};
