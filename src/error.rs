//! Error type shared by the grid, kernel, rule and engine layers.

use thiserror::Error;

/// Errors raised by grid construction, cell access and engine setup.
///
/// Every variant is a synchronous, caller-recoverable failure. Stepping an
/// already-constructed automaton never produces one.
#[derive(Debug, Error)]
pub enum AutomatonError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("density {0} is not a probability")]
    InvalidProbability(f64),
    #[error("invalid neighborhood kernel: {0}")]
    InvalidKernel(String),
    #[error("invalid rulestring: {0:?}")]
    InvalidRule(String),
    #[error("unexpected glyph {glyph:?} at row {row}, column {column}")]
    InvalidGlyph {
        glyph: char,
        row: usize,
        column: usize,
    },
    #[error("failed to build stepping thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, AutomatonError>;
