// error.rs - Error types for the Game of Life core

/// Errors raised by board access, engine mutation and scheduler control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// The grid was asked for zero rows or zero columns. Fatal: no board exists.
    #[error("invalid grid dimensions {rows}x{cols}: both must be positive")]
    InvalidDimension { rows: usize, cols: usize },

    /// A coordinate fell outside `[0, cols) x [0, rows)`.
    #[error("cell ({x}, {y}) is outside the {cols}x{rows} grid")]
    OutOfBounds { x: usize, y: usize, cols: usize, rows: usize },

    /// The interval was zero or negative. The previous interval is kept.
    #[error("interval must be a positive number of milliseconds, got {0}")]
    InvalidInterval(i64),
}

pub type Result<T> = std::result::Result<T, SimError>;
