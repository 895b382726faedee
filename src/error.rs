use thiserror::Error;

/// Result type returned by fallible grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Error returned by the grid engine. A rejected call never modifies the grid.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum GridError {
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimension { rows: usize, cols: usize },
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}
