//! Error types for Wellspend

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Singular matrix: pivot in column {pivot_column} of {size}x{size} matrix is below threshold")]
    SingularMatrix { size: usize, pivot_column: usize },

    #[error("Matrix must be square, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// True for the ill-conditioned regression case, which callers treat as
    /// "no model available" rather than a hard failure
    pub fn is_singular(&self) -> bool {
        matches!(self, Error::SingularMatrix { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
