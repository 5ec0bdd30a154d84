//! Error types for the product catalog writer.

use thiserror::Error;

/// Errors that can occur while writing the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
