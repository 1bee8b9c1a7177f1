// Data adapter exports
pub mod csv;
pub mod xlsx;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or writing tabular data
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        source: ::csv::Error,
    },

    #[error("Failed to open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        source: calamine::XlsxError,
    },

    #[error("Missing required column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("No readable sheet in {}", path.display())]
    EmptySheet { path: PathBuf },

    #[error("Invalid JSON at {}:{line}: {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

pub use self::csv::{load_buyers, load_sellers, write_match_csv};
pub use xlsx::load_product_meta;
