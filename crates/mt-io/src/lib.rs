//! mt-io: reading and writing material collections.
//!
//! Formats:
//! - JSON / YAML: full serde representation of a collection
//! - CSV table: one material, `Temperature` column first, one column per property
//! - CSV tree: indented material/property/parameter listing (read and write)
//! - Text: `Material Name = X` blocks of `Key = value [units]` lines (read only)

pub mod csv_table;
pub mod csv_tree;
pub mod files;
pub mod serde_formats;
pub mod text;

pub use files::{Format, export_file, import_directory, import_file, open};
pub use serde_formats::{load_json, load_yaml, save_json, save_yaml};

use std::path::PathBuf;

pub type IoResult<T> = Result<T, IoError>;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{source_name}:{line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Unsupported file extension: {}", path.display())]
    UnsupportedExtension { path: PathBuf },
}
