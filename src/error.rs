use std::{fmt, path::PathBuf};

use polars::error::PolarsError;

use crate::geom::Collection;

/// Errors raised by the allocation pipeline and its table/geometry loaders.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A region has zero (or non-finite) area, so its intersection fractions are undefined.
    #[error("degenerate geometry in {collection} collection: region {id} has no area")]
    DegenerateGeometry { collection: Collection, id: String },

    /// A caller-named field does not exist in the supplied table.
    #[error("field '{field}' not found (available: {})", available.join(", "))]
    KeyMismatch { field: String, available: Vec<String> },

    #[error("duplicate region id {id} in {collection} collection")]
    DuplicateId { collection: Collection, id: String },

    #[error("duplicate series entry for timestamp {timestamp} and id {id}")]
    DuplicateEntry { timestamp: String, id: String },

    #[error("invalid weight {value} for region {id}")]
    InvalidWeight { id: String, value: f64 },

    #[error("{0}")]
    Format(String),

    #[error("failed to access {}", path.display())]
    File { path: PathBuf, #[source] source: std::io::Error },

    #[error(transparent)]
    Table(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Shapefile(#[from] shapefile::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn key_mismatch<S: fmt::Display>(field: &str, available: impl IntoIterator<Item = S>) -> Self {
        Error::KeyMismatch {
            field: field.to_string(),
            available: available.into_iter().map(|s| s.to_string()).collect(),
        }
    }

    pub(crate) fn file(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Error::File { path: path.to_path_buf(), source }
    }
}
