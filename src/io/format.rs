use std::path::Path;

use crate::{Error, Result};

/// On-disk format of a table or snapshot, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
    Json,
}

impl FileFormat {
    /// Detect the format from the extension of `path` (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("parquet") | Some("pq") => Ok(FileFormat::Parquet),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(Error::Format(format!("unsupported file extension: {}", path.display()))),
        }
    }
}
