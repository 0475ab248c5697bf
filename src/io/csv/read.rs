//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};

use crate::{Error, Result};

/// Reads a CSV file with a header row from `path` into a Polars DataFrame.
/// Every column is read as a string so that identifiers keep their leading zeros;
/// numeric columns are cast where they are consumed.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(Error::file(path))?;
    Ok(CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()?)
}

/// Reads CSV bytes with a header row, every column as a string.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    Ok(CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?)
}
