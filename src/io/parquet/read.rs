//! Parquet reading operations.

use std::{fs::File, path::Path};

use polars::{frame::DataFrame, io::SerReader, prelude::ParquetReader};

use crate::{Error, Result};

/// Read a Parquet file into a DataFrame.
pub(crate) fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(Error::file(path))?;
    Ok(ParquetReader::new(file).finish()?)
}
