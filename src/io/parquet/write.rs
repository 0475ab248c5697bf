//! Parquet writing operations.

use std::{fs::File, path::Path};

use polars::{frame::DataFrame, prelude::ParquetWriter};

use crate::{Error, Result};

/// Write a DataFrame to a Parquet file.
pub(crate) fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(Error::file(path))?;
    ParquetWriter::new(file).finish(df)?;
    Ok(())
}
