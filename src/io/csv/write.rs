//! CSV writing operations.

use std::{fs::File, io::BufWriter, path::Path};

use polars::{frame::DataFrame, io::SerWriter, prelude::CsvWriter};

use crate::{Error, Result};

/// Write a DataFrame to a CSV file.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(Error::file(path))?;
    CsvWriter::new(BufWriter::new(file)).finish(df)?;
    Ok(())
}

/// Write a DataFrame to CSV bytes.
pub fn write_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    CsvWriter::new(&mut out).finish(&mut df.clone())?;
    Ok(out)
}
