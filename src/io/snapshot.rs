use std::{fs::File, io::{BufReader, BufWriter}, path::Path};

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::{
    geom::RegionKey,
    intersect::{FractionField, IntersectionRecord, IntersectionTable},
    matrix::AllocationMatrix,
    Error, Result,
};
use super::{csv, table::{float_values, string_values}, FileFormat};

#[cfg(feature = "parquet")]
use super::parquet;

const PRIMARY_ID: &str = "primary_id";
const SECONDARY_ID: &str = "secondary_id";

impl<K: RegionKey> IntersectionTable<K> {
    /// Convert to a four-column DataFrame (ids as strings).
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let primary_ids: Vec<String> = self.iter().map(|r| r.primary_id.to_string()).collect();
        let secondary_ids: Vec<String> = self.iter().map(|r| r.secondary_id.to_string()).collect();
        let primary_fractions: Vec<f64> = self.iter().map(|r| r.primary_fraction).collect();
        let secondary_fractions: Vec<f64> = self.iter().map(|r| r.secondary_fraction).collect();

        Ok(DataFrame::new(vec![
            Series::new(PRIMARY_ID.into(), primary_ids).into(),
            Series::new(SECONDARY_ID.into(), secondary_ids).into(),
            Series::new(FractionField::Primary.column_name().into(), primary_fractions).into(),
            Series::new(FractionField::Secondary.column_name().into(), secondary_fractions).into(),
        ])?)
    }

    /// Persist the table to `path` as CSV, Parquet or JSON (by extension).
    /// The format is a cache artifact tied to this crate version, not an interchange format.
    pub fn write_snapshot(&self, path: &Path) -> Result<()> {
        match FileFormat::from_path(path)? {
            FileFormat::Csv => csv::write_csv(&mut self.to_dataframe()?, path)?,
            #[cfg(feature = "parquet")]
            FileFormat::Parquet => parquet::write_parquet(&mut self.to_dataframe()?, path)?,
            FileFormat::Json => {
                let file = File::create(path).map_err(Error::file(path))?;
                serde_json::to_writer(BufWriter::new(file), &self.to_string_keys())?;
            }
            #[cfg(not(feature = "parquet"))]
            FileFormat::Parquet => return Err(Error::Format("parquet support is not enabled".into())),
        }
        debug!(path = %path.display(), records = self.len(), "wrote intersection snapshot");
        Ok(())
    }

    fn to_string_keys(&self) -> IntersectionTable<String> {
        self.iter()
            .map(|r| IntersectionRecord {
                primary_id: r.primary_id.to_string(),
                secondary_id: r.secondary_id.to_string(),
                primary_fraction: r.primary_fraction,
                secondary_fraction: r.secondary_fraction,
            })
            .collect()
    }
}

impl IntersectionTable<String> {
    /// Read a table from a DataFrame with the columns written by `to_dataframe`.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let primary_ids = string_values(df, PRIMARY_ID)?;
        let secondary_ids = string_values(df, SECONDARY_ID)?;
        let primary_fractions = float_values(df, FractionField::Primary.column_name())?;
        let secondary_fractions = float_values(df, FractionField::Secondary.column_name())?;

        Ok(primary_ids.into_iter()
            .zip(secondary_ids)
            .zip(primary_fractions.into_iter().zip(secondary_fractions))
            .map(|((primary_id, secondary_id), (primary_fraction, secondary_fraction))| IntersectionRecord {
                primary_id,
                secondary_id,
                primary_fraction,
                secondary_fraction,
            })
            .collect())
    }

    /// Load a table written by `write_snapshot`.
    pub fn read_snapshot(path: &Path) -> Result<Self> {
        let table = match FileFormat::from_path(path)? {
            FileFormat::Csv => Self::from_dataframe(&csv::read_csv(path)?)?,
            #[cfg(feature = "parquet")]
            FileFormat::Parquet => Self::from_dataframe(&parquet::read_parquet(path)?)?,
            FileFormat::Json => {
                let file = File::open(path).map_err(Error::file(path))?;
                serde_json::from_reader(BufReader::new(file))?
            }
            #[cfg(not(feature = "parquet"))]
            FileFormat::Parquet => return Err(Error::Format("parquet support is not enabled".into())),
        };
        debug!(path = %path.display(), records = table.len(), "read intersection snapshot");
        Ok(table)
    }
}

impl<K: RegionKey> AllocationMatrix<K> {
    /// Wide DataFrame: an `id_column` of primary ids followed by one column per secondary id.
    pub fn to_dataframe(&self, id_column: &str) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.secondary_ids().len() + 1);
        let ids: Vec<String> = self.primary_ids().iter().map(|id| id.to_string()).collect();
        columns.push(Series::new(id_column.into(), ids).into());

        for (j, id) in self.secondary_ids().iter().enumerate() {
            let values: Vec<f64> = self.values().column(j).to_vec();
            columns.push(Series::new(id.to_string().into(), values).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::matrix::{build_matrix, Axis};
    use super::*;

    fn table() -> IntersectionTable<String> {
        IntersectionTable::new(vec![
            IntersectionRecord { primary_id: "06001400100".into(), secondary_id: "PA1".into(), primary_fraction: 0.75, secondary_fraction: 0.1 },
            IntersectionRecord { primary_id: "06001400100".into(), secondary_id: "PA2".into(), primary_fraction: 0.25, secondary_fraction: 0.05 },
            IntersectionRecord { primary_id: "06001400200".into(), secondary_id: "PA2".into(), primary_fraction: 1.0, secondary_fraction: 0.4 },
        ])
    }

    #[test]
    fn dataframe_round_trip() {
        let df = table().to_dataframe().unwrap();
        assert_eq!(df.shape(), (3, 4));
        assert_eq!(IntersectionTable::from_dataframe(&df).unwrap(), table());
    }

    #[test]
    fn csv_bytes_keep_ids_as_strings() {
        let bytes = csv::write_csv_bytes(&table().to_dataframe().unwrap()).unwrap();
        let df = csv::read_csv_bytes(&bytes).unwrap();
        let restored = IntersectionTable::from_dataframe(&df).unwrap();
        assert_eq!(restored.records()[0].primary_id, "06001400100");
        assert_eq!(restored, table());
    }

    #[test]
    fn snapshot_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["ratios.csv", "ratios.json"] {
            let path = dir.path().join(name);
            table().write_snapshot(&path).unwrap();
            assert_eq!(IntersectionTable::read_snapshot(&path).unwrap(), table());
        }
    }

    #[test]
    fn snapshot_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratios.pkl");
        assert!(matches!(table().write_snapshot(&path), Err(Error::Format(_))));
    }

    #[test]
    fn from_dataframe_requires_columns() {
        let df = DataFrame::new(vec![Series::new("FIPS".into(), vec!["1"]).into()]).unwrap();
        assert!(matches!(IntersectionTable::from_dataframe(&df), Err(Error::KeyMismatch { .. })));
    }

    #[test]
    fn matrix_exports_wide_frame() {
        let m = build_matrix(&table(), FractionField::Primary, Some(Axis::Primary));
        let df = m.to_dataframe("FIPS").unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(string_values(&df, "FIPS").unwrap(), vec!["06001400100", "06001400200"]);
        assert_eq!(float_values(&df, "PA1").unwrap(), vec![0.75, 0.0]);
        assert_eq!(float_values(&df, "PA2").unwrap(), vec![0.25, 1.0]);
    }
}
