use std::{collections::BTreeMap, fmt, path::Path};

use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series};

use crate::{
    allocate::{allocate_time_series, TimeSeries},
    matrix::WeightVector,
    Error, Result,
};
use super::{csv, FileFormat};

#[cfg(feature = "parquet")]
use super::parquet;

/// Read a CSV or Parquet table, chosen by file extension.
/// CSV columns are all read as strings; see `read_csv`.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => csv::read_csv(path),
        #[cfg(feature = "parquet")]
        FileFormat::Parquet => parquet::read_parquet(path),
        format => Err(Error::Format(format!("cannot read a table as {format:?}: {}", path.display()))),
    }
}

/// Write a CSV or Parquet table, chosen by file extension.
pub fn write_table(path: &Path, df: &mut DataFrame) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => csv::write_csv(df, path),
        #[cfg(feature = "parquet")]
        FileFormat::Parquet => parquet::write_parquet(df, path),
        format => Err(Error::Format(format!("cannot write a table as {format:?}: {}", path.display()))),
    }
}

/// Get a column by name, or `KeyMismatch` listing the available columns.
pub(crate) fn column<'a>(df: &'a DataFrame, field: &str) -> Result<&'a Column> {
    df.column(field).map_err(|_| Error::key_mismatch(field, df.get_column_names()))
}

fn missing_value(field: &str, row: usize) -> Error {
    Error::Format(format!("missing or non-numeric value in field '{field}' at row {row}"))
}

/// Values of `field` as strings (numeric columns are formatted).
pub(crate) fn string_values(df: &DataFrame, field: &str) -> Result<Vec<String>> {
    let col = column(df, field)?.cast(&DataType::String)?;
    col.str()?.into_iter()
        .enumerate()
        .map(|(row, value)| value.map(str::to_string).ok_or_else(|| missing_value(field, row)))
        .collect()
}

/// Values of `field` as floats; string columns are parsed.
pub(crate) fn float_values(df: &DataFrame, field: &str) -> Result<Vec<f64>> {
    let col = column(df, field)?.cast(&DataType::Float64)?;
    col.f64()?.into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| missing_value(field, row)))
        .collect()
}

/// Build a weight vector from the `id_field` and `value_field` columns of `df`.
pub fn weights_from_frame(df: &DataFrame, id_field: &str, value_field: &str) -> Result<WeightVector<String>> {
    let ids = string_values(df, id_field)?;
    let values = float_values(df, value_field)?;

    let mut weights = WeightVector::new();
    for (id, value) in ids.into_iter().zip(values) {
        if weights.contains_key(&id) {
            return Err(Error::Format(format!("duplicate weight for id {id} in field '{id_field}'")));
        }
        weights.insert(id, value);
    }
    Ok(weights)
}

/// Build a long-format time series from three named columns of `df`.
/// Timestamps are kept as strings, so they order lexicographically (ISO 8601 sorts correctly).
pub fn time_series_from_frame(
    df: &DataFrame,
    time_field: &str,
    id_field: &str,
    value_field: &str,
) -> Result<TimeSeries<String, String>> {
    let timestamps = string_values(df, time_field)?;
    let ids = string_values(df, id_field)?;
    let values = float_values(df, value_field)?;

    Ok(timestamps.into_iter()
        .zip(ids)
        .zip(values)
        .map(|((timestamp, id), value)| (timestamp, id, value))
        .collect())
}

/// Convert an aggregated series into a two-column DataFrame.
pub fn series_to_frame<T: fmt::Display>(
    series: &BTreeMap<T, f64>,
    time_field: &str,
    value_field: &str,
) -> Result<DataFrame> {
    let (timestamps, values) = series.iter()
        .map(|(timestamp, value)| (timestamp.to_string(), *value))
        .unzip::<_, _, Vec<_>, Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new(time_field.into(), timestamps).into(),
        Series::new(value_field.into(), values).into(),
    ])?)
}

/// `allocate_time_series` over a table with named time, id and value columns.
pub fn allocate_time_series_frame(
    ratios: &BTreeMap<String, f64>,
    df: &DataFrame,
    time_field: &str,
    id_field: &str,
    value_field: &str,
) -> Result<BTreeMap<String, f64>> {
    let series = time_series_from_frame(df, time_field, id_field, value_field)?;
    allocate_time_series(ratios, &series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    fn demand_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("local_time".into(), vec!["2020-01-01T00", "2020-01-01T00", "2020-01-01T01", "2020-01-01T01"]).into(),
            Series::new("eia_code".into(), vec!["A", "B", "A", "B"]).into(),
            Series::new("demand_mwh".into(), vec![10.0, 20.0, 5.0, 5.0]).into(),
        ]).unwrap()
    }

    #[test]
    fn allocates_named_columns() {
        let ratios = BTreeMap::from([("A".to_string(), 0.5), ("B".to_string(), 0.5)]);
        let result = allocate_time_series_frame(&ratios, &demand_frame(), "local_time", "eia_code", "demand_mwh").unwrap();
        assert!(approx(result["2020-01-01T00"], 15.0));
        assert!(approx(result["2020-01-01T01"], 5.0));
    }

    #[test]
    fn missing_field_is_key_mismatch() {
        let ratios = BTreeMap::from([("A".to_string(), 1.0)]);
        match allocate_time_series_frame(&ratios, &demand_frame(), "local_time", "utility", "demand_mwh") {
            Err(Error::KeyMismatch { field, available }) => {
                assert_eq!(field, "utility");
                assert_eq!(available, vec!["local_time", "eia_code", "demand_mwh"]);
            }
            other => panic!("expected KeyMismatch, got {other:?}"),
        }
    }

    #[test]
    fn numeric_ids_become_strings() {
        let df = DataFrame::new(vec![
            Series::new("FIPS".into(), vec![6001i64, 6003]).into(),
            Series::new("POPULATION".into(), vec!["1200", "300.5"]).into(),
        ]).unwrap();
        let weights = weights_from_frame(&df, "FIPS", "POPULATION").unwrap();
        assert_eq!(weights["6001"], 1200.0);
        assert_eq!(weights["6003"], 300.5);
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let df = DataFrame::new(vec![
            Series::new("FIPS".into(), vec!["01001"]).into(),
            Series::new("POPULATION".into(), vec!["n/a"]).into(),
        ]).unwrap();
        assert!(matches!(weights_from_frame(&df, "FIPS", "POPULATION"), Err(Error::Format(_))));
    }

    #[test]
    fn duplicate_weight_is_rejected() {
        let df = DataFrame::new(vec![
            Series::new("FIPS".into(), vec!["01001", "01001"]).into(),
            Series::new("POPULATION".into(), vec![1.0, 2.0]).into(),
        ]).unwrap();
        assert!(weights_from_frame(&df, "FIPS", "POPULATION").is_err());
    }

    #[test]
    fn csv_keeps_leading_zeros() {
        let df = csv::read_csv_bytes(b"FIPS,POPULATION\n01001,55\n01003,200\n").unwrap();
        let weights = weights_from_frame(&df, "FIPS", "POPULATION").unwrap();
        assert_eq!(weights.keys().collect::<Vec<_>>(), vec!["01001", "01003"]);
    }

    #[test]
    fn series_frame_has_one_row_per_timestamp() {
        let series = BTreeMap::from([("t1", 15.0), ("t2", 5.0)]);
        let df = series_to_frame(&series, "local_time", "demand_mwh").unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(string_values(&df, "local_time").unwrap(), vec!["t1", "t2"]);
        assert_eq!(float_values(&df, "demand_mwh").unwrap(), vec![15.0, 5.0]);
    }

    #[test]
    fn table_round_trip_through_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demand.csv");
        write_table(&path, &mut demand_frame()).unwrap();

        let df = read_table(&path).unwrap();
        let series = time_series_from_frame(&df, "local_time", "eia_code", "demand_mwh").unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.observations()[1].id, "B");
        assert_eq!(series.observations()[1].value, 20.0);
    }
}
