//! Reading and writing of tables, snapshots and region collections.
//!
//! # Format Modules
//!
//! - `csv` - CSV format for tabular data and snapshots
//! - `parquet` - Parquet format for tabular data and snapshots (requires `parquet` feature)
//! - `geojson` - GeoJSON FeatureCollections of polygon regions
//! - `shp` - ESRI shapefiles of polygon regions
//!
//! `table` maps named DataFrame columns onto weights and time series, and `snapshot`
//! persists intersection tables.

pub(crate) mod csv;
mod format;
mod geojson;
mod shp;
mod snapshot;
mod table;

#[cfg(feature = "parquet")]
pub(crate) mod parquet;

pub use csv::{read_csv_bytes, write_csv_bytes};
pub use format::FileFormat;
pub use geojson::{read_regions_geojson, read_regions_geojson_bytes};
pub use shp::read_regions_shapefile;
pub use table::{
    allocate_time_series_frame, read_table, series_to_frame, time_series_from_frame,
    weights_from_frame, write_table,
};
