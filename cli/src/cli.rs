use std::path::PathBuf;

/// Area-weighted allocation CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "areal", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Intersect two polygon layers and write the intersection snapshot
    Intersect(IntersectArgs),

    /// Build an allocation matrix from a snapshot and export it as a table
    Matrix(MatrixArgs),

    /// Allocate a time series to a subset of primary regions
    Allocate(AllocateArgs),
}

#[derive(clap::Args, Debug)]
pub struct IntersectArgs {
    /// Primary regions (.geojson/.json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub primary: PathBuf,

    /// Secondary regions (.geojson/.json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub secondary: PathBuf,

    /// Identifier field of the primary regions
    #[arg(long, default_value = "FIPS")]
    pub primary_key: String,

    /// Identifier field of the secondary regions
    #[arg(long, default_value = "ID")]
    pub secondary_key: String,

    /// Overlaps with area at or below this value are ignored
    #[arg(long, default_value_t = 0.0)]
    pub min_area: f64,

    /// Output snapshot (.csv, .parquet or .json), defaults to "./intersections.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct MatrixArgs {
    /// Intersection snapshot written by `intersect`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub snapshot: PathBuf,

    /// Fraction column used as matrix values
    #[arg(long, default_value = "primary_fraction")]
    pub field: String,

    /// Normalize along this axis (primary or secondary)
    #[arg(long)]
    pub normalize: Option<String>,

    /// Name of the primary id column in the output
    #[arg(long, default_value = "primary_id")]
    pub id_column: String,

    /// Output table (.csv or .parquet), defaults to "./matrix.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct AllocateArgs {
    /// Intersection snapshot written by `intersect`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub snapshot: PathBuf,

    /// Primary-region weights table (e.g. population by tract)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub weights: PathBuf,

    /// Identifier column of the weights table
    #[arg(long, default_value = "FIPS")]
    pub weight_id: String,

    /// Value column of the weights table
    #[arg(long, default_value = "POPULATION")]
    pub weight_value: String,

    /// Long-format time series table of secondary-region values
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub series: PathBuf,

    /// Timestamp column of the series table
    #[arg(long, default_value = "local_time")]
    pub time_field: String,

    /// Secondary identifier column of the series table
    #[arg(long, default_value = "eia_code")]
    pub series_id: String,

    /// Value column of the series table
    #[arg(long, default_value = "demand_mwh")]
    pub series_value: String,

    /// Primary region ids to allocate to (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub subset: Vec<String>,

    /// Output table (.csv or .parquet), defaults to "./allocation.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
