use anyhow::{Context, Result};
use areal::{allocation_fraction, build_matrix, io, scale_matrix, Axis, FractionField, IntersectionTable};
use tracing::{info, warn};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::AllocateArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./allocation.csv".into());

    info!(path = %args.snapshot.display(), "[allocate] reading snapshot");
    let table = IntersectionTable::read_snapshot(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;

    // Share of each primary region falling in each secondary region, rows summing to one.
    let matrix = build_matrix(&table, FractionField::Primary, Some(Axis::Primary));

    info!(path = %args.weights.display(), "[allocate] reading weights");
    let weights_df = io::read_table(&args.weights)
        .with_context(|| format!("failed to read weights {}", args.weights.display()))?;
    let weights = io::weights_from_frame(&weights_df, &args.weight_id, &args.weight_value)?;

    let missing = matrix.missing_weights(&weights, Axis::Primary);
    if !missing.is_empty() {
        warn!(missing = missing.len(), first = %missing[0], "[allocate] primary regions without weight count as zero");
    }
    let scaled = scale_matrix(matrix, &weights, Axis::Primary, false)?;

    let ratios = allocation_fraction(&scaled, &args.subset);
    info!(subset = args.subset.len(), columns = ratios.len(), "[allocate] computed allocation ratios");

    info!(path = %args.series.display(), "[allocate] reading series");
    let series_df = io::read_table(&args.series)
        .with_context(|| format!("failed to read series {}", args.series.display()))?;
    let allocated = io::allocate_time_series_frame(
        &ratios,
        &series_df,
        &args.time_field,
        &args.series_id,
        &args.series_value,
    )?;

    let mut df = io::series_to_frame(&allocated, &args.time_field, &args.series_value)?;
    io::write_table(&out_path, &mut df)
        .with_context(|| format!("failed to write allocation to {}", out_path.display()))?;

    info!(timestamps = allocated.len(), path = %out_path.display(), "[allocate] wrote allocation");
    Ok(())
}
