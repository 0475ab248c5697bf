use anyhow::{Context, Result};
use areal::{build_matrix, io, Axis, FractionField, IntersectionTable};
use tracing::info;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::MatrixArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./matrix.csv".into());
    let field: FractionField = args.field.parse()?;
    let normalize = args.normalize.as_deref().map(str::parse::<Axis>).transpose()?;

    info!(path = %args.snapshot.display(), "[matrix] reading snapshot");
    let table = IntersectionTable::read_snapshot(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;

    let matrix = build_matrix(&table, field, normalize);
    let (rows, cols) = matrix.shape();
    info!(rows, cols, %field, "[matrix] built allocation matrix");

    let mut df = matrix.to_dataframe(&args.id_column)?;
    io::write_table(&out_path, &mut df)
        .with_context(|| format!("failed to write matrix to {}", out_path.display()))?;

    info!(path = %out_path.display(), "[matrix] wrote matrix");
    Ok(())
}
