use std::path::Path;

use anyhow::{Context, Result};
use areal::{compute_intersections_with, io, Collection, ExtractOptions, RegionSet};
use tracing::info;

/// Load a region layer, choosing the reader by file extension.
fn read_regions(path: &Path, key_field: &str, collection: Collection) -> Result<RegionSet<String>> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    let regions = match extension.as_deref() {
        Some("shp") => io::read_regions_shapefile(path, key_field, collection),
        Some("geojson" | "json") => io::read_regions_geojson(path, key_field, collection),
        _ => anyhow::bail!("unsupported region file (expected .shp, .geojson or .json): {}", path.display()),
    };
    regions.with_context(|| format!("failed to load {collection} regions from {}", path.display()))
}

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::IntersectArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./intersections.csv".into());

    info!(path = %args.primary.display(), "[intersect] loading primary regions");
    let mut primary = read_regions(&args.primary, &args.primary_key, Collection::Primary)?;

    info!(path = %args.secondary.display(), "[intersect] loading secondary regions");
    let mut secondary = read_regions(&args.secondary, &args.secondary_key, Collection::Secondary)?;

    info!(primary = primary.len(), secondary = secondary.len(), "[intersect] computing overlaps");
    let options = ExtractOptions { min_area: args.min_area, snapshot: Some(out_path.clone()) };
    let table = compute_intersections_with(&mut primary, &mut secondary, &options)
        .with_context(|| format!("failed to intersect regions into {}", out_path.display()))?;

    info!(records = table.len(), path = %out_path.display(), "[intersect] wrote snapshot");
    Ok(())
}
