use std::path::PathBuf;

use geo::{Area, BooleanOps, BoundingRect};
use tracing::debug;

use crate::{geom::{RegionKey, RegionSet}, Result};
use super::{IntersectionRecord, IntersectionTable};

/// Tunables for `compute_intersections_with`.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Overlaps with area at or below this threshold are treated as disjoint.
    pub min_area: f64,
    /// If set, the resulting table is written to this path (format chosen by extension).
    pub snapshot: Option<PathBuf>,
}

/// Compute the intersection table between two region sets with default options.
///
/// Both sets are annotated with their region areas in place (see `RegionSet::annotate_areas`).
pub fn compute_intersections<K: RegionKey>(
    primary: &mut RegionSet<K>,
    secondary: &mut RegionSet<K>,
) -> Result<IntersectionTable<K>> {
    compute_intersections_with(primary, secondary, &ExtractOptions::default())
}

/// Compute the intersection table between two region sets.
///
/// Emits one record per (primary, secondary) pair whose overlap area exceeds
/// `options.min_area`. Fails with `DegenerateGeometry` if any region in either set
/// has no area, before any overlay work is done.
pub fn compute_intersections_with<K: RegionKey>(
    primary: &mut RegionSet<K>,
    secondary: &mut RegionSet<K>,
    options: &ExtractOptions,
) -> Result<IntersectionTable<K>> {
    primary.annotate_areas();
    secondary.annotate_areas();
    primary.ensure_non_degenerate()?;
    secondary.ensure_non_degenerate()?;

    let mut records = Vec::new();
    let mut tested = 0usize;

    for p in primary.regions() {
        let Some(rect) = p.shape.bounding_rect() else { continue };
        let p_area = p.measured_area();

        // R-tree order is arbitrary; sort to keep records in secondary insertion order.
        let mut candidates: Vec<usize> = secondary.candidates(rect).collect();
        candidates.sort_unstable();

        for j in candidates {
            let s = &secondary.regions()[j];
            tested += 1;

            let area = p.shape.intersection(&s.shape).unsigned_area();
            if !(area > options.min_area) { continue; }

            records.push(IntersectionRecord {
                primary_id: p.id.clone(),
                secondary_id: s.id.clone(),
                primary_fraction: (area / p_area).min(1.0),
                secondary_fraction: (area / s.measured_area()).min(1.0),
            });
        }
    }

    debug!(
        primary = primary.len(),
        secondary = secondary.len(),
        tested,
        records = records.len(),
        "computed intersections"
    );

    let table = IntersectionTable::new(records);
    if let Some(path) = &options.snapshot {
        table.write_snapshot(path)?;
    }
    Ok(table)
}
