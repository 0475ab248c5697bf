use std::path::Path;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::{dbase::{FieldValue, Record}, Reader, Shape};
use tracing::warn;

use crate::{geom::{Collection, RegionSet}, Error, Result};

/// Load a region collection from an ESRI shapefile, taking ids from the `key_field`
/// dBase attribute. Non-polygon shapes are skipped with a warning.
pub fn read_regions_shapefile(path: &Path, key_field: &str, collection: Collection) -> Result<RegionSet<String>> {
    let mut reader = Reader::from_path(path)?;

    let mut shapes = Vec::with_capacity(reader.shape_count()?);
    for (idx, item) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = item?;
        let id = record_id(&record, key_field)?;

        match shape {
            Shape::Polygon(polygon) => shapes.push((id, shp_to_geo(&polygon))),
            other => warn!(shape = idx, id = %id, kind = ?other.shapetype(), "skipping non-polygon shape"),
        }
    }

    RegionSet::from_shapes(collection, shapes)
}

/// Read `key_field` from a dBase record as an id string.
fn record_id(record: &Record, key_field: &str) -> Result<String> {
    let value = record.get(key_field).ok_or_else(|| {
        Error::key_mismatch(key_field, record.clone().into_iter().map(|(name, _)| name))
    })?;

    match value {
        FieldValue::Character(Some(s)) => Ok(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => Ok(format_number(*n)),
        FieldValue::Double(n) => Ok(format_number(*n)),
        FieldValue::Integer(n) => Ok(n.to_string()),
        other => Err(Error::Format(format!("unsupported id value in field '{key_field}': {other:?}"))),
    }
}

/// Integral numbers are formatted without a fractional part.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 { format!("{}", n as i64) } else { n.to_string() }
}

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>
fn shp_to_geo(p: &shapefile::Polygon) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0])
        }
    }

    /// Get the signed area of a ring (negative for clockwise)
    fn signed_area(pts: &[Coord<f64>]) -> f64 {
        let mut a = 0.0;
        for w in pts.windows(2) {
            a += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        a / 2.0
    }

    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    // Shapefile stores each exterior ring (clockwise) followed by its holes.
    for ring in p.rings() {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect();
        ensure_closed(&mut coords);
        let is_exterior = signed_area(&coords) < 0.0;
        let ls = LineString(coords);

        if is_exterior {
            if let Some(ext) = current_exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut current_holes)));
            }
            current_exterior = Some(ls);
        } else {
            current_holes.push(ls);
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    MultiPolygon(polys)
}
