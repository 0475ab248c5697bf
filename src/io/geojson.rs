use std::{fs, path::Path};

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;
use tracing::warn;

use crate::{geom::{Collection, RegionSet}, Error, Result};

/// Load a region collection from a GeoJSON FeatureCollection file.
/// See `read_regions_geojson_bytes`.
pub fn read_regions_geojson(path: &Path, key_field: &str, collection: Collection) -> Result<RegionSet<String>> {
    let bytes = fs::read(path).map_err(Error::file(path))?;
    read_regions_geojson_bytes(&bytes, key_field, collection)
}

/// Load a region collection from GeoJSON FeatureCollection bytes.
///
/// Each Polygon or MultiPolygon feature becomes a region whose id is the `key_field`
/// property (strings as-is, numbers formatted). Features with other geometry types are
/// skipped with a warning. A feature without `key_field` fails with `KeyMismatch`.
pub fn read_regions_geojson_bytes(bytes: &[u8], key_field: &str, collection: Collection) -> Result<RegionSet<String>> {
    let value: Value = serde_json::from_slice(bytes)?;
    let features = value["features"].as_array()
        .ok_or_else(|| Error::Format("GeoJSON input is not a FeatureCollection".into()))?;

    let mut shapes = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let properties = feature["properties"].as_object();
        let id = match properties.and_then(|props| props.get(key_field)) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => return Err(Error::Format(format!("feature {idx}: unsupported id value {other}"))),
            None => {
                let available = properties.map(|props| props.keys().cloned().collect::<Vec<_>>()).unwrap_or_default();
                return Err(Error::key_mismatch(key_field, available));
            }
        };

        let geometry = &feature["geometry"];
        let coords = geometry["coordinates"].as_array();
        let shape = match (geometry["type"].as_str(), coords) {
            (Some("Polygon"), Some(coords)) => MultiPolygon(vec![parse_polygon(coords)?]),
            (Some("MultiPolygon"), Some(coords)) => parse_multipolygon(coords)?,
            (ty, _) => {
                warn!(feature = idx, id = %id, geometry = ?ty, "skipping non-polygonal feature");
                continue;
            }
        };
        shapes.push((id, shape));
    }

    RegionSet::from_shapes(collection, shapes)
}

/// Parse MultiPolygon coordinates: `[[ring, ring, ...], ...]`.
fn parse_multipolygon(coords: &[Value]) -> Result<MultiPolygon<f64>> {
    coords.iter()
        .map(|polygon| {
            let rings = polygon.as_array()
                .ok_or_else(|| Error::Format("invalid MultiPolygon: polygon is not an array".into()))?;
            parse_polygon(rings)
        })
        .collect::<Result<Vec<_>>>()
        .map(MultiPolygon)
}

/// Parse Polygon coordinates: exterior ring followed by holes.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        let ring = ring.as_array()
            .ok_or_else(|| Error::Format("invalid Polygon: ring is not an array".into()))?;
        parse_ring(ring)
    });

    let exterior = rings.next()
        .ok_or_else(|| Error::Format("invalid Polygon: missing exterior ring".into()))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of `[x, y]` positions, closing it if needed.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len() + 1);
    for position in coords {
        let (Some(x), Some(y)) = (position[0].as_f64(), position[1].as_f64()) else {
            return Err(Error::Format(format!("invalid coordinate: {position}")));
        };
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    Ok(LineString(points))
}
