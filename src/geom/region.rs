use std::{fmt, hash::Hash};

use ahash::AHashMap;
use geo::{Area, BoundingRect, MultiPolygon, Rect};
use rstar::{RTree, AABB};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use super::BoundingBox;

/// Identifier type for regions in either collection.
///
/// Ordering is required so that matrix labels come out sorted and deterministic.
pub trait RegionKey: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

impl<T> RegionKey for T where T: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

/// Which of the two overlaid partitions a region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Primary,
    Secondary,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Primary => write!(f, "primary"),
            Collection::Secondary => write!(f, "secondary"),
        }
    }
}

/// A single polygon region with its identifier.
#[derive(Debug, Clone)]
pub struct Region<K> {
    pub id: K,
    pub shape: MultiPolygon<f64>,
    pub area: Option<f64>, // Planar area, filled in by `RegionSet::annotate_areas`
}

impl<K> Region<K> {
    pub fn new(id: K, shape: MultiPolygon<f64>) -> Self {
        Self { id, shape, area: None }
    }

    /// Get the annotated area, or measure it if the region has not been annotated.
    #[inline]
    pub fn measured_area(&self) -> f64 {
        self.area.unwrap_or_else(|| self.shape.unsigned_area())
    }
}

/// A collection of regions with unique ids, indexed by an R-tree over their bounding boxes.
#[derive(Debug, Clone)]
pub struct RegionSet<K> {
    collection: Collection,
    regions: Vec<Region<K>>,
    index: AHashMap<K, usize>, // Map between region ids and positions in `regions`
    rtree: RTree<BoundingBox>,
}

impl<K: RegionKey> RegionSet<K> {
    /// Construct a RegionSet, failing if any id appears twice.
    /// Regions with empty geometry are kept but never returned as overlap candidates.
    pub fn new(collection: Collection, regions: impl IntoIterator<Item = Region<K>>) -> Result<Self> {
        let regions: Vec<Region<K>> = regions.into_iter().collect();

        let mut index = AHashMap::with_capacity(regions.len());
        for (i, region) in regions.iter().enumerate() {
            if index.insert(region.id.clone(), i).is_some() {
                return Err(Error::DuplicateId { collection, id: region.id.to_string() });
            }
        }

        let rtree = RTree::bulk_load(regions.iter().enumerate()
            .filter_map(|(i, region)| region.shape.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
            .collect());

        Ok(Self { collection, regions, index, rtree })
    }

    /// Construct a RegionSet from (id, geometry) pairs.
    pub fn from_shapes(collection: Collection, shapes: impl IntoIterator<Item = (K, MultiPolygon<f64>)>) -> Result<Self> {
        Self::new(collection, shapes.into_iter().map(|(id, shape)| Region::new(id, shape)))
    }

    #[inline] pub fn collection(&self) -> Collection { self.collection }

    #[inline] pub fn len(&self) -> usize { self.regions.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    #[inline] pub fn regions(&self) -> &[Region<K>] { &self.regions }

    /// Look up a region by id.
    pub fn get(&self, id: &K) -> Option<&Region<K>> {
        self.index.get(id).map(|&i| &self.regions[i])
    }

    /// Iterate over region ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.regions.iter().map(|region| &region.id)
    }

    /// Compute the planar area of every region that has not been annotated yet.
    /// This writes into the regions of `self`; already-annotated areas are left alone.
    pub fn annotate_areas(&mut self) {
        for region in self.regions.iter_mut().filter(|region| region.area.is_none()) {
            region.area = Some(region.shape.unsigned_area());
        }
    }

    /// Error with `DegenerateGeometry` on the first region whose area is not a positive finite number.
    /// Regions that have not been annotated are measured on the fly.
    pub fn ensure_non_degenerate(&self) -> Result<()> {
        for region in &self.regions {
            let area = region.measured_area();
            if !(area.is_finite() && area > 0.0) {
                return Err(Error::DegenerateGeometry {
                    collection: self.collection,
                    id: region.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Indices of regions whose bounding boxes intersect `rect`.
    pub(crate) fn candidates(&self, rect: Rect<f64>) -> impl Iterator<Item = usize> + '_ {
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
        self.rtree.locate_in_envelope_intersecting(&envelope).map(|bb| bb.idx())
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]])
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = RegionSet::from_shapes(Collection::Primary, [
            ("a".to_string(), square(0.0, 0.0, 1.0)),
            ("a".to_string(), square(1.0, 0.0, 1.0)),
        ]);
        assert!(matches!(result, Err(Error::DuplicateId { collection: Collection::Primary, .. })));
    }

    #[test]
    fn annotate_areas_fills_every_region() {
        let mut set = RegionSet::from_shapes(Collection::Secondary, [
            (1u32, square(0.0, 0.0, 2.0)),
            (2u32, square(5.0, 5.0, 3.0)),
        ]).unwrap();
        assert!(set.regions().iter().all(|region| region.area.is_none()));

        set.annotate_areas();
        assert_eq!(set.get(&1).unwrap().area, Some(4.0));
        assert_eq!(set.get(&2).unwrap().area, Some(9.0));
    }

    #[test]
    fn zero_area_region_is_degenerate() {
        let flat = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 0.0, y: 0.0),
        ]]);
        let set = RegionSet::from_shapes(Collection::Secondary, [
            ("ok", square(0.0, 0.0, 1.0)),
            ("flat", flat),
        ]).unwrap();

        match set.ensure_non_degenerate() {
            Err(Error::DegenerateGeometry { collection, id }) => {
                assert_eq!(collection, Collection::Secondary);
                assert_eq!(id, "flat");
            }
            other => panic!("expected DegenerateGeometry, got {other:?}"),
        }
    }

    #[test]
    fn empty_geometry_is_degenerate_and_unindexed() {
        let set = RegionSet::from_shapes(Collection::Primary, [
            ("empty", MultiPolygon::<f64>(vec![])),
        ]).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.candidates(square(-10.0, -10.0, 20.0).bounding_rect().unwrap()).count(), 0);
        assert!(set.ensure_non_degenerate().is_err());
    }

    #[test]
    fn candidates_follow_bounding_boxes() {
        let set = RegionSet::from_shapes(Collection::Secondary, [
            ("left", square(0.0, 0.0, 1.0)),
            ("right", square(10.0, 0.0, 1.0)),
        ]).unwrap();
        let probe = square(0.5, 0.5, 1.0).bounding_rect().unwrap();
        let hits: Vec<usize> = set.candidates(probe).collect();
        assert_eq!(hits, vec![0]);
    }
}
