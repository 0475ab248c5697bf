use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Overlap between one primary and one secondary region.
///
/// `primary_fraction` is the share of the primary region's area covered by the overlap,
/// `secondary_fraction` the share of the secondary region's area. Both lie in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionRecord<K> {
    pub primary_id: K,
    pub secondary_id: K,
    pub primary_fraction: f64,
    pub secondary_fraction: f64,
}

impl<K> IntersectionRecord<K> {
    /// Get the fraction selected by `field`.
    #[inline]
    pub fn fraction(&self, field: FractionField) -> f64 {
        match field {
            FractionField::Primary => self.primary_fraction,
            FractionField::Secondary => self.secondary_fraction,
        }
    }
}

/// Which fraction of an intersection record to use as matrix values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractionField {
    Primary,
    Secondary,
}

impl FractionField {
    /// Name of the corresponding column in intersection tables and snapshots.
    pub fn column_name(&self) -> &'static str {
        match self {
            FractionField::Primary => "primary_fraction",
            FractionField::Secondary => "secondary_fraction",
        }
    }
}

impl fmt::Display for FractionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for FractionField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary_fraction" | "primary" => Ok(FractionField::Primary),
            "secondary_fraction" | "secondary" => Ok(FractionField::Secondary),
            _ => Err(Error::key_mismatch(s, ["primary_fraction", "secondary_fraction"])),
        }
    }
}

/// Ordered sequence of intersection records, at most one per (primary, secondary) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntersectionTable<K> {
    records: Vec<IntersectionRecord<K>>,
}

impl<K> IntersectionTable<K> {
    pub fn new(records: Vec<IntersectionRecord<K>>) -> Self {
        Self { records }
    }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    #[inline] pub fn records(&self) -> &[IntersectionRecord<K>] { &self.records }

    #[inline] pub fn iter(&self) -> std::slice::Iter<'_, IntersectionRecord<K>> { self.records.iter() }

    pub fn into_records(self) -> Vec<IntersectionRecord<K>> { self.records }
}

impl<K> Default for IntersectionTable<K> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<K> FromIterator<IntersectionRecord<K>> for IntersectionTable<K> {
    fn from_iter<I: IntoIterator<Item = IntersectionRecord<K>>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

impl<'a, K> IntoIterator for &'a IntersectionTable<K> {
    type Item = &'a IntersectionRecord<K>;
    type IntoIter = std::slice::Iter<'a, IntersectionRecord<K>>;

    fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}
