use std::{collections::BTreeMap, fmt};

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::{geom::RegionKey, matrix::{AllocationMatrix, Labels}, Error, Result};
use super::allocation_fraction;

/// A single value of a time-indexed series for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<T, K> {
    pub timestamp: T,
    pub id: K,
    pub value: f64,
}

/// Long-format time series: one observation per (timestamp, id).
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T, K> {
    observations: Vec<Observation<T, K>>,
}

impl<T, K> TimeSeries<T, K> {
    pub fn new(observations: Vec<Observation<T, K>>) -> Self {
        Self { observations }
    }

    pub fn push(&mut self, timestamp: T, id: K, value: f64) {
        self.observations.push(Observation { timestamp, id, value });
    }

    #[inline] pub fn len(&self) -> usize { self.observations.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.observations.is_empty() }

    #[inline] pub fn observations(&self) -> &[Observation<T, K>] { &self.observations }
}

impl<T, K> Default for TimeSeries<T, K> {
    fn default() -> Self {
        Self { observations: Vec::new() }
    }
}

impl<T, K> FromIterator<(T, K, f64)> for TimeSeries<T, K> {
    fn from_iter<I: IntoIterator<Item = (T, K, f64)>>(iter: I) -> Self {
        Self {
            observations: iter.into_iter()
                .map(|(timestamp, id, value)| Observation { timestamp, id, value })
                .collect(),
        }
    }
}

impl<T: Ord + Clone + fmt::Display, K: RegionKey> TimeSeries<T, K> {
    /// Pivot the observations whose id is in `ids` into a timestamp × id matrix.
    ///
    /// Rows are the sorted timestamps that have at least one such observation, columns
    /// follow `ids`. Cells without an observation are zero. A repeated (timestamp, id)
    /// pair fails with `DuplicateEntry`.
    pub fn pivot(&self, ids: &Labels<K>) -> Result<(Vec<T>, Array2<f64>)> {
        let kept: Vec<(&Observation<T, K>, usize)> = self.observations.iter()
            .filter_map(|obs| ids.position(&obs.id).map(|j| (obs, j)))
            .collect();

        let mut rows: BTreeMap<T, usize> = kept.iter().map(|(obs, _)| (obs.timestamp.clone(), 0)).collect();
        for (i, row) in rows.values_mut().enumerate() {
            *row = i;
        }

        let mut values = Array2::<f64>::zeros((rows.len(), ids.len()));
        let mut filled = Array2::<bool>::from_elem((rows.len(), ids.len()), false);
        for (obs, j) in kept {
            let i = rows[&obs.timestamp];
            if filled[[i, j]] {
                return Err(Error::DuplicateEntry {
                    timestamp: obs.timestamp.to_string(),
                    id: obs.id.to_string(),
                });
            }
            filled[[i, j]] = true;
            values[[i, j]] = obs.value;
        }

        Ok((rows.into_keys().collect(), values))
    }
}

/// Aggregate `series` into one value per timestamp, weighting each id by its ratio.
///
/// Only observations whose id is a key of `ratios` take part; the remaining ones are
/// pivoted to timestamp × id (absent cells zero) and multiplied with the ratio vector.
/// Ratio keys that never appear in the series contribute nothing. Callers that need
/// full coverage must check it beforehand.
pub fn allocate_time_series<T, K>(
    ratios: &BTreeMap<K, f64>,
    series: &TimeSeries<T, K>,
) -> Result<BTreeMap<T, f64>>
where
    T: Ord + Clone + fmt::Display,
    K: RegionKey,
{
    let ids: Labels<K> = ratios.keys().cloned().collect();
    let weights: Array1<f64> = ids.iter().map(|id| ratios[id]).collect();

    let (timestamps, values) = series.pivot(&ids)?;
    let totals = values.dot(&weights);

    debug!(timestamps = timestamps.len(), ids = ids.len(), "allocated time series");
    Ok(timestamps.into_iter().zip(totals.iter().copied()).collect())
}

/// Share of `series` attributable to the primary ids in `subset`, using `matrix` to
/// derive the per-column ratios (see `allocation_fraction`).
pub fn allocate_subset_time_series<'a, T, K>(
    matrix: &AllocationMatrix<K>,
    subset: impl IntoIterator<Item = &'a K>,
    series: &TimeSeries<T, K>,
) -> Result<BTreeMap<T, f64>>
where
    T: Ord + Clone + fmt::Display,
    K: RegionKey + 'a,
{
    let ratios = allocation_fraction(matrix, subset);
    allocate_time_series(&ratios, series)
}
