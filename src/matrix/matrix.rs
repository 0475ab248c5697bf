use std::collections::BTreeMap;

use ndarray::{Array1, Array2};
use tracing::warn;

use crate::{geom::RegionKey, Error, Result};
use super::{Axis, Labels};

/// Dense allocation matrix with primary ids as rows and secondary ids as columns.
/// Pairs without an entry are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationMatrix<K: RegionKey> {
    primary: Labels<K>,
    secondary: Labels<K>,
    values: Array2<f64>, // (n_primary, n_secondary)
}

impl<K: RegionKey> AllocationMatrix<K> {
    /// Construct an all-zero matrix over the given labels.
    pub fn zeros(primary: Labels<K>, secondary: Labels<K>) -> Self {
        let values = Array2::zeros((primary.len(), secondary.len()));
        Self { primary, secondary, values }
    }

    /// Construct a matrix from labels and values, checking that the shapes agree.
    pub fn from_parts(primary: Labels<K>, secondary: Labels<K>, values: Array2<f64>) -> Result<Self> {
        if values.dim() != (primary.len(), secondary.len()) {
            return Err(Error::Format(format!(
                "matrix shape {:?} does not match labels ({}, {})",
                values.dim(), primary.len(), secondary.len(),
            )));
        }
        Ok(Self { primary, secondary, values })
    }

    /// (number of primary ids, number of secondary ids)
    #[inline] pub fn shape(&self) -> (usize, usize) { self.values.dim() }

    #[inline] pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Labels along `axis`.
    #[inline]
    pub fn labels(&self, axis: Axis) -> &Labels<K> {
        match axis {
            Axis::Primary => &self.primary,
            Axis::Secondary => &self.secondary,
        }
    }

    #[inline] pub fn primary_ids(&self) -> &[K] { self.primary.keys() }

    #[inline] pub fn secondary_ids(&self) -> &[K] { self.secondary.keys() }

    #[inline] pub fn values(&self) -> &Array2<f64> { &self.values }

    #[inline] pub(crate) fn values_mut(&mut self) -> &mut Array2<f64> { &mut self.values }

    /// Get the value at (primary, secondary), or 0 if either id is not in the matrix.
    pub fn get(&self, primary: &K, secondary: &K) -> f64 {
        match (self.primary.position(primary), self.secondary.position(secondary)) {
            (Some(i), Some(j)) => self.values[[i, j]],
            _ => 0.0,
        }
    }

    /// Sum of each line along `axis`, in label order.
    pub fn line_sums(&self, axis: Axis) -> Array1<f64> {
        self.values.sum_axis(axis.other().ndarray_axis())
    }

    /// Sum of each line along `axis`, keyed by id.
    pub fn sums(&self, axis: Axis) -> BTreeMap<K, f64> {
        let sums = self.line_sums(axis);
        self.labels(axis).iter().cloned().zip(sums.iter().copied()).collect()
    }

    /// Sum of all entries.
    #[inline] pub fn total(&self) -> f64 { self.values.sum() }

    /// Divide every line along `axis` by its sum so that it sums to 1.
    ///
    /// Lines summing to zero have no normalized value and are left untouched;
    /// the number of such lines is returned and logged as a warning.
    pub fn normalize(&mut self, axis: Axis) -> usize {
        let sums = self.line_sums(axis);
        let mut skipped = 0;

        for (i, &sum) in sums.iter().enumerate() {
            if sum == 0.0 {
                skipped += 1;
                continue;
            }
            self.values.index_axis_mut(axis.ndarray_axis(), i).mapv_inplace(|v| v / sum);
        }

        if skipped > 0 {
            warn!(%axis, lines = skipped, "zero-sum lines left unnormalized");
        }
        skipped
    }

    /// Consuming variant of `normalize`.
    pub fn normalized(mut self, axis: Axis) -> Self {
        self.normalize(axis);
        self
    }

    /// Ids along `axis` that have no entry in `weights`.
    /// Scaling by `weights` would zero out these lines.
    pub fn missing_weights(&self, weights: &BTreeMap<K, f64>, axis: Axis) -> Vec<K> {
        self.labels(axis).iter()
            .filter(|id| !weights.contains_key(*id))
            .cloned()
            .collect()
    }
}
