use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{geom::RegionKey, Error, Result};
use super::{AllocationMatrix, Axis};

/// Non-negative per-region weights (e.g. population, demand) keyed by id.
pub type WeightVector<K> = BTreeMap<K, f64>;

/// Multiply every line of `matrix` along `scale_axis` by the weight of its id.
///
/// If `normalize_first` is set, the matrix is first normalized along `scale_axis`
/// (same zero-sum rule as `AllocationMatrix::normalize`), so that the weights are
/// distributed over each line instead of multiplying raw fractions.
///
/// Weights whose ids are not on `scale_axis` are ignored. Ids on `scale_axis` with no
/// weight are treated as zero weight: their line becomes all zeros, which lowers
/// downstream totals. Use `AllocationMatrix::missing_weights` to detect this beforehand.
/// Negative or non-finite weights for ids in the matrix are rejected.
pub fn scale_matrix<K: RegionKey>(
    mut matrix: AllocationMatrix<K>,
    weights: &WeightVector<K>,
    scale_axis: Axis,
    normalize_first: bool,
) -> Result<AllocationMatrix<K>> {
    if normalize_first {
        matrix.normalize(scale_axis);
    }

    let mut factors = Vec::with_capacity(matrix.labels(scale_axis).len());
    let mut missing = 0usize;
    for id in matrix.labels(scale_axis).iter() {
        match weights.get(id) {
            Some(&w) if w.is_finite() && w >= 0.0 => factors.push(w),
            Some(&w) => return Err(Error::InvalidWeight { id: id.to_string(), value: w }),
            None => {
                missing += 1;
                factors.push(0.0);
            }
        }
    }

    if missing > 0 {
        warn!(axis = %scale_axis, missing, "ids without weights dropped from allocation");
    }
    let ignored = weights.len() - (factors.len() - missing);
    if ignored > 0 {
        debug!(axis = %scale_axis, ignored, "weights for ids outside the matrix ignored");
    }

    let axis = scale_axis.ndarray_axis();
    for (i, factor) in factors.into_iter().enumerate() {
        matrix.values_mut().index_axis_mut(axis, i).mapv_inplace(|v| v * factor);
    }
    Ok(matrix)
}
