use std::collections::{BTreeMap, BTreeSet};

use ndarray::Array1;
use tracing::warn;

use crate::{geom::RegionKey, matrix::{AllocationMatrix, Axis}};

/// Share of each secondary column's total attributable to the primary ids in `subset`.
///
/// For every column, the rows in `subset` are summed and divided by the sum over all
/// rows. Columns whose total is zero, or to which the subset contributes nothing, are
/// left out of the result rather than reported as NaN or zero. Subset ids that are not
/// rows of `matrix` are ignored (and logged); repeated ids count once.
pub fn allocation_fraction<'a, K: RegionKey + 'a>(
    matrix: &AllocationMatrix<K>,
    subset: impl IntoIterator<Item = &'a K>,
) -> BTreeMap<K, f64> {
    let rows = matrix.labels(Axis::Primary);

    let mut positions = BTreeSet::new();
    let mut unknown = 0usize;
    for id in subset {
        match rows.position(id) {
            Some(i) => { positions.insert(i); }
            None => unknown += 1,
        }
    }
    if unknown > 0 {
        warn!(unknown, "subset ids not present in the allocation matrix ignored");
    }

    let values = matrix.values();
    let mut selected = Array1::<f64>::zeros(values.ncols());
    for &i in &positions {
        selected += &values.row(i);
    }
    let totals = matrix.line_sums(Axis::Secondary);

    matrix.secondary_ids().iter()
        .zip(selected.iter().zip(totals.iter()))
        .map(|(id, (&part, &total))| (id, part, total))
        .filter(|&(_, part, total)| total != 0.0 && part != 0.0)
        .map(|(id, part, total)| (id.clone(), part / total))
        .collect()
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use crate::matrix::Labels;
    use super::*;

    fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    /// Population-scaled matrix: rows are tracts, columns are planning areas.
    fn sample() -> AllocationMatrix<&'static str> {
        AllocationMatrix::from_parts(
            Labels::new(["t1", "t2", "t3"]),
            Labels::new(["a1", "a2", "a3", "a4"]),
            array![
                [30.0, 10.0, 0.0, 0.0],
                [10.0, 0.0, 0.0, 0.0],
                [0.0, 30.0, 5.0, 0.0],
            ],
        ).unwrap()
    }

    #[test]
    fn full_subset_gives_one_for_every_nonzero_column() {
        let m = sample();
        let ratios = allocation_fraction(&m, m.primary_ids());
        assert_eq!(ratios.len(), 3);
        for (_, ratio) in ratios {
            assert!(approx(ratio, 1.0));
        }
    }

    #[test]
    fn proper_subset_share() {
        let m = sample();
        let ratios = allocation_fraction(&m, &["t1"]);
        assert!(approx(ratios[&"a1"], 0.75));
        assert!(approx(ratios[&"a2"], 0.25));
        assert!(!ratios.contains_key(&"a3"));
        for (_, ratio) in ratios {
            assert!((0.0..=1.0).contains(&ratio));
        }
    }

    #[test]
    fn zero_total_columns_are_excluded() {
        let m = sample();
        let ratios = allocation_fraction(&m, m.primary_ids());
        assert!(!ratios.contains_key(&"a4"));
        assert!(ratios.values().all(|r| r.is_finite()));
    }

    #[test]
    fn unknown_and_repeated_ids_are_ignored() {
        let m = sample();
        let ratios = allocation_fraction(&m, &["t2", "t2", "nowhere"]);
        assert_eq!(ratios.len(), 1);
        assert!(approx(ratios[&"a1"], 0.25));
    }

    #[test]
    fn empty_subset_gives_empty_result() {
        let m = sample();
        assert!(allocation_fraction(&m, &[]).is_empty());
    }
}
