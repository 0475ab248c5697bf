use ndarray::Array2;
use tracing::debug;

use crate::{geom::RegionKey, intersect::{FractionField, IntersectionRecord}};
use super::{AllocationMatrix, Axis, Labels};

/// Pivot intersection records into a primary × secondary matrix of `field` values.
///
/// Labels are the sorted distinct ids present in `records`; absent pairs are zero.
/// A pair appearing more than once takes the mean of its values, as a pivot table would.
/// If `normalize` is set, every line along that axis is divided by its sum
/// (zero-sum lines are left as they are, see `AllocationMatrix::normalize`).
pub fn build_matrix<'a, K: RegionKey + 'a>(
    records: impl IntoIterator<Item = &'a IntersectionRecord<K>>,
    field: FractionField,
    normalize: Option<Axis>,
) -> AllocationMatrix<K> {
    let records: Vec<&IntersectionRecord<K>> = records.into_iter().collect();

    let primary: Labels<K> = records.iter().map(|r| r.primary_id.clone()).collect();
    let secondary: Labels<K> = records.iter().map(|r| r.secondary_id.clone()).collect();

    let mut sums = Array2::<f64>::zeros((primary.len(), secondary.len()));
    let mut counts = Array2::<u32>::zeros((primary.len(), secondary.len()));
    for record in &records {
        // Both positions exist: labels were built from these records.
        let (Some(i), Some(j)) = (primary.position(&record.primary_id), secondary.position(&record.secondary_id))
            else { continue };
        sums[[i, j]] += record.fraction(field);
        counts[[i, j]] += 1;
    }

    let values = ndarray::Zip::from(&sums).and(&counts)
        .map_collect(|&sum, &count| if count > 1 { sum / count as f64 } else { sum });

    debug!(
        rows = primary.len(),
        cols = secondary.len(),
        records = records.len(),
        %field,
        "built allocation matrix"
    );

    let mut matrix = AllocationMatrix::zeros(primary, secondary);
    *matrix.values_mut() = values;

    if let Some(axis) = normalize {
        matrix.normalize(axis);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use crate::intersect::IntersectionTable;
    use super::*;

    fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    fn record(p: &'static str, s: &'static str, pf: f64, sf: f64) -> IntersectionRecord<&'static str> {
        IntersectionRecord { primary_id: p, secondary_id: s, primary_fraction: pf, secondary_fraction: sf }
    }

    /// Tract t1 split 60/20 between two areas (20% uncovered), t2 fully inside a2.
    fn table() -> IntersectionTable<&'static str> {
        IntersectionTable::new(vec![
            record("t1", "a1", 0.6, 0.3),
            record("t1", "a2", 0.2, 0.1),
            record("t2", "a2", 1.0, 0.5),
        ])
    }

    #[test]
    fn pivot_fills_absent_pairs_with_zero() {
        let m = build_matrix(&table(), FractionField::Primary, None);
        assert_eq!(m.primary_ids(), &["t1", "t2"]);
        assert_eq!(m.secondary_ids(), &["a1", "a2"]);
        assert_eq!(m.get(&"t1", &"a1"), 0.6);
        assert_eq!(m.get(&"t2", &"a1"), 0.0);
        assert_eq!(m.get(&"t2", &"a2"), 1.0);
    }

    #[test]
    fn field_selects_values() {
        let m = build_matrix(&table(), FractionField::Secondary, None);
        assert_eq!(m.get(&"t1", &"a1"), 0.3);
        assert_eq!(m.get(&"t2", &"a2"), 0.5);
    }

    #[test]
    fn primary_normalization_makes_rows_sum_to_one() {
        let m = build_matrix(&table(), FractionField::Primary, Some(Axis::Primary));
        for (_, sum) in m.sums(Axis::Primary) {
            assert!(approx(sum, 1.0));
        }
        assert!(approx(m.get(&"t1", &"a1"), 0.75));
        assert!(approx(m.get(&"t1", &"a2"), 0.25));
    }

    #[test]
    fn secondary_normalization_makes_columns_sum_to_one() {
        let m = build_matrix(&table(), FractionField::Primary, Some(Axis::Secondary));
        for (_, sum) in m.sums(Axis::Secondary) {
            assert!(approx(sum, 1.0));
        }
        assert!(approx(m.get(&"t1", &"a2"), 0.2 / 1.2));
    }

    #[test]
    fn duplicate_pairs_are_averaged() {
        let records = vec![record("t1", "a1", 0.2, 0.1), record("t1", "a1", 0.4, 0.3)];
        let m = build_matrix(&records, FractionField::Primary, None);
        assert_eq!(m.shape(), (1, 1));
        assert!(approx(m.get(&"t1", &"a1"), 0.3));
    }

    #[test]
    fn empty_input_builds_empty_matrix() {
        let m = build_matrix(&IntersectionTable::<&str>::default(), FractionField::Primary, Some(Axis::Primary));
        assert!(m.is_empty());
    }
}
