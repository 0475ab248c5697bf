use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::geom::RegionKey;

/// Sorted, unique axis labels with a reverse lookup from label to position.
#[derive(Debug, Clone)]
pub struct Labels<K: RegionKey> {
    keys: Vec<K>,
    index: AHashMap<K, usize>,
}

impl<K: RegionKey> Labels<K> {
    /// Build labels from any collection of keys; duplicates collapse and order is sorted.
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        let keys: Vec<K> = keys.into_iter().collect::<BTreeSet<K>>().into_iter().collect();
        let index = keys.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect();
        Self { keys, index }
    }

    #[inline] pub fn len(&self) -> usize { self.keys.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.keys.is_empty() }

    #[inline] pub fn keys(&self) -> &[K] { &self.keys }

    #[inline] pub fn iter(&self) -> std::slice::Iter<'_, K> { self.keys.iter() }

    /// Position of `key` on the axis, if present.
    #[inline]
    pub fn position(&self, key: &K) -> Option<usize> { self.index.get(key).copied() }

    #[inline]
    pub fn contains(&self, key: &K) -> bool { self.index.contains_key(key) }
}

impl<K: RegionKey> PartialEq for Labels<K> {
    fn eq(&self, other: &Self) -> bool { self.keys == other.keys }
}

impl<K: RegionKey> FromIterator<K> for Labels<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::Labels;

    #[test]
    fn labels_are_sorted_and_unique() {
        let labels: Labels<&str> = ["c", "a", "b", "a"].into_iter().collect();
        assert_eq!(labels.keys(), &["a", "b", "c"]);
        assert_eq!(labels.position(&"c"), Some(2));
        assert_eq!(labels.position(&"z"), None);
        assert!(labels.contains(&"b"));
    }
}
