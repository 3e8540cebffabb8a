//! Insertion-ordered dictionary keyed by an [`EqualityComparer`].
//!
//! `Dictionary` never consults `Eq` or `Hash` on its keys. Entries live in a
//! `Vec` in insertion order and a bucket table maps comparer hashes to entry
//! indices, so iteration order is the order in which keys were first added.
//!
//! # Examples
//!
//! ```rust
//! use lambars_query::comparer::by_key;
//! use lambars_query::dictionary::Dictionary;
//!
//! let mut names = Dictionary::with_comparer(by_key(|name: &String| name.to_lowercase()));
//! assert!(names.try_insert("Mara".to_string(), 1).is_ok());
//! assert!(names.try_insert("MARA".to_string(), 2).is_err());
//! assert_eq!(names.get(&"mara".to_string()), Some(&1));
//! ```

use std::fmt;

use smallvec::SmallVec;

use crate::comparer::{DefaultComparer, EqualityComparer};

// =============================================================================
// Bucket table
// =============================================================================

#[cfg(feature = "fxhash")]
type BucketState = rustc_hash::FxBuildHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type BucketState = ahash::RandomState;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type BucketState = std::collections::hash_map::RandomState;

/// Entry indices sharing one comparer hash. Collisions are rare, so one
/// index is kept inline.
type Bucket = SmallVec<[usize; 1]>;

type BucketTable = std::collections::HashMap<u64, Bucket, BucketState>;

// =============================================================================
// Dictionary
// =============================================================================

/// A map from `K` to `V` whose key equality is defined by `C`.
///
/// Keys are unique under `C`. [`try_insert`](Self::try_insert) rejects a key
/// that is already present instead of overwriting it.
#[derive(Clone)]
pub struct Dictionary<K, V, C = DefaultComparer> {
    comparer: C,
    buckets: BucketTable,
    entries: Vec<(K, V)>,
}

impl<K, V> Dictionary<K, V> {
    /// Creates an empty dictionary using natural key equality.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparer(DefaultComparer)
    }
}

impl<K, V> Default for Dictionary<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Dictionary<K, V, C> {
    /// Creates an empty dictionary that compares keys with `comparer`.
    #[must_use]
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            comparer,
            buckets: BucketTable::default(),
            entries: Vec::new(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the dictionary has no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the comparer used for keys.
    pub const fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: self.entries.iter(),
        }
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Returns the value stored at `index` in insertion order.
    pub(crate) fn value_at(&self, index: usize) -> Option<&V> {
        self.entries.get(index).map(|(_, value)| value)
    }
}

impl<K, V, C: EqualityComparer<K>> Dictionary<K, V, C> {
    /// Returns the insertion index of `key`, if present.
    pub(crate) fn position(&self, key: &K) -> Option<usize> {
        self.find_in_bucket(self.comparer.hash(key), key)
    }

    /// Returns the value associated with `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).and_then(|index| self.value_at(index))
    }

    /// Returns `true` if a key equal to `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Returns `true` if `key` is present and maps to a value equal to `value`.
    pub fn contains_entry(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.get(key) == Some(value)
    }

    /// Inserts `key` and `value` unless an equal key is already present.
    ///
    /// # Errors
    ///
    /// Returns the rejected pair if the key is already present; the
    /// dictionary is left unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        let hash = self.comparer.hash(&key);
        if self.find_in_bucket(hash, &key).is_some() {
            return Err((key, value));
        }
        self.push(hash, key, value);
        Ok(())
    }

    /// Returns the value for `key`, inserting `make()` first if it is absent.
    pub(crate) fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        let hash = self.comparer.hash(&key);
        let index = self
            .find_in_bucket(hash, &key)
            .unwrap_or_else(|| self.push(hash, key, make()));
        &mut self.entries[index].1
    }

    fn find_in_bucket(&self, hash: u64, key: &K) -> Option<usize> {
        self.buckets.get(&hash)?.iter().copied().find(|&index| {
            self.entries
                .get(index)
                .is_some_and(|(stored, _)| self.comparer.equals(stored, key))
        })
    }

    fn push(&mut self, hash: u64, key: K, value: V) -> usize {
        let index = self.entries.len();
        self.entries.push((key, value));
        self.buckets.entry(hash).or_default().push(index);
        index
    }
}

impl<K: Clone, C: EqualityComparer<K>> Dictionary<K, (), C> {
    /// Adds a clone of `key` unless an equal key is already present.
    ///
    /// Returns `true` if the key was added. The key is hashed once and only
    /// cloned when it is new.
    pub(crate) fn insert_new(&mut self, key: &K) -> bool {
        let hash = self.comparer.hash(key);
        if self.find_in_bucket(hash, key).is_some() {
            return false;
        }
        self.push(hash, key.clone(), ());
        true
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Dictionary<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.entries.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

static_assertions::assert_impl_all!(Dictionary<i32, String>: Send, Sync, Clone);

// =============================================================================
// Iteration
// =============================================================================

/// Borrowing iterator over the entries of a [`Dictionary`].
pub struct Iter<'a, K, V> {
    entries: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, C> IntoIterator for &'a Dictionary<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for Dictionary<K, V, C> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for Dictionary<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct DictionaryVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> DictionaryVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for DictionaryVisitor<K, V>
where
    K: serde::Deserialize<'de> + Eq + std::hash::Hash,
    V: serde::Deserialize<'de>,
{
    type Value = Dictionary<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with unique keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut dictionary = Dictionary::new();
        let mut position = 0_usize;
        while let Some((key, value)) = access.next_entry()? {
            if dictionary.try_insert(key, value).is_err() {
                return Err(serde::de::Error::custom(format_args!(
                    "duplicate key at position {position}"
                )));
            }
            position += 1;
        }
        Ok(dictionary)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Dictionary<K, V>
where
    K: serde::Deserialize<'de> + Eq + std::hash::Hash,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(DictionaryVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::{by_key, from_fn};
    use rstest::rstest;

    #[rstest]
    fn test_new_creates_empty() {
        let dictionary: Dictionary<i32, String> = Dictionary::new();
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.len(), 0);
        assert_eq!(dictionary.get(&1), None);
    }

    #[rstest]
    fn test_try_insert_rejects_existing_key() {
        let mut dictionary = Dictionary::new();
        assert_eq!(dictionary.try_insert(1, "Andrei"), Ok(()));
        assert_eq!(dictionary.try_insert(1, "Mihai"), Err((1, "Mihai")));
        assert_eq!(dictionary.get(&1), Some(&"Andrei"));
        assert_eq!(dictionary.len(), 1);
    }

    #[rstest]
    fn test_iteration_follows_insertion_order() {
        let mut dictionary = Dictionary::new();
        for key in [104, 101, 103, 102] {
            assert!(dictionary.try_insert(key, key * 10).is_ok());
        }
        let keys: Vec<i32> = dictionary.keys().copied().collect();
        assert_eq!(keys, vec![104, 101, 103, 102]);
        let values: Vec<i32> = dictionary.values().copied().collect();
        assert_eq!(values, vec![1040, 1010, 1030, 1020]);
    }

    #[rstest]
    fn test_uses_comparer_not_natural_equality() {
        let mut dictionary = Dictionary::with_comparer(by_key(|value: &i32| value % 3));
        assert!(dictionary.try_insert(1, "one").is_ok());
        assert!(dictionary.try_insert(4, "four").is_err());
        assert!(dictionary.contains_key(&7));
        assert!(!dictionary.contains_key(&2));
    }

    #[rstest]
    fn test_colliding_hashes_are_kept_apart() {
        let constant_hash = from_fn(|left: &i32, right: &i32| left == right, |_: &i32| 0);
        let mut dictionary = Dictionary::with_comparer(constant_hash);
        for key in 0..5 {
            assert!(dictionary.try_insert(key, key).is_ok());
        }
        assert_eq!(dictionary.len(), 5);
        for key in 0..5 {
            assert_eq!(dictionary.get(&key), Some(&key));
        }
        assert_eq!(dictionary.get(&5), None);
    }

    #[rstest]
    fn test_get_or_insert_with_groups_values() {
        let mut groups: Dictionary<&str, Vec<i32>> = Dictionary::new();
        groups.get_or_insert_with("odd", Vec::new).push(1);
        groups.get_or_insert_with("even", Vec::new).push(2);
        groups.get_or_insert_with("odd", Vec::new).push(3);

        assert_eq!(groups.get(&"odd"), Some(&vec![1, 3]));
        assert_eq!(groups.get(&"even"), Some(&vec![2]));
        assert_eq!(groups.position(&"even"), Some(1));
    }

    #[rstest]
    fn test_insert_new_reports_whether_key_was_added() {
        let mut seen = Dictionary::with_comparer(by_key(|name: &String| name.to_lowercase()));
        assert!(seen.insert_new(&"Mara".to_string()));
        assert!(!seen.insert_new(&"MARA".to_string()));
        assert!(seen.insert_new(&"Ana".to_string()));

        let keys: Vec<&String> = seen.keys().collect();
        assert_eq!(keys, vec!["Mara", "Ana"]);
    }

    #[rstest]
    fn test_contains_entry_checks_value() {
        let mut dictionary = Dictionary::new();
        assert!(dictionary.try_insert(104, "Anurag").is_ok());
        assert!(dictionary.contains_entry(&104, &"Anurag"));
        assert!(!dictionary.contains_entry(&104, &"Andrei"));
        assert!(!dictionary.contains_entry(&109, &"Andrei"));
    }

    #[rstest]
    fn test_debug_lists_entries_in_order() {
        let mut dictionary = Dictionary::new();
        assert!(dictionary.try_insert(2, "b").is_ok());
        assert!(dictionary.try_insert(1, "a").is_ok());
        assert_eq!(format!("{dictionary:?}"), r#"{2: "b", 1: "a"}"#);
    }

    #[rstest]
    fn test_into_iter_yields_owned_pairs() {
        let mut dictionary = Dictionary::new();
        assert!(dictionary.try_insert("x", 1).is_ok());
        assert!(dictionary.try_insert("y", 2).is_ok());
        let pairs: Vec<(&str, i32)> = dictionary.into_iter().collect();
        assert_eq!(pairs, vec![("x", 1), ("y", 2)]);
    }
}
