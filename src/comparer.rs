//! Pluggable equality for key-based operators.
//!
//! [`distinct`](crate::deferred::distinct), [`join_with`](crate::deferred::join_with)
//! and [`to_dictionary_with`](crate::eager::to_dictionary_with) never fall back
//! to `Eq`/`Hash` on their keys: every comparison goes through the
//! [`EqualityComparer`] supplied to the call.
//!
//! # Examples
//!
//! ```rust
//! use lambars_query::comparer::{EqualityComparer, by_key};
//!
//! let case_insensitive = by_key(|name: &&str| name.to_lowercase());
//! assert!(case_insensitive.equals(&"Mara", &"MARA"));
//! assert_eq!(case_insensitive.hash(&"Mara"), case_insensitive.hash(&"mara"));
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Equality and hashing for values of type `T`.
///
/// Implementations must be consistent: `equals(a, b)` implies
/// `hash(a) == hash(b)`. Comparers are expected to be stateless, so one
/// instance may be shared by any number of calls.
pub trait EqualityComparer<T: ?Sized> {
    /// Returns `true` if `left` and `right` are equal under this comparer.
    fn equals(&self, left: &T, right: &T) -> bool;

    /// Returns the hash of `value` under this comparer.
    fn hash(&self, value: &T) -> u64;
}

impl<T: ?Sized, C: EqualityComparer<T> + ?Sized> EqualityComparer<T> for &C {
    #[inline]
    fn equals(&self, left: &T, right: &T) -> bool {
        (**self).equals(left, right)
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        (**self).hash(value)
    }
}

/// Computes the hash of a value using `DefaultHasher`.
fn compute_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// DefaultComparer
// =============================================================================

/// Natural equality: `Eq` for comparison and `Hash` for hashing.
///
/// # Examples
///
/// ```rust
/// use lambars_query::comparer::{DefaultComparer, EqualityComparer};
///
/// assert!(DefaultComparer.equals(&3, &3));
/// assert!(!DefaultComparer.equals("a", "b"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultComparer;

impl<T: Eq + Hash + ?Sized> EqualityComparer<T> for DefaultComparer {
    #[inline]
    fn equals(&self, left: &T, right: &T) -> bool {
        left == right
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        compute_hash(value)
    }
}

// =============================================================================
// KeyComparer
// =============================================================================

/// Compares values by a key projected out of them.
///
/// Built with [`by_key`].
pub struct KeyComparer<F, K> {
    projection: F,
    key_marker: PhantomData<fn() -> K>,
}

/// Creates a comparer that compares values by `projection(value)`.
#[must_use]
pub const fn by_key<T, K, F>(projection: F) -> KeyComparer<F, K>
where
    T: ?Sized,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    KeyComparer {
        projection,
        key_marker: PhantomData,
    }
}

impl<T, K, F> EqualityComparer<T> for KeyComparer<F, K>
where
    T: ?Sized,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    fn equals(&self, left: &T, right: &T) -> bool {
        (self.projection)(left) == (self.projection)(right)
    }

    fn hash(&self, value: &T) -> u64 {
        compute_hash(&(self.projection)(value))
    }
}

impl<F: Clone, K> Clone for KeyComparer<F, K> {
    fn clone(&self) -> Self {
        Self {
            projection: self.projection.clone(),
            key_marker: PhantomData,
        }
    }
}

impl<F, K> fmt::Debug for KeyComparer<F, K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("KeyComparer").finish_non_exhaustive()
    }
}

// =============================================================================
// FnComparer
// =============================================================================

/// A comparer assembled from an equality function and a hash function.
///
/// Built with [`from_fn`].
#[derive(Clone)]
pub struct FnComparer<E, H> {
    equals: E,
    hash: H,
}

/// Creates a comparer from separate equality and hash functions.
///
/// The caller is responsible for keeping the two consistent.
///
/// # Examples
///
/// ```rust
/// use lambars_query::comparer::{EqualityComparer, from_fn};
///
/// let parity = from_fn(
///     |left: &i32, right: &i32| left % 2 == right % 2,
///     |value: &i32| u64::from(value.rem_euclid(2).unsigned_abs()),
/// );
/// assert!(parity.equals(&1, &7));
/// assert!(!parity.equals(&1, &2));
/// ```
#[must_use]
pub const fn from_fn<T, E, H>(equals: E, hash: H) -> FnComparer<E, H>
where
    T: ?Sized,
    E: Fn(&T, &T) -> bool,
    H: Fn(&T) -> u64,
{
    FnComparer { equals, hash }
}

impl<T, E, H> EqualityComparer<T> for FnComparer<E, H>
where
    T: ?Sized,
    E: Fn(&T, &T) -> bool,
    H: Fn(&T) -> u64,
{
    fn equals(&self, left: &T, right: &T) -> bool {
        (self.equals)(left, right)
    }

    fn hash(&self, value: &T) -> u64 {
        (self.hash)(value)
    }
}

impl<E, H> fmt::Debug for FnComparer<E, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FnComparer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Mara", "Mara", true)]
    #[case("Mara", "mara", false)]
    #[case("Ana", "Andreea", false)]
    fn test_default_comparer_uses_natural_equality(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(DefaultComparer.equals(left, right), expected);
    }

    #[rstest]
    fn test_default_comparer_hash_is_stable() {
        let value = String::from("Andreea");
        assert_eq!(DefaultComparer.hash(&value), DefaultComparer.hash(&value.clone()));
    }

    #[rstest]
    fn test_key_comparer_equal_keys_hash_equal() {
        let comparer = by_key(|value: &i32| value.abs());
        assert!(comparer.equals(&-4, &4));
        assert_eq!(comparer.hash(&-4), comparer.hash(&4));
        assert!(!comparer.equals(&-4, &5));
    }

    #[rstest]
    fn test_fn_comparer_delegates_to_functions() {
        let comparer = from_fn(
            |left: &str, right: &str| left.eq_ignore_ascii_case(right),
            |value: &str| compute_hash(&value.to_ascii_lowercase()),
        );
        assert!(comparer.equals("ANA", "ana"));
        assert_eq!(comparer.hash("ANA"), comparer.hash("ana"));
    }

    #[rstest]
    fn test_reference_comparer_delegates() {
        let comparer = DefaultComparer;
        let borrowed = &comparer;
        assert!(borrowed.equals(&1, &1));
        assert_eq!(EqualityComparer::<i32>::hash(&borrowed, &1), DefaultComparer.hash(&1));
    }
}
