//! Eager operators.
//!
//! These consume their source during the call and return a concrete result.
//! An absent source or function argument is reported by the call itself,
//! before any element is pulled.
//!
//! # Examples
//!
//! ```rust
//! use lambars_query::eager::{aggregate, all, first};
//! use lambars_query::error::QueryErrorKind;
//!
//! let product = aggregate(Some([1, 2, 4, 5]), 5, Some(|left: i32, right: i32| left * right));
//! assert_eq!(product, Ok(200));
//!
//! assert_eq!(all(Some([2, 4, 6]), Some(|value: &i32| value % 2 == 0)), Ok(true));
//!
//! let missing = first(Some([2, 5, 3]), Some(|value: &i32| *value == 4));
//! assert_eq!(missing.unwrap_err().kind(), QueryErrorKind::NoMatch);
//! ```

use std::hash::Hash;

use crate::comparer::{DefaultComparer, EqualityComparer};
use crate::dictionary::Dictionary;
use crate::error::{
    DuplicateKeyError, NoMatchError, QueryError, raise, require_argument, require_source,
};

/// Left fold: starts from `seed` and applies `accumulator(acc, x)` to every
/// element in order. An empty source returns `seed` unchanged.
///
/// # Errors
///
/// Returns `NullSource` if `source` is absent and `NullArgument` if
/// `accumulator` is absent.
pub fn aggregate<I, A, F>(
    source: Option<I>,
    seed: A,
    accumulator: Option<F>,
) -> Result<A, QueryError>
where
    I: IntoIterator,
    F: FnMut(A, I::Item) -> A,
{
    let source = require_source(source, "aggregate", "source")?;
    let accumulator = require_argument(accumulator, "aggregate", "accumulator")?;
    Ok(source.into_iter().fold(seed, accumulator))
}

/// Builds a [`Dictionary`] from `key_selector(x)` to `element_selector(x)`
/// using natural key equality.
///
/// See [`to_dictionary_with`].
///
/// # Errors
///
/// Same as [`to_dictionary_with`].
pub fn to_dictionary<I, K, V, FK, FE>(
    source: Option<I>,
    key_selector: Option<FK>,
    element_selector: Option<FE>,
) -> Result<Dictionary<K, V>, QueryError>
where
    I: IntoIterator,
    K: Eq + Hash,
    FK: FnMut(&I::Item) -> K,
    FE: FnMut(I::Item) -> V,
{
    to_dictionary_with(source, key_selector, element_selector, Some(DefaultComparer))
}

/// Builds a [`Dictionary`] from `key_selector(x)` to `element_selector(x)`,
/// comparing keys with `comparer`.
///
/// Elements are processed in order. The build stops at the first element
/// whose key equals a key already inserted; later elements are not pulled.
///
/// # Errors
///
/// Returns `NullSource` if `source` is absent, `NullArgument` if a selector
/// or the comparer is absent, and `DuplicateKey` carrying the position of
/// the first element whose key is already present.
///
/// # Examples
///
/// ```rust
/// use lambars_query::comparer::DefaultComparer;
/// use lambars_query::eager::to_dictionary_with;
/// use lambars_query::error::QueryErrorKind;
///
/// let employees = vec![(1, "Andrei"), (1, "Mihai")];
/// let result = to_dictionary_with(
///     Some(employees),
///     Some(|employee: &(i32, &str)| employee.0),
///     Some(|employee: (i32, &str)| employee.1.to_string()),
///     Some(DefaultComparer),
/// );
/// assert_eq!(result.unwrap_err().kind(), QueryErrorKind::DuplicateKey);
/// ```
pub fn to_dictionary_with<I, K, V, FK, FE, C>(
    source: Option<I>,
    key_selector: Option<FK>,
    element_selector: Option<FE>,
    comparer: Option<C>,
) -> Result<Dictionary<K, V, C>, QueryError>
where
    I: IntoIterator,
    FK: FnMut(&I::Item) -> K,
    FE: FnMut(I::Item) -> V,
    C: EqualityComparer<K>,
{
    const OPERATOR: &str = "to_dictionary";

    let source = require_source(source, OPERATOR, "source")?;
    let mut key_selector = require_argument(key_selector, OPERATOR, "key_selector")?;
    let mut element_selector =
        require_argument(element_selector, OPERATOR, "element_selector")?;
    let comparer = require_argument(comparer, OPERATOR, "comparer")?;

    let mut dictionary = Dictionary::with_comparer(comparer);
    for (position, element) in source.into_iter().enumerate() {
        let key = key_selector(&element);
        let value = element_selector(element);
        if dictionary.try_insert(key, value).is_err() {
            return Err(raise(DuplicateKeyError {
                operator: OPERATOR,
                position,
            }));
        }
    }
    Ok(dictionary)
}

/// Returns `true` if every element satisfies `predicate`.
///
/// Stops at the first element that does not. An empty source is vacuously
/// `true`.
///
/// # Errors
///
/// Returns `NullSource` if `source` is absent and `NullArgument` if
/// `predicate` is absent.
pub fn all<I, P>(source: Option<I>, predicate: Option<P>) -> Result<bool, QueryError>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    let source = require_source(source, "all", "source")?;
    let mut predicate = require_argument(predicate, "all", "predicate")?;
    Ok(source.into_iter().all(|element| predicate(&element)))
}

/// Returns `true` if at least one element satisfies `predicate`.
///
/// Stops at the first match. An empty source yields `false`.
///
/// # Errors
///
/// Returns `NullSource` if `source` is absent and `NullArgument` if
/// `predicate` is absent.
pub fn any<I, P>(source: Option<I>, predicate: Option<P>) -> Result<bool, QueryError>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    let source = require_source(source, "any", "source")?;
    let mut predicate = require_argument(predicate, "any", "predicate")?;
    Ok(source.into_iter().any(|element| predicate(&element)))
}

/// Returns the first element satisfying `predicate`.
///
/// # Errors
///
/// Returns `NullSource` if `source` is absent, `NullArgument` if `predicate`
/// is absent, and `NoMatch` if no element matches (including when the
/// source is empty).
pub fn first<I, P>(source: Option<I>, predicate: Option<P>) -> Result<I::Item, QueryError>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    find_first(source, predicate, "first")?
        .ok_or_else(|| raise(NoMatchError { operator: "first" }))
}

/// Returns the first element satisfying `predicate`, or `None` when nothing
/// matches.
///
/// # Errors
///
/// Returns `NullSource` if `source` is absent and `NullArgument` if
/// `predicate` is absent.
pub fn first_or_none<I, P>(
    source: Option<I>,
    predicate: Option<P>,
) -> Result<Option<I::Item>, QueryError>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    find_first(source, predicate, "first_or_none")
}

fn find_first<I, P>(
    source: Option<I>,
    predicate: Option<P>,
    operator: &'static str,
) -> Result<Option<I::Item>, QueryError>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    let source = require_source(source, operator, "source")?;
    let mut predicate = require_argument(predicate, operator, "predicate")?;
    Ok(source.into_iter().find(|element| predicate(element)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NullArgumentError, NullSourceError, QueryErrorKind};
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    #[case(vec![], 7, 7)]
    #[case(vec![1, 2, 3], 0, 6)]
    #[case(vec![10], -10, 0)]
    fn test_aggregate_sums(#[case] elements: Vec<i32>, #[case] seed: i32, #[case] expected: i32) {
        let result = aggregate(Some(elements), seed, Some(|left: i32, right: i32| left + right));
        assert_eq!(result, Ok(expected));
    }

    #[rstest]
    fn test_aggregate_folds_left_to_right() {
        let result = aggregate(
            Some(vec!["b", "c"]),
            String::from("a"),
            Some(|accumulated: String, element: &str| accumulated + element),
        );
        assert_eq!(result, Ok("abc".to_string()));
    }

    #[rstest]
    fn test_aggregate_absent_accumulator_faults_immediately() {
        let result = aggregate(Some(vec![1]), 0, None::<fn(i32, i32) -> i32>);
        assert_eq!(
            result,
            Err(QueryError::NullArgument(NullArgumentError {
                operator: "aggregate",
                parameter: "accumulator",
            }))
        );
    }

    #[rstest]
    fn test_to_dictionary_stops_at_duplicate() {
        let pulled = Cell::new(0);
        let source = [1, 2, 2, 3].into_iter().inspect(|_| pulled.set(pulled.get() + 1));
        let result = to_dictionary(
            Some(source),
            Some(|value: &i32| *value),
            Some(|value: i32| value * 100),
        );
        assert_eq!(
            result.unwrap_err(),
            QueryError::DuplicateKey(DuplicateKeyError {
                operator: "to_dictionary",
                position: 2,
            })
        );
        assert_eq!(pulled.get(), 3);
    }

    #[rstest]
    fn test_to_dictionary_absent_element_selector() {
        let result = to_dictionary(
            Some(vec![1]),
            Some(|value: &i32| *value),
            None::<fn(i32) -> i32>,
        );
        assert_eq!(result.unwrap_err().kind(), QueryErrorKind::NullArgument);
    }

    #[rstest]
    fn test_all_short_circuits() {
        let calls = Cell::new(0);
        let result = all(
            Some(vec![2, 3, 4]),
            Some(|value: &i32| {
                calls.set(calls.get() + 1);
                value % 2 == 0
            }),
        );
        assert_eq!(result, Ok(false));
        assert_eq!(calls.get(), 2);
    }

    #[rstest]
    fn test_all_empty_is_true() {
        assert_eq!(all(Some(Vec::<i32>::new()), Some(|_: &i32| false)), Ok(true));
    }

    #[rstest]
    fn test_any_short_circuits() {
        let calls = Cell::new(0);
        let result = any(
            Some(vec![1, 5, 7]),
            Some(|value: &i32| {
                calls.set(calls.get() + 1);
                *value == 5
            }),
        );
        assert_eq!(result, Ok(true));
        assert_eq!(calls.get(), 2);
    }

    #[rstest]
    fn test_any_empty_is_false() {
        assert_eq!(any(Some(Vec::<i32>::new()), Some(|_: &i32| true)), Ok(false));
    }

    #[rstest]
    fn test_first_absent_source_is_not_no_match() {
        let result = first(None::<Vec<i32>>, Some(|value: &i32| *value == 4));
        assert_eq!(
            result,
            Err(QueryError::NullSource(NullSourceError {
                operator: "first",
                parameter: "source",
            }))
        );
    }

    #[rstest]
    fn test_first_or_none_returns_none_without_fault() {
        let missing = first_or_none(Some(vec![2, 5, 3]), Some(|value: &i32| *value == 4));
        assert_eq!(missing, Ok(None));

        let found = first_or_none(Some(vec![2, 5, 3]), Some(|value: &i32| *value > 2));
        assert_eq!(found, Ok(Some(5)));
    }
}
