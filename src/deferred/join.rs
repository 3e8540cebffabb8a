use std::iter::FusedIterator;

use crate::comparer::{DefaultComparer, EqualityComparer};
use crate::dictionary::Dictionary;
use crate::error::{QueryError, require_argument, require_source};
use crate::sequence::{Deferred, Traversal, TraversalState};

const OPERATOR: &str = "join";

/// Arguments captured by [`join_with`] until the traversal begins.
struct JoinArguments<O, N, FO, FI, FR, C> {
    outer: Option<O>,
    inner: Option<N>,
    outer_key: Option<FO>,
    inner_key: Option<FI>,
    result_selector: Option<FR>,
    comparer: Option<C>,
}

/// Cursor over the outer sequence, matching each element against the
/// grouped inner sequence.
struct Matcher<OI: Iterator, NI, FO, FR, K, C> {
    outer: OI,
    outer_key: FO,
    result_selector: FR,
    lookup: Dictionary<K, Vec<NI>, C>,
    /// Outer element being matched, its group index and the next member.
    current: Option<(OI::Item, usize, usize)>,
}

type JoinCursor<O, N, FO, FR, K, C> = Matcher<
    <O as IntoIterator>::IntoIter,
    <N as IntoIterator>::Item,
    FO,
    FR,
    K,
    C,
>;

/// Sequence returned by [`join`] and [`join_with`].
pub struct Join<O, N, FO, FI, FR, K, C = DefaultComparer>
where
    O: IntoIterator,
    N: IntoIterator,
{
    state: Traversal<JoinArguments<O, N, FO, FI, FR, C>, JoinCursor<O, N, FO, FR, K, C>>,
}

/// Lazily inner-joins `outer` and `inner` on keys compared by natural
/// equality.
///
/// See [`join_with`].
///
/// # Examples
///
/// ```rust
/// use lambars_query::deferred::join;
/// use lambars_query::sequence::Traverse;
///
/// let people = vec!["Magnus", "Terry", "Charlotte"];
/// let pets = vec![("Barley", "Terry"), ("Boots", "Terry"), ("Daisy", "Magnus")];
///
/// let owners = join(
///     Some(people),
///     Some(pets),
///     Some(|person: &&str| person.to_string()),
///     Some(|pet: &(&str, &str)| pet.1.to_string()),
///     Some(|person: &&str, pet: &(&str, &str)| format!("{person}: {}", pet.0)),
/// );
/// assert_eq!(
///     owners.try_to_vec(),
///     Ok(vec![
///         "Magnus: Daisy".to_string(),
///         "Terry: Barley".to_string(),
///         "Terry: Boots".to_string(),
///     ])
/// );
/// ```
pub const fn join<O, N, FO, FI, FR, K, R>(
    outer: Option<O>,
    inner: Option<N>,
    outer_key: Option<FO>,
    inner_key: Option<FI>,
    result_selector: Option<FR>,
) -> Join<O, N, FO, FI, FR, K>
where
    O: IntoIterator,
    N: IntoIterator,
    K: Eq + std::hash::Hash,
    FO: FnMut(&O::Item) -> K,
    FI: FnMut(&N::Item) -> K,
    FR: FnMut(&O::Item, &N::Item) -> R,
{
    join_with(
        outer,
        inner,
        outer_key,
        inner_key,
        result_selector,
        Some(DefaultComparer),
    )
}

/// Lazily inner-joins `outer` and `inner` on keys compared by `comparer`.
///
/// When the traversal begins, `inner` is drained into a lookup from
/// `inner_key(y)` to the inner elements with that key, in their original
/// order. Each outer element `x` then yields `result_selector(x, y)` for every
/// `y` whose key equals `outer_key(x)`. Outer elements without a match yield
/// nothing.
///
/// Arguments are checked on the first pull in the order `outer`, `inner`,
/// `outer_key`, `inner_key`, `result_selector`, `comparer`.
pub const fn join_with<O, N, FO, FI, FR, K, C, R>(
    outer: Option<O>,
    inner: Option<N>,
    outer_key: Option<FO>,
    inner_key: Option<FI>,
    result_selector: Option<FR>,
    comparer: Option<C>,
) -> Join<O, N, FO, FI, FR, K, C>
where
    O: IntoIterator,
    N: IntoIterator,
    FO: FnMut(&O::Item) -> K,
    FI: FnMut(&N::Item) -> K,
    FR: FnMut(&O::Item, &N::Item) -> R,
    C: EqualityComparer<K>,
{
    Join {
        state: Traversal::new(JoinArguments {
            outer,
            inner,
            outer_key,
            inner_key,
            result_selector,
            comparer,
        }),
    }
}

impl<O, N, FO, FI, FR, K, C, R> Iterator for Join<O, N, FO, FI, FR, K, C>
where
    O: IntoIterator,
    N: IntoIterator,
    FO: FnMut(&O::Item) -> K,
    FI: FnMut(&N::Item) -> K,
    FR: FnMut(&O::Item, &N::Item) -> R,
    C: EqualityComparer<K>,
{
    type Item = Result<R, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state.advance(
            |arguments| {
                let outer = require_source(arguments.outer, OPERATOR, "outer")?;
                let inner = require_source(arguments.inner, OPERATOR, "inner")?;
                let outer_key = require_argument(arguments.outer_key, OPERATOR, "outer_key")?;
                let mut inner_key = require_argument(arguments.inner_key, OPERATOR, "inner_key")?;
                let result_selector =
                    require_argument(arguments.result_selector, OPERATOR, "result_selector")?;
                let comparer = require_argument(arguments.comparer, OPERATOR, "comparer")?;

                let mut lookup = Dictionary::with_comparer(comparer);
                for element in inner {
                    let key = inner_key(&element);
                    lookup.get_or_insert_with(key, Vec::new).push(element);
                }

                Ok(Matcher {
                    outer: outer.into_iter(),
                    outer_key,
                    result_selector,
                    lookup,
                    current: None,
                })
            },
            |cursor| loop {
                if let Some((element, group, position)) = &mut cursor.current {
                    let matched = cursor
                        .lookup
                        .value_at(*group)
                        .and_then(|members| members.get(*position));
                    if let Some(matched) = matched {
                        *position += 1;
                        return Some(Ok((cursor.result_selector)(&*element, matched)));
                    }
                    cursor.current = None;
                }

                let element = cursor.outer.next()?;
                let key = (cursor.outer_key)(&element);
                if let Some(group) = cursor.lookup.position(&key) {
                    cursor.current = Some((element, group, 0));
                }
            },
        )
    }
}

impl<O, N, FO, FI, FR, K, C, R> FusedIterator for Join<O, N, FO, FI, FR, K, C>
where
    O: IntoIterator,
    N: IntoIterator,
    FO: FnMut(&O::Item) -> K,
    FI: FnMut(&N::Item) -> K,
    FR: FnMut(&O::Item, &N::Item) -> R,
    C: EqualityComparer<K>,
{
}

impl<O, N, FO, FI, FR, K, C, R> Deferred for Join<O, N, FO, FI, FR, K, C>
where
    O: IntoIterator,
    N: IntoIterator,
    FO: FnMut(&O::Item) -> K,
    FI: FnMut(&N::Item) -> K,
    FR: FnMut(&O::Item, &N::Item) -> R,
    C: EqualityComparer<K>,
{
    fn traversal_state(&self) -> TraversalState {
        self.state.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::by_key;
    use crate::error::{NullSourceError, QueryErrorKind};
    use crate::sequence::Traverse;
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    fn test_join_emits_matches_in_outer_then_inner_order() {
        let query = join(
            Some(vec![2, 1, 3]),
            Some(vec![(1, 'a'), (2, 'b'), (1, 'c')]),
            Some(|key: &i32| *key),
            Some(|pair: &(i32, char)| pair.0),
            Some(|key: &i32, pair: &(i32, char)| (*key, pair.1)),
        );
        assert_eq!(
            query.try_to_vec(),
            Ok(vec![(2, 'b'), (1, 'a'), (1, 'c')])
        );
    }

    #[rstest]
    fn test_join_builds_lookup_only_when_pulled() {
        let inner_calls = Cell::new(0);
        let mut query = join(
            Some(vec![1]),
            Some(vec![1, 1]),
            Some(|value: &i32| *value),
            Some(|value: &i32| {
                inner_calls.set(inner_calls.get() + 1);
                *value
            }),
            Some(|left: &i32, right: &i32| left + right),
        );
        assert_eq!(inner_calls.get(), 0);
        assert_eq!(query.next(), Some(Ok(2)));
        assert_eq!(inner_calls.get(), 2);
    }

    #[rstest]
    fn test_join_with_uses_supplied_comparer() {
        let query = join_with(
            Some(vec!["MAGNUS", "terry"]),
            Some(vec![("Daisy", "magnus"), ("Boots", "Terry")]),
            Some(|person: &&str| person.to_string()),
            Some(|pet: &(&str, &str)| pet.1.to_string()),
            Some(|_: &&str, pet: &(&str, &str)| pet.0.to_string()),
            Some(by_key(|name: &String| name.to_lowercase())),
        );
        assert_eq!(
            query.try_to_vec(),
            Ok(vec!["Daisy".to_string(), "Boots".to_string()])
        );
    }

    #[rstest]
    fn test_join_absent_inner_faults_on_pull() {
        let query = join(
            Some(vec![1]),
            None::<Vec<i32>>,
            Some(|value: &i32| *value),
            Some(|value: &i32| *value),
            Some(|left: &i32, right: &i32| left + right),
        );
        assert_eq!(query.traversal_state(), TraversalState::Unstarted);
        assert_eq!(
            query.try_count(),
            Err(QueryError::NullSource(NullSourceError {
                operator: "join",
                parameter: "inner",
            }))
        );
    }

    #[rstest]
    fn test_join_absent_comparer_faults_on_pull() {
        let query = join_with(
            Some(vec![1]),
            Some(vec![1]),
            Some(|value: &i32| *value),
            Some(|value: &i32| *value),
            Some(|left: &i32, right: &i32| left + right),
            None::<DefaultComparer>,
        );
        let error = query.try_count().unwrap_err();
        assert_eq!(error.kind(), QueryErrorKind::NullArgument);
    }
}
