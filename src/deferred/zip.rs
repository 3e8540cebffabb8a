use std::iter::FusedIterator;

use crate::error::{QueryError, require_argument, require_source};
use crate::sequence::{Deferred, Traversal, TraversalState};

const OPERATOR: &str = "zip";

type Pending<A, B, F> = (Option<A>, Option<B>, Option<F>);
type Cursor<A, B, F> = (
    <A as IntoIterator>::IntoIter,
    <B as IntoIterator>::IntoIter,
    F,
);

/// Sequence returned by [`zip`].
pub struct Zip<A: IntoIterator, B: IntoIterator, F> {
    state: Traversal<Pending<A, B, F>, Cursor<A, B, F>>,
}

/// Lazily combines the elements of `first` and `second` pairwise.
///
/// The result is as long as the shorter input; the surplus elements of the
/// longer one are dropped without a fault. `first` is checked before
/// `second`, so an absent `first` is reported whatever the state of `second`.
///
/// # Examples
///
/// ```rust
/// use lambars_query::deferred::zip;
/// use lambars_query::sequence::Traverse;
///
/// let numbers = [1, 2, 3, 4];
/// let words = ["one", "two", "three", "nine", "six"];
/// let pairs = zip(
///     Some(numbers),
///     Some(words),
///     Some(|number: i32, word: &str| format!("{number} {word}")),
/// );
///
/// let pairs = pairs.try_to_vec().unwrap();
/// assert_eq!(pairs.len(), 4);
/// assert!(pairs.contains(&"3 three".to_string()));
/// ```
pub const fn zip<A, B, F, R>(
    first: Option<A>,
    second: Option<B>,
    combine: Option<F>,
) -> Zip<A, B, F>
where
    A: IntoIterator,
    B: IntoIterator,
    F: FnMut(A::Item, B::Item) -> R,
{
    Zip {
        state: Traversal::new((first, second, combine)),
    }
}

impl<A, B, F, R> Iterator for Zip<A, B, F>
where
    A: IntoIterator,
    B: IntoIterator,
    F: FnMut(A::Item, B::Item) -> R,
{
    type Item = Result<R, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state.advance(
            |(first, second, combine)| {
                let first = require_source(first, OPERATOR, "first")?;
                let second = require_source(second, OPERATOR, "second")?;
                let combine = require_argument(combine, OPERATOR, "combine")?;
                Ok((first.into_iter(), second.into_iter(), combine))
            },
            |(first, second, combine)| {
                let left = first.next()?;
                let right = second.next()?;
                Some(Ok(combine(left, right)))
            },
        )
    }
}

impl<A, B, F, R> FusedIterator for Zip<A, B, F>
where
    A: IntoIterator,
    B: IntoIterator,
    F: FnMut(A::Item, B::Item) -> R,
{
}

impl<A, B, F, R> Deferred for Zip<A, B, F>
where
    A: IntoIterator,
    B: IntoIterator,
    F: FnMut(A::Item, B::Item) -> R,
{
    fn traversal_state(&self) -> TraversalState {
        self.state.state()
    }
}
