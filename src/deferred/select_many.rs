use std::iter::FusedIterator;

use crate::error::{NullSourceError, QueryError, raise, require_argument, require_source};
use crate::sequence::{Deferred, Traversal, TraversalState};

const OPERATOR: &str = "select_many";

/// Cursor over the outer sequence and the inner sequence being drained.
struct Flatten<O, F, N> {
    outer: O,
    selector: F,
    inner: Option<N>,
}

type Pending<I, F> = (Option<I>, Option<F>);

/// Sequence returned by [`select_many`].
pub struct SelectMany<I: IntoIterator, F, J: IntoIterator> {
    state: Traversal<Pending<I, F>, Flatten<I::IntoIter, F, J::IntoIter>>,
}

/// Lazily maps every element of `source` to a sequence and concatenates those
/// sequences in source order.
///
/// An inner sequence of `None` is a fault, raised when the traversal reaches
/// the element that produced it. Elements before it are still yielded.
///
/// # Examples
///
/// ```rust
/// use lambars_query::deferred::select_many;
/// use lambars_query::sequence::Traverse;
///
/// let ranges = select_many(Some(vec![1, 0, 2]), Some(|count: u32| Some(0..count)));
/// assert_eq!(ranges.try_to_vec(), Ok(vec![0, 0, 1]));
/// ```
pub const fn select_many<I, F, J>(
    source: Option<I>,
    selector: Option<F>,
) -> SelectMany<I, F, J>
where
    I: IntoIterator,
    J: IntoIterator,
    F: FnMut(I::Item) -> Option<J>,
{
    SelectMany {
        state: Traversal::new((source, selector)),
    }
}

impl<I, F, J> Iterator for SelectMany<I, F, J>
where
    I: IntoIterator,
    J: IntoIterator,
    F: FnMut(I::Item) -> Option<J>,
{
    type Item = Result<J::Item, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state.advance(
            |(source, selector)| {
                let source = require_source(source, OPERATOR, "source")?;
                let selector = require_argument(selector, OPERATOR, "selector")?;
                Ok(Flatten {
                    outer: source.into_iter(),
                    selector,
                    inner: None,
                })
            },
            |cursor| loop {
                if let Some(inner) = &mut cursor.inner {
                    if let Some(element) = inner.next() {
                        return Some(Ok(element));
                    }
                    cursor.inner = None;
                }

                let element = cursor.outer.next()?;
                match (cursor.selector)(element) {
                    Some(inner) => cursor.inner = Some(inner.into_iter()),
                    None => {
                        return Some(Err(raise(NullSourceError {
                            operator: OPERATOR,
                            parameter: "inner",
                        })));
                    }
                }
            },
        )
    }
}

impl<I, F, J> FusedIterator for SelectMany<I, F, J>
where
    I: IntoIterator,
    J: IntoIterator,
    F: FnMut(I::Item) -> Option<J>,
{
}

impl<I, F, J> Deferred for SelectMany<I, F, J>
where
    I: IntoIterator,
    J: IntoIterator,
    F: FnMut(I::Item) -> Option<J>,
{
    fn traversal_state(&self) -> TraversalState {
        self.state.state()
    }
}
