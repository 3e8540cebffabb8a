use std::iter::FusedIterator;

use crate::error::{QueryError, require_argument, require_source};
use crate::sequence::{Deferred, Traversal, TraversalState};

const OPERATOR: &str = "select";

type Pending<I, F> = (Option<I>, Option<F>);
type Cursor<I, F> = (<I as IntoIterator>::IntoIter, F);

/// Sequence returned by [`select`].
pub struct Select<I: IntoIterator, F> {
    state: Traversal<Pending<I, F>, Cursor<I, F>>,
}

/// Lazily maps every element of `source` through `selector`, one output per
/// input, in source order.
///
/// # Examples
///
/// ```rust
/// use lambars_query::deferred::select;
/// use lambars_query::sequence::Traverse;
///
/// let doubled = select(Some(vec![1, 2, 3]), Some(|value: i32| value * 2));
/// assert_eq!(doubled.try_to_vec(), Ok(vec![2, 4, 6]));
/// ```
pub const fn select<I, F, R>(source: Option<I>, selector: Option<F>) -> Select<I, F>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> R,
{
    Select {
        state: Traversal::new((source, selector)),
    }
}

impl<I, F, R> Iterator for Select<I, F>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> R,
{
    type Item = Result<R, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state.advance(
            |(source, selector)| {
                let source = require_source(source, OPERATOR, "source")?;
                let selector = require_argument(selector, OPERATOR, "selector")?;
                Ok((source.into_iter(), selector))
            },
            |(elements, selector)| elements.next().map(|element| Ok(selector(element))),
        )
    }
}

impl<I, F, R> FusedIterator for Select<I, F>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> R,
{
}

impl<I, F, R> Deferred for Select<I, F>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> R,
{
    fn traversal_state(&self) -> TraversalState {
        self.state.state()
    }
}
