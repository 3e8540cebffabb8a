use std::iter::FusedIterator;

use crate::comparer::EqualityComparer;
use crate::dictionary::Dictionary;
use crate::error::{QueryError, require_argument, require_source};
use crate::sequence::{Deferred, Traversal, TraversalState};

const OPERATOR: &str = "distinct";

type Pending<I, C> = (Option<I>, Option<C>);

/// Elements still to read and the classes already yielded.
type Cursor<I, C> = (
    <I as IntoIterator>::IntoIter,
    Dictionary<<I as IntoIterator>::Item, (), C>,
);

/// Sequence returned by [`distinct`].
pub struct Distinct<I: IntoIterator, C> {
    state: Traversal<Pending<I, C>, Cursor<I, C>>,
}

/// Lazily yields the first occurrence of each element of `source`, dropping
/// later elements that `comparer` considers equal to one already yielded.
///
/// Every yielded element is cloned into a seen-set that grows for the whole
/// traversal.
///
/// # Examples
///
/// ```rust
/// use lambars_query::comparer::DefaultComparer;
/// use lambars_query::deferred::distinct;
/// use lambars_query::sequence::Traverse;
///
/// let names = ["Mara", "Mara", "Ana", "Andreea"];
/// let unique = distinct(Some(names), Some(DefaultComparer));
/// assert_eq!(unique.try_to_vec(), Ok(vec!["Mara", "Ana", "Andreea"]));
/// ```
pub const fn distinct<I, C>(source: Option<I>, comparer: Option<C>) -> Distinct<I, C>
where
    I: IntoIterator,
    I::Item: Clone,
    C: EqualityComparer<I::Item>,
{
    Distinct {
        state: Traversal::new((source, comparer)),
    }
}

impl<I, C> Iterator for Distinct<I, C>
where
    I: IntoIterator,
    I::Item: Clone,
    C: EqualityComparer<I::Item>,
{
    type Item = Result<I::Item, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state.advance(
            |(source, comparer)| {
                let source = require_source(source, OPERATOR, "source")?;
                let comparer = require_argument(comparer, OPERATOR, "comparer")?;
                Ok((source.into_iter(), Dictionary::with_comparer(comparer)))
            },
            |(elements, seen)| elements.find(|element| seen.insert_new(element)).map(Ok),
        )
    }
}

impl<I, C> FusedIterator for Distinct<I, C>
where
    I: IntoIterator,
    I::Item: Clone,
    C: EqualityComparer<I::Item>,
{
}

impl<I, C> Deferred for Distinct<I, C>
where
    I: IntoIterator,
    I::Item: Clone,
    C: EqualityComparer<I::Item>,
{
    fn traversal_state(&self) -> TraversalState {
        self.state.state()
    }
}
