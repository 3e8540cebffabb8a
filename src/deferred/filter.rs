use std::iter::FusedIterator;

use crate::error::{QueryError, require_argument, require_source};
use crate::sequence::{Deferred, Traversal, TraversalState};

const OPERATOR: &str = "where";

type Pending<I, P> = (Option<I>, Option<P>);
type Cursor<I, P> = (<I as IntoIterator>::IntoIter, P);

/// Sequence returned by [`filter`].
pub struct Where<I: IntoIterator, P> {
    state: Traversal<Pending<I, P>, Cursor<I, P>>,
}

/// Lazily keeps the elements of `source` for which `predicate` holds,
/// preserving their relative order.
///
/// The predicate runs once per element, at the moment that element is
/// pulled from the source.
///
/// # Examples
///
/// ```rust
/// use lambars_query::deferred::filter;
/// use lambars_query::sequence::Traverse;
///
/// let odd = filter(Some(1..=5), Some(|value: &i32| value % 2 == 1));
/// assert_eq!(odd.try_to_vec(), Ok(vec![1, 3, 5]));
/// ```
#[doc(alias = "where")]
pub const fn filter<I, P>(source: Option<I>, predicate: Option<P>) -> Where<I, P>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    Where {
        state: Traversal::new((source, predicate)),
    }
}

impl<I, P> Iterator for Where<I, P>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    type Item = Result<I::Item, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state.advance(
            |(source, predicate)| {
                let source = require_source(source, OPERATOR, "source")?;
                let predicate = require_argument(predicate, OPERATOR, "predicate")?;
                Ok((source.into_iter(), predicate))
            },
            |(elements, predicate)| elements.find(|element| predicate(element)).map(Ok),
        )
    }
}

impl<I, P> FusedIterator for Where<I, P>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
}

impl<I, P> Deferred for Where<I, P>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    fn traversal_state(&self) -> TraversalState {
        self.state.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryErrorKind;
    use crate::sequence::Traverse;
    use rstest::rstest;
    use std::cell::RefCell;

    #[rstest]
    fn test_filter_evaluates_predicate_as_elements_are_pulled() {
        let seen = RefCell::new(Vec::new());
        let mut query = filter(
            Some(vec![1, 2, 3, 4]),
            Some(|value: &i32| {
                seen.borrow_mut().push(*value);
                value % 2 == 0
            }),
        );

        assert!(seen.borrow().is_empty());
        assert_eq!(query.next(), Some(Ok(2)));
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(query.next(), Some(Ok(4)));
        assert_eq!(query.next(), None);
        assert_eq!(*seen.borrow(), vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn test_filter_absent_source_faults_on_pull() {
        let query = filter(None::<Vec<i32>>, Some(|_: &i32| true));
        let error = query.try_count().unwrap_err();
        assert_eq!(error.kind(), QueryErrorKind::NullSource);
        assert_eq!(error.operator(), "where");
    }
}
