//! Lazy sequence core shared by every deferred operator.
//!
//! A deferred operator captures its arguments and returns immediately. The
//! arguments are validated only when the first element is pulled, so an
//! absent source surfaces as the first item of the traversal rather than
//! as a failure of the operator call.
//!
//! # Examples
//!
//! ```rust
//! use lambars_query::deferred::select;
//! use lambars_query::error::QueryErrorKind;
//! use lambars_query::sequence::{Deferred, Traverse, TraversalState};
//!
//! // Building the query never fails.
//! let query = select(None::<Vec<i32>>, Some(|value: i32| value * 2));
//! assert_eq!(query.traversal_state(), TraversalState::Unstarted);
//!
//! // Running it does.
//! let error = query.try_count().unwrap_err();
//! assert_eq!(error.kind(), QueryErrorKind::NullSource);
//! ```

use crate::error::QueryError;

/// Observable phase of a deferred sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalState {
    /// Arguments are captured but nothing has been validated or pulled.
    Unstarted,
    /// Arguments were valid and elements are being produced.
    Traversing,
    /// The sequence ran out or faulted. Every further pull yields `None`.
    Exhausted,
}

/// Common interface of the sequences returned by deferred operators.
pub trait Deferred: Iterator {
    /// Returns the phase this traversal is currently in.
    fn traversal_state(&self) -> TraversalState;
}

/// Single-pass state machine driving a deferred operator.
///
/// `P` holds the captured, not yet validated arguments. `R` is the cursor
/// built from them once the traversal begins.
pub(crate) enum Traversal<P, R> {
    Unstarted(P),
    Traversing(R),
    Exhausted,
}

impl<P, R> Traversal<P, R> {
    pub(crate) const fn new(pending: P) -> Self {
        Self::Unstarted(pending)
    }

    pub(crate) const fn state(&self) -> TraversalState {
        match self {
            Self::Unstarted(_) => TraversalState::Unstarted,
            Self::Traversing(_) => TraversalState::Traversing,
            Self::Exhausted => TraversalState::Exhausted,
        }
    }

    /// Pulls the next element.
    ///
    /// On the first call `begin` turns the pending arguments into a cursor;
    /// if it fails the fault is returned and the traversal is exhausted.
    /// A fault returned by `pull` also exhausts the traversal.
    pub(crate) fn advance<T, B, N>(&mut self, begin: B, pull: N) -> Option<Result<T, QueryError>>
    where
        B: FnOnce(P) -> Result<R, QueryError>,
        N: FnOnce(&mut R) -> Option<Result<T, QueryError>>,
    {
        if matches!(self, Self::Unstarted(_)) {
            match std::mem::replace(self, Self::Exhausted) {
                Self::Unstarted(pending) => match begin(pending) {
                    Ok(cursor) => *self = Self::Traversing(cursor),
                    Err(error) => return Some(Err(error)),
                },
                other => *self = other,
            }
        }

        let Self::Traversing(cursor) = self else {
            return None;
        };
        let pulled = pull(cursor);
        if !matches!(pulled, Some(Ok(_))) {
            *self = Self::Exhausted;
        }
        pulled
    }
}

// =============================================================================
// Traverse
// =============================================================================

/// Consumers for fallible sequences.
///
/// Each method drives the sequence until it ends or yields a fault, and
/// returns the first fault it meets.
///
/// # Examples
///
/// ```rust
/// use lambars_query::deferred::filter;
/// use lambars_query::sequence::Traverse;
///
/// let evens = filter(Some(1..=6), Some(|value: &i32| value % 2 == 0));
/// assert_eq!(evens.try_to_vec(), Ok(vec![2, 4, 6]));
/// ```
pub trait Traverse<T>: Iterator<Item = Result<T, QueryError>> + Sized {
    /// Counts the elements of the sequence.
    ///
    /// # Errors
    ///
    /// Returns the first fault yielded by the sequence.
    fn try_count(mut self) -> Result<usize, QueryError> {
        self.try_fold(0, |count, element| element.map(|_| count + 1))
    }

    /// Collects the elements of the sequence into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns the first fault yielded by the sequence.
    fn try_to_vec(self) -> Result<Vec<T>, QueryError> {
        self.collect()
    }

    /// Returns `true` as soon as an element equal to `value` is pulled.
    ///
    /// # Errors
    ///
    /// Returns the first fault yielded before a match is found.
    fn try_contains(self, value: &T) -> Result<bool, QueryError>
    where
        T: PartialEq,
    {
        for element in self {
            if element? == *value {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<T, I> Traverse<T> for I where I: Iterator<Item = Result<T, QueryError>> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NullSourceError, QueryErrorKind};
    use rstest::rstest;

    fn counting_traversal(
        pending: Option<Vec<i32>>,
    ) -> Traversal<Option<Vec<i32>>, std::vec::IntoIter<i32>> {
        Traversal::new(pending)
    }

    fn begin(pending: Option<Vec<i32>>) -> Result<std::vec::IntoIter<i32>, QueryError> {
        pending.map(IntoIterator::into_iter).ok_or_else(|| {
            QueryError::from(NullSourceError {
                operator: "test",
                parameter: "source",
            })
        })
    }

    #[rstest]
    fn test_traversal_starts_unstarted() {
        let traversal = counting_traversal(None);
        assert_eq!(traversal.state(), TraversalState::Unstarted);
    }

    #[rstest]
    fn test_traversal_moves_through_phases() {
        let mut traversal = counting_traversal(Some(vec![1]));

        let first = traversal.advance(begin, |cursor| cursor.next().map(Ok));
        assert_eq!(first, Some(Ok(1)));
        assert_eq!(traversal.state(), TraversalState::Traversing);

        let second = traversal.advance(begin, |cursor| cursor.next().map(Ok));
        assert_eq!(second, None);
        assert_eq!(traversal.state(), TraversalState::Exhausted);
    }

    #[rstest]
    fn test_traversal_fault_is_yielded_once() {
        let mut traversal = counting_traversal(None);

        let first: Option<Result<i32, QueryError>> =
            traversal.advance(begin, |cursor| cursor.next().map(Ok));
        assert_eq!(
            first.map(|result| result.map_err(|error| error.kind())),
            Some(Err(QueryErrorKind::NullSource))
        );
        assert_eq!(traversal.state(), TraversalState::Exhausted);

        let second: Option<Result<i32, QueryError>> =
            traversal.advance(begin, |cursor| cursor.next().map(Ok));
        assert_eq!(second, None);
    }

    #[rstest]
    fn test_try_count_stops_at_fault() {
        let fault = QueryError::from(NullSourceError {
            operator: "test",
            parameter: "inner",
        });
        let elements = vec![Ok(1), Err(fault.clone()), Ok(3)];
        assert_eq!(elements.into_iter().try_count(), Err(fault));
    }

    #[rstest]
    #[case(vec![1, 2, 3], 2, true)]
    #[case(vec![1, 2, 3], 5, false)]
    #[case(vec![], 1, false)]
    fn test_try_contains(#[case] elements: Vec<i32>, #[case] value: i32, #[case] expected: bool) {
        let sequence = elements.into_iter().map(Ok::<i32, QueryError>);
        assert_eq!(sequence.try_contains(&value), Ok(expected));
    }
}
