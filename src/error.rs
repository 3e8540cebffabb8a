//! Fault types raised by the query operators.
//!
//! Every operator reports failures through [`QueryError`]. Eager operators
//! return it from the call itself; deferred operators yield it as the first
//! item pulled from the returned sequence.

use std::fmt;

/// A required input sequence was absent.
///
/// # Examples
///
/// ```rust
/// use lambars_query::error::NullSourceError;
///
/// let error = NullSourceError {
///     operator: "select",
///     parameter: "source",
/// };
/// assert_eq!(format!("{error}"), "select: sequence `source` is absent");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullSourceError {
    /// The operator that required the sequence.
    pub operator: &'static str,
    /// The name of the absent parameter.
    pub parameter: &'static str,
}

impl fmt::Display for NullSourceError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}: sequence `{}` is absent",
            self.operator, self.parameter
        )
    }
}

impl std::error::Error for NullSourceError {}

/// A required function argument (selector, predicate, comparer) was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullArgumentError {
    /// The operator that required the argument.
    pub operator: &'static str,
    /// The name of the absent parameter.
    pub parameter: &'static str,
}

impl fmt::Display for NullArgumentError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}: argument `{}` is absent",
            self.operator, self.parameter
        )
    }
}

impl std::error::Error for NullArgumentError {}

/// Two elements produced keys that compare equal while building a dictionary.
///
/// `position` is the zero-based index of the element whose key collided.
/// No element after it has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError {
    /// The operator that was building the dictionary.
    pub operator: &'static str,
    /// Index of the offending element in the source sequence.
    pub position: usize,
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}: element at position {} has a key that is already present",
            self.operator, self.position
        )
    }
}

impl std::error::Error for DuplicateKeyError {}

/// No element satisfied the predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMatchError {
    /// The operator that searched the sequence.
    pub operator: &'static str,
}

impl fmt::Display for NoMatchError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}: no element satisfies the predicate",
            self.operator
        )
    }
}

impl std::error::Error for NoMatchError {}

/// The kind of a [`QueryError`], without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryErrorKind {
    /// See [`NullSourceError`].
    NullSource,
    /// See [`NullArgumentError`].
    NullArgument,
    /// See [`DuplicateKeyError`].
    DuplicateKey,
    /// See [`NoMatchError`].
    NoMatch,
}

/// Unified fault type for every operator in this crate.
///
/// # Examples
///
/// ```rust
/// use lambars_query::error::{NoMatchError, QueryError, QueryErrorKind};
///
/// let error = QueryError::from(NoMatchError { operator: "first" });
/// assert_eq!(error.kind(), QueryErrorKind::NoMatch);
/// assert_eq!(format!("{error}"), "first: no element satisfies the predicate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A required input sequence was absent.
    NullSource(NullSourceError),
    /// A required function argument was absent.
    NullArgument(NullArgumentError),
    /// Two elements mapped to equal keys.
    DuplicateKey(DuplicateKeyError),
    /// No element satisfied the predicate.
    NoMatch(NoMatchError),
}

impl QueryError {
    /// Returns the kind of this fault.
    pub const fn kind(&self) -> QueryErrorKind {
        match self {
            Self::NullSource(_) => QueryErrorKind::NullSource,
            Self::NullArgument(_) => QueryErrorKind::NullArgument,
            Self::DuplicateKey(_) => QueryErrorKind::DuplicateKey,
            Self::NoMatch(_) => QueryErrorKind::NoMatch,
        }
    }

    /// Returns the name of the operator that raised this fault.
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::NullSource(error) => error.operator,
            Self::NullArgument(error) => error.operator,
            Self::DuplicateKey(error) => error.operator,
            Self::NoMatch(error) => error.operator,
        }
    }

    /// Returns the name of the absent parameter, for `NullSource` and
    /// `NullArgument` faults.
    pub const fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::NullSource(error) => Some(error.parameter),
            Self::NullArgument(error) => Some(error.parameter),
            Self::DuplicateKey(_) | Self::NoMatch(_) => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullSource(error) => write!(formatter, "{error}"),
            Self::NullArgument(error) => write!(formatter, "{error}"),
            Self::DuplicateKey(error) => write!(formatter, "{error}"),
            Self::NoMatch(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NullSource(error) => Some(error),
            Self::NullArgument(error) => Some(error),
            Self::DuplicateKey(error) => Some(error),
            Self::NoMatch(error) => Some(error),
        }
    }
}

impl From<NullSourceError> for QueryError {
    fn from(error: NullSourceError) -> Self {
        Self::NullSource(error)
    }
}

impl From<NullArgumentError> for QueryError {
    fn from(error: NullArgumentError) -> Self {
        Self::NullArgument(error)
    }
}

impl From<DuplicateKeyError> for QueryError {
    fn from(error: DuplicateKeyError) -> Self {
        Self::DuplicateKey(error)
    }
}

impl From<NoMatchError> for QueryError {
    fn from(error: NoMatchError) -> Self {
        Self::NoMatch(error)
    }
}

static_assertions::assert_impl_all!(QueryError: Send, Sync, std::error::Error);

// =============================================================================
// Raising faults
// =============================================================================

/// Converts a fault into a [`QueryError`], emitting a trace event when the
/// `tracing` feature is enabled.
pub(crate) fn raise(error: impl Into<QueryError>) -> QueryError {
    let error = error.into();
    #[cfg(feature = "tracing")]
    tracing::debug!(
        operator = error.operator(),
        parameter = error.parameter(),
        kind = ?error.kind(),
        "query fault: {error}"
    );
    error
}

/// Unwraps a sequence argument or reports it as absent.
pub(crate) fn require_source<I>(
    source: Option<I>,
    operator: &'static str,
    parameter: &'static str,
) -> Result<I, QueryError> {
    source.ok_or_else(|| raise(NullSourceError { operator, parameter }))
}

/// Unwraps a function argument or reports it as absent.
pub(crate) fn require_argument<F>(
    argument: Option<F>,
    operator: &'static str,
    parameter: &'static str,
) -> Result<F, QueryError> {
    argument.ok_or_else(|| raise(NullArgumentError { operator, parameter }))
}
