//! # lambars-query
//!
//! Sequence query operators over arbitrary finite sequences, with explicit
//! control over when faults are raised.
//!
//! ## Overview
//!
//! - **Deferred operators**: `select`, `select_many`, `filter` (`Where`),
//!   `zip`, `join`, `distinct`. Calling one only captures its arguments; all
//!   validation and work happen while the returned sequence is pulled.
//! - **Eager operators**: `aggregate`, `to_dictionary`, `all`, `any`,
//!   `first`. They consume the source during the call and validate it first.
//! - **Equality comparers**: key-based operators compare keys exclusively
//!   through an [`EqualityComparer`](comparer::EqualityComparer).
//!
//! Absent inputs are modelled as `None`. A deferred operator given `None`
//! still returns a sequence; the fault is its first item.
//!
//! ## Feature Flags
//!
//! - `fxhash`: use `rustc-hash` for dictionary bucket tables
//! - `ahash`: use `ahash` for dictionary bucket tables
//! - `serde`: `Serialize`/`Deserialize` for `Dictionary`
//! - `tracing`: emit `tracing` events when a fault is raised
//! - `full`: `serde` and `tracing`
//!
//! ## Example
//!
//! ```rust
//! use lambars_query::prelude::*;
//!
//! // Building a deferred query over an absent source succeeds...
//! let query = select(None::<Vec<i32>>, Some(|value: i32| value + 1));
//! // ...and consuming it reports the fault.
//! assert_eq!(query.try_count().unwrap_err().kind(), QueryErrorKind::NullSource);
//!
//! // Eager operators report it from the call.
//! let sum = aggregate(None::<Vec<i32>>, 0, Some(|left: i32, right: i32| left + right));
//! assert_eq!(sum.unwrap_err().kind(), QueryErrorKind::NullSource);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the operators, comparers and fault types.
///
/// # Usage
///
/// ```rust
/// use lambars_query::prelude::*;
/// ```
pub mod prelude {
    pub use crate::comparer::*;
    pub use crate::deferred::*;
    pub use crate::dictionary::Dictionary;
    pub use crate::eager::*;
    pub use crate::error::*;
    pub use crate::sequence::*;
}

pub mod comparer;
pub mod deferred;
pub mod dictionary;
pub mod eager;
pub mod error;
pub mod sequence;
