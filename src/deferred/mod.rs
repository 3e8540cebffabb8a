//! Deferred operators.
//!
//! Each function here captures its arguments and returns a sequence without
//! looking at them. Absent sequences and absent function arguments are
//! reported as the first item pulled from the result, never by the call
//! itself:
//!
//! - [`select`]: maps every element
//! - [`select_many`]: maps every element to a sequence and flattens one level
//! - [`filter`]: keeps the elements satisfying a predicate (`Where`)
//! - [`zip`]: combines positional pairs, stopping at the shorter input
//! - [`join`] / [`join_with`]: inner join on keys
//! - [`distinct`]: first occurrence of each element under a comparer
//!
//! Every returned sequence is an `Iterator<Item = Result<T, QueryError>>`
//! that ends after the first fault.
//!
//! # Examples
//!
//! ```rust
//! use lambars_query::deferred::filter;
//! use lambars_query::sequence::Traverse;
//!
//! let names = ["Preety", "Priyanka", "Hina"];
//! let query = filter(Some(names), Some(|name: &&str| name.starts_with('P')));
//! assert_eq!(query.try_to_vec(), Ok(vec!["Preety", "Priyanka"]));
//! ```

mod distinct;
mod filter;
mod join;
mod select;
mod select_many;
mod zip;

pub use distinct::{Distinct, distinct};
pub use filter::{Where, filter};
pub use join::{Join, join, join_with};
pub use select::{Select, select};
pub use select_many::{SelectMany, select_many};
pub use zip::{Zip, zip};
