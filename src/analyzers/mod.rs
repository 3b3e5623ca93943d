//! Read-only aggregations over a loaded review collection.
//!
//! Every function here takes `&[Review]` and returns a freshly built result;
//! nothing is cached and nothing mutates the collection.

pub mod reviews;
pub mod temporal;
pub mod types;
pub mod users;
pub mod utility;

/// Number of entries returned by top-N rankings unless the caller asks otherwise.
pub const DEFAULT_TOP_N: usize = 10;
