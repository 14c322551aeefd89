//! Query, aggregation, and validation logic over a [`Storage`] backend.
//!
//! Every operation takes the storage handle explicitly and, where time
//! matters, the evaluation instant, so callers (and tests) control both.

pub mod artists;
pub mod search;
pub mod shows;
pub mod venues;
