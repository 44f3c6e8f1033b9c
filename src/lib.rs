//! Fluent builder for log-search query URLs.
//!
//! A chain starts from a base URL, accumulates boolean clauses, a time range
//! and a field selection, and ends in a single URL string:
//!
//! ```
//! use lsq::QueryBuilder;
//!
//! let url = QueryBuilder::initialize("https://logs.example.com")
//!     .for_text("timeout")
//!     .not_for_field("source", "db01")
//!     .minutes_ago(15)
//!     .finalize()
//!     .unwrap();
//! assert_eq!(
//!     url,
//!     "https://logs.example.com/search?q=timeout+AND+NOT+source%3A%22db01%22&rangetype=relative&relative=900"
//! );
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod search;

pub use error::SearchError;
pub use search::{
    decode_search_url, BoolOp, Clause, IntoTimestamp, QueryBuilder, SearchParams, SearchState,
    TimeRange,
};
