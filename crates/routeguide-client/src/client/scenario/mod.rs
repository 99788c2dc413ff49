//! The three call shapes with a single stream direction at most.
//!
//! - [`unary`] - `GetFeature`, one request and one response.
//! - [`list`] - `ListFeatures`, a lazily pulled response stream.
//! - [`record`] - `RecordRoute`, a request stream answered by one summary.

pub mod list;
pub mod record;
pub mod unary;
