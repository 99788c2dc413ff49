//! Bidirectional `RouteChat` support.
//!
//! - [`coordinator`] - Runs the send and receive halves and waits for both.
//! - [`feed`] - Where outbound notes come from.

pub mod coordinator;
pub mod feed;
