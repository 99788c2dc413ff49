//! Route guide client: configuration, connection handling and the four call
//! scenarios.
//!
//! ## Structure
//!
//! - [`config`] - CLI arguments and the validated client configuration.
//! - [`connection`] - The connection handle shared by every scenario.
//! - [`runner`] - Runs the four scenarios in order and decides which failures
//!   abort the run.
//! - [`scenario`] - Unary, server-streaming and client-streaming calls.
//! - [`streaming`] - The bidirectional chat and its outbound note feed.
//! - [`telemetry`] - Log output and optional span export.

pub mod config;
pub mod connection;
pub mod runner;
pub mod scenario;
pub mod streaming;
pub mod telemetry;

#[cfg(test)]
pub mod testing;
