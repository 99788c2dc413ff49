//! Shared types, point generation and error definitions used by the route
//! guide client.
//!
//! ## Submodules
//!
//! - [`error`] - Error taxonomy for the four call scenarios.
//! - [`point`] - Synthetic point generation for route recording.
//! - [`types`] - Coordinate constants and helpers on the generated messages.
//! - [`proto`] - Generated `routeguide` messages, client and server.

pub mod error;
pub mod point;
pub mod types;

pub use error::{Error, Result};

/// gRPC service and message definitions generated from
/// `proto/route_guide.proto`.
///
/// ## Service
///
/// - `GetFeature` - unary lookup of the feature at a point.
/// - `ListFeatures` - server-streamed features inside a rectangle.
/// - `RecordRoute` - client-streamed points, answered with a summary.
/// - `RouteChat` - bidirectional stream of route notes.
pub mod proto {
    tonic::include_proto!("routeguide");
}
