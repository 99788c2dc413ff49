//! Error types for the route guide client.
//!
//! Every scenario reports failures through the central [`Error`] enum. The
//! variants mirror how the orchestrator treats them:
//!
//! ## Error Cases
//! - `Connect`: The channel could not be established. Logged only; the client
//!   keeps a lazily-connecting channel that fails each later call.
//! - `Call`: A unary call failed. Logged, and the run moves on.
//! - `Stream`: A streaming call broke for any reason other than a clean
//!   end-of-stream. Fatal to the run.
//! - `ChannelError`: An internal hand-off between tasks failed. Fatal.
//! - `InvalidAddress`: The configured endpoint could not be parsed.
//!
//! A clean end-of-stream is never an error; pulls report it as `Ok(None)`.

use tonic::{Code, Status};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the route guide client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The connection to the remote endpoint could not be established.
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// A unary call returned an error status.
    #[error("{operation} failed: {status}")]
    Call {
        operation: &'static str,
        status: Box<Status>,
    },

    /// A streaming call failed before its clean end.
    #[error("{operation} stream failed: {status}")]
    Stream {
        operation: &'static str,
        status: Box<Status>,
    },

    /// Internal channel send/receive failure between tasks.
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The configured endpoint is not a usable URI.
    #[error("Invalid server address: {reason}")]
    InvalidAddress { reason: String },
}

impl Error {
    pub fn call(operation: &'static str, status: Status) -> Self {
        Self::Call {
            operation,
            status: Box::new(status),
        }
    }

    pub fn stream(operation: &'static str, status: Status) -> Self {
        Self::Stream {
            operation,
            status: Box::new(status),
        }
    }

    /// Returns `true` for failures that must abort the whole run.
    ///
    /// Only unary call failures and connection failures are survivable.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Call { .. } | Self::Connect { .. })
    }

    /// The gRPC status code behind this error, if it came from the remote or
    /// the transport.
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Call { status, .. } | Self::Stream { status, .. } => Some(status.code()),
            _ => None,
        }
    }
}
