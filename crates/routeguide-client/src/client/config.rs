use core::time::Duration;
use clap::Parser;
use routeguide_core::Error;
use tonic::transport::Uri;

/// Address used when neither `--server-addr` nor `SERVER_ADDR` is given.
pub const DEFAULT_SERVER_ADDR: &str = "localhost:10000";

/// Upper bound on establishing the TCP/HTTP2 connection. Calls themselves
/// carry no deadline.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime configuration for the `routeguide-client` binary.
///
/// The client takes a single setting: where the route guide server lives.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "routeguide-client",
    version,
    about = "Exercises unary, server-streaming, client-streaming and bidirectional calls against a RouteGuide server"
)]
pub struct CliArgs {
    /// The server address in the format of host:port.
    ///
    /// A scheme may be given explicitly (`http://host:port`); a bare
    /// `host:port` is reached over plaintext HTTP/2.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(
        long,
        visible_alias = "server_addr",
        env = "SERVER_ADDR",
        default_value_t = String::from(DEFAULT_SERVER_ADDR)
    )]
    pub server_addr: String,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The address as the operator wrote it, used in log lines.
    pub server_addr: String,
    /// The normalized endpoint URI.
    pub uri: Uri,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Builds a configuration for `server_addr` with the default tuning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the address cannot be turned into
    /// a plaintext HTTP/2 endpoint.
    pub fn for_addr(server_addr: impl Into<String>) -> Result<Self, Error> {
        let server_addr = server_addr.into();
        let uri = endpoint_uri(&server_addr)?;
        Ok(Self {
            server_addr,
            uri,
            connect_timeout: CONNECT_TIMEOUT,
        })
    }
}

impl TryFrom<CliArgs> for ClientConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        Ok(Self::for_addr(args.server_addr)?)
    }
}

/// Turns `host:port` (or an explicit `http://host[:port]`) into a URI tonic
/// can dial.
fn endpoint_uri(addr: &str) -> Result<Uri, Error> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(Error::InvalidAddress {
            reason: "address is empty".to_string(),
        });
    }

    let has_scheme = addr.contains("://");
    let candidate = if has_scheme {
        addr.to_string()
    } else {
        format!("http://{addr}")
    };

    let uri: Uri = candidate.parse().map_err(|e| Error::InvalidAddress {
        reason: format!("{addr:?}: {e}"),
    })?;

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => {
            return Err(Error::InvalidAddress {
                reason: format!("{addr:?}: unsupported scheme {other:?}, only plaintext http is available"),
            });
        }
        None => {
            return Err(Error::InvalidAddress {
                reason: format!("{addr:?}: missing scheme"),
            });
        }
    }

    if uri.host().is_none_or(str::is_empty) {
        return Err(Error::InvalidAddress {
            reason: format!("{addr:?}: missing host"),
        });
    }

    if !has_scheme && uri.port_u16().is_none() {
        return Err(Error::InvalidAddress {
            reason: format!("{addr:?}: expected host:port"),
        });
    }

    Ok(uri)
}
