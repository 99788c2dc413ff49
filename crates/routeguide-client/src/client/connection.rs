//! The connection handle shared by every scenario.
//!
//! A [`Connection`] is acquired once per run and released when it drops,
//! however the run ends. If the endpoint cannot be reached up front the
//! failure is only logged: the connection falls back to a lazily-connecting
//! channel, so each later call reports the transport error itself.

use crate::client::config::ClientConfig;
use routeguide_core::{Error, proto::route_guide_client::RouteGuideClient};
use tonic::transport::{Channel, Endpoint};

pub struct Connection {
    addr: String,
    channel: Channel,
    connected: bool,
}

impl Connection {
    /// Dials the configured endpoint.
    pub async fn open(config: &ClientConfig) -> Self {
        let endpoint = Endpoint::from(config.uri.clone())
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(true);

        match endpoint.connect().await {
            Ok(channel) => {
                tracing::info!("Connected to {}", config.server_addr);
                Self {
                    addr: config.server_addr.clone(),
                    channel,
                    connected: true,
                }
            }
            Err(source) => {
                let err = Error::Connect {
                    addr: config.server_addr.clone(),
                    source,
                };
                tracing::warn!("{err}; each later call dials on demand and fails on its own");
                Self {
                    addr: config.server_addr.clone(),
                    channel: endpoint.connect_lazy(),
                    connected: false,
                }
            }
        }
    }

    /// Whether the initial dial succeeded.
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// A client over this connection. Clients are cheap handles onto the same
    /// underlying channel.
    pub fn client(&self) -> RouteGuideClient<Channel> {
        RouteGuideClient::new(self.channel.clone())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        tracing::debug!("Closing connection to {}", self.addr);
    }
}
