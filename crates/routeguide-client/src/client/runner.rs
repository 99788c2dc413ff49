//! Runs the four call shapes in a fixed order over one connection.
//!
//! 1. `GetFeature` at [`FEATURE_POINT`]. A failure is logged and the run
//!    moves on.
//! 2. `ListFeatures` over [`FEATURE_AREA`].
//! 3. `RecordRoute` with a random route.
//! 4. `RouteChat` driven by the runner's [`NoteFeed`].
//!
//! Any failure in steps 2 to 4 ends the run on the spot.

use crate::client::{
    connection::Connection,
    scenario::{list::log_features, record::record_route, unary::get_feature},
    streaming::{
        coordinator::{ChatOutcome, route_chat},
        feed::NoteFeed,
    },
};
use rand::Rng;
use routeguide_core::{
    Result,
    proto::{Feature, Point, Rectangle, RouteSummary, route_guide_client::RouteGuideClient},
};
use tonic::transport::Channel;

/// Where the unary lookup is made.
pub const FEATURE_POINT: Point = Point::new(409_146_138, -746_188_906);

/// The area searched by the server-streaming call.
pub const FEATURE_AREA: Rectangle = Rectangle::new(
    Point::new(400_000_000, -750_000_000),
    Point::new(420_000_000, -730_000_000),
);

/// What a completed run saw.
#[derive(Debug, Default)]
pub struct RunReport {
    /// `None` when the unary lookup failed.
    pub feature: Option<Feature>,
    pub features_listed: usize,
    pub summary: RouteSummary,
    pub chat: ChatOutcome,
}

pub struct Runner<R> {
    client: RouteGuideClient<Channel>,
    connected: bool,
    rng: R,
    notes: NoteFeed,
}

impl<R: Rng> Runner<R> {
    /// A runner over `connection` that chats with an empty feed.
    pub fn new(connection: &Connection, rng: R) -> Self {
        Self {
            client: connection.client(),
            connected: connection.is_connected(),
            rng,
            notes: NoteFeed::empty(),
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: NoteFeed) -> Self {
        self.notes = notes;
        self
    }

    /// Runs every scenario once.
    ///
    /// # Errors
    ///
    /// Returns the first fatal failure; scenarios after it are not started.
    pub async fn run(mut self) -> Result<RunReport> {
        if !self.connected {
            tracing::debug!("Endpoint was unreachable at startup, each call dials on demand");
        }

        let feature = match get_feature(&mut self.client, FEATURE_POINT).await {
            Ok(feature) => Some(feature),
            Err(err) => {
                tracing::error!("{err}");
                None
            }
        };

        let features_listed = log_features(&mut self.client, FEATURE_AREA).await?;
        let summary = record_route(&self.client, &mut self.rng).await?;
        let chat = route_chat(&self.client, self.notes).await?;

        Ok(RunReport {
            feature,
            features_listed,
            summary,
            chat,
        })
    }
}
