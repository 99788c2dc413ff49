use routeguide_core::{
    Error, Result,
    proto::{Feature, Rectangle, route_guide_client::RouteGuideClient},
};
use tonic::{Request, Streaming, transport::Channel};

pub const LIST_FEATURES: &str = "ListFeatures";

/// A lazily pulled, finite stream of features.
///
/// Features come out one at a time in the order the server sent them. The
/// stream cannot be restarted: once it has ended, every further pull returns
/// `Ok(None)` without touching the transport.
pub struct FeatureStream {
    inner: Streaming<Feature>,
    received: usize,
    finished: bool,
}

impl FeatureStream {
    /// Pulls the next feature.
    ///
    /// - `Ok(Some(_))`: the next feature.
    /// - `Ok(None)`: the server closed the stream cleanly.
    ///
    /// # Errors
    ///
    /// Any other termination is reported as [`Error::Stream`] and ends the
    /// stream.
    pub async fn next(&mut self) -> Result<Option<Feature>> {
        if self.finished {
            return Ok(None);
        }

        match self.inner.message().await {
            Ok(Some(feature)) => {
                self.received += 1;
                Ok(Some(feature))
            }
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(status) => {
                self.finished = true;
                Err(Error::stream(LIST_FEATURES, status))
            }
        }
    }

    /// Number of features pulled so far.
    pub const fn received(&self) -> usize {
        self.received
    }
}

/// Opens a `ListFeatures` stream over `area`.
///
/// # Errors
///
/// Failing to open the stream is as fatal as a failure midway through it and
/// is reported as [`Error::Stream`].
pub async fn list_features(
    client: &mut RouteGuideClient<Channel>,
    area: Rectangle,
) -> Result<FeatureStream> {
    let inner = client
        .list_features(Request::new(area))
        .await
        .map_err(|status| Error::stream(LIST_FEATURES, status))?
        .into_inner();

    Ok(FeatureStream {
        inner,
        received: 0,
        finished: false,
    })
}

/// Pulls every feature in `area`, logging each on arrival, and returns how
/// many arrived.
#[tracing::instrument(name = "list_features", skip_all, fields(area = %area))]
pub async fn log_features(
    client: &mut RouteGuideClient<Channel>,
    area: Rectangle,
) -> Result<usize> {
    let mut stream = list_features(client, area).await?;

    while let Some(feature) = stream.next().await? {
        tracing::info!("{feature}");
    }

    tracing::debug!("ListFeatures ended after {} features", stream.received());
    Ok(stream.received())
}
