use routeguide_core::{
    Error, Result,
    proto::{Feature, Point, route_guide_client::RouteGuideClient},
};
use tonic::{Request, transport::Channel};

pub const GET_FEATURE: &str = "GetFeature";

/// Looks up the feature at `point` with a single round trip.
///
/// The returned feature is logged as-is; an empty name means there is nothing
/// at that location. Failures come back as [`Error::Call`] and are never
/// retried.
#[tracing::instrument(skip_all, fields(point = %point))]
pub async fn get_feature(client: &mut RouteGuideClient<Channel>, point: Point) -> Result<Feature> {
    let feature = client
        .get_feature(Request::new(point))
        .await
        .map_err(|status| Error::call(GET_FEATURE, status))?
        .into_inner();

    tracing::info!("{feature}");
    Ok(feature)
}
