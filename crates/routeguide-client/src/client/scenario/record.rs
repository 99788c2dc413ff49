//! # Client-streaming route recording
//!
//! [`RouteRecorder`] feeds points into a `RecordRoute` call one at a time and
//! collects the single [`RouteSummary`] once the route is closed.
//!
//! The call itself runs on its own task, fed by a channel that holds at most
//! one point. A send therefore finishes only once the previous point has been
//! taken by the transport, and a call the server has already terminated is
//! noticed on the next send instead of leaving it parked forever.

use rand::Rng;
use routeguide_core::{
    Error, Result,
    point::{random_point, route_point_count},
    proto::{Point, RouteSummary, route_guide_client::RouteGuideClient},
};
use tokio::{
    sync::mpsc,
    task::{JoinError, JoinHandle},
};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Status, transport::Channel};

pub const RECORD_ROUTE: &str = "RecordRoute";
pub const RECORD_ROUTE_SEND: &str = "RecordRoute.Send";
pub const RECORD_ROUTE_CLOSE: &str = "RecordRoute.CloseAndRecv";

type CallResult = core::result::Result<RouteSummary, Status>;

/// Outcome of racing a send against the call finishing.
enum Step {
    Sent,
    Rejected,
    Finished(core::result::Result<CallResult, JoinError>),
}

pub struct RouteRecorder {
    tx: Option<mpsc::Sender<Point>>,
    call: Option<JoinHandle<CallResult>>,
    sent: usize,
}

impl RouteRecorder {
    /// Starts a `RecordRoute` call over a clone of `client`.
    pub fn open(client: &RouteGuideClient<Channel>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let mut client = client.clone();

        let call = tokio::spawn(async move {
            client
                .record_route(ReceiverStream::new(rx))
                .await
                .map(tonic::Response::into_inner)
        });

        Self {
            tx: Some(tx),
            call: Some(call),
            sent: 0,
        }
    }

    /// Hands one point to the stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] for `RecordRoute.Send` carrying the call's
    /// own status when the call has already terminated.
    pub async fn send(&mut self, point: Point) -> Result<()> {
        let (Some(tx), Some(call)) = (self.tx.as_ref(), self.call.as_mut()) else {
            return Err(Error::ChannelError {
                context: format!("{RECORD_ROUTE_SEND} on a closed route"),
            });
        };

        let step = tokio::select! {
            biased;
            joined = call => Step::Finished(joined),
            sent = tx.send(point) => match sent {
                Ok(()) => Step::Sent,
                Err(_) => Step::Rejected,
            },
        };

        match step {
            Step::Sent => {
                self.sent += 1;
                Ok(())
            }
            Step::Finished(joined) => {
                self.tx = None;
                self.call = None;
                Err(failure_from(RECORD_ROUTE_SEND, joined))
            }
            Step::Rejected => {
                // The request stream was dropped, so the call is over; report
                // how it ended.
                self.tx = None;
                let joined = match self.call.take() {
                    Some(call) => call.await,
                    None => Ok(Err(Status::cancelled("request stream dropped"))),
                };
                Err(failure_from(RECORD_ROUTE_SEND, joined))
            }
        }
    }

    /// Number of points handed to the stream so far.
    pub const fn sent(&self) -> usize {
        self.sent
    }

    /// Ends the request stream and waits for the route summary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] for `RecordRoute.CloseAndRecv` if the call
    /// fails, or [`Error::ChannelError`] if its task is gone.
    pub async fn close_and_receive(mut self) -> Result<RouteSummary> {
        drop(self.tx.take());

        let Some(call) = self.call.take() else {
            return Err(Error::ChannelError {
                context: format!("{RECORD_ROUTE_CLOSE} on a closed route"),
            });
        };

        match call.await {
            Ok(Ok(summary)) => Ok(summary),
            joined => Err(failure_from(RECORD_ROUTE_CLOSE, joined)),
        }
    }
}

fn failure_from(
    operation: &'static str,
    joined: core::result::Result<CallResult, JoinError>,
) -> Error {
    match joined {
        Ok(Err(status)) => Error::stream(operation, status),
        Ok(Ok(_)) => Error::stream(
            operation,
            Status::aborted("RecordRoute completed before the route was closed"),
        ),
        Err(err) => Error::ChannelError {
            context: format!("{RECORD_ROUTE} task failed: {err}"),
        },
    }
}

/// Records a random route of 2 to 101 points and returns the server's
/// summary of it.
#[tracing::instrument(skip_all)]
pub async fn record_route<R: Rng + ?Sized>(
    client: &RouteGuideClient<Channel>,
    rng: &mut R,
) -> Result<RouteSummary> {
    let count = route_point_count(rng);
    tracing::info!("Traversing {count} points.");

    let mut recorder = RouteRecorder::open(client);
    for _ in 0..count {
        recorder.send(random_point(rng)).await?;
    }
    tracing::debug!("Sent {} points, closing the route", recorder.sent());

    let summary = recorder.close_and_receive().await?;
    tracing::info!("Route summary: {summary}");
    Ok(summary)
}
