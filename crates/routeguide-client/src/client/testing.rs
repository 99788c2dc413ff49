//! In-process RouteGuide server used to drive the client end to end.
//!
//! [`FakeRouteGuide`] answers from a fixed feature list, counts every call
//! and can be told to fail a call after a given number of messages.

use crate::client::{config::ClientConfig, connection::Connection};
use futures::stream::{self, BoxStream};
use routeguide_core::proto::{
    Feature, Point, Rectangle, RouteNote, RouteSummary,
    route_guide_server::{RouteGuide, RouteGuideServer},
};
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::{net::TcpListener, sync::mpsc};
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::{Code, Request, Response, Status, Streaming, transport::Server};

/// A failure injected once `after` messages of the call have been handled.
#[derive(Clone, Copy, Debug)]
pub struct Fault {
    pub after: usize,
    pub code: Code,
}

impl Fault {
    pub const fn immediately(code: Code) -> Self {
        Self { after: 0, code }
    }

    pub const fn after(after: usize, code: Code) -> Self {
        Self { after, code }
    }

    fn status(self, operation: &str) -> Status {
        Status::new(self.code, format!("injected {operation} failure"))
    }
}

#[derive(Debug, Default)]
pub struct CallCounts {
    get_feature: AtomicUsize,
    list_features: AtomicUsize,
    record_route: AtomicUsize,
    route_chat: AtomicUsize,
    points_received: AtomicUsize,
    notes_received: AtomicUsize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallSnapshot {
    pub get_feature: usize,
    pub list_features: usize,
    pub record_route: usize,
    pub route_chat: usize,
    pub points_received: usize,
    pub notes_received: usize,
}

impl CallCounts {
    pub fn snapshot(&self) -> CallSnapshot {
        CallSnapshot {
            get_feature: self.get_feature.load(Ordering::SeqCst),
            list_features: self.list_features.load(Ordering::SeqCst),
            record_route: self.record_route.load(Ordering::SeqCst),
            route_chat: self.route_chat.load(Ordering::SeqCst),
            points_received: self.points_received.load(Ordering::SeqCst),
            notes_received: self.notes_received.load(Ordering::SeqCst),
        }
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

#[derive(Clone, Default)]
pub struct FakeRouteGuide {
    features: Arc<Vec<Feature>>,
    greetings: Arc<Vec<RouteNote>>,
    echo_notes: bool,
    close_chat_immediately: bool,
    get_feature_fault: Option<Fault>,
    list_features_fault: Option<Fault>,
    record_route_fault: Option<Fault>,
    route_chat_fault: Option<Fault>,
    calls: Arc<CallCounts>,
}

impl FakeRouteGuide {
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = Arc::new(features);
        self
    }

    /// Notes the server pushes as soon as a chat opens.
    pub fn with_greetings(mut self, notes: Vec<RouteNote>) -> Self {
        self.greetings = Arc::new(notes);
        self
    }

    /// Send every inbound chat note straight back.
    pub const fn echo_notes(mut self) -> Self {
        self.echo_notes = true;
        self
    }

    /// End the response direction of a chat without reading anything.
    pub const fn close_chat_immediately(mut self) -> Self {
        self.close_chat_immediately = true;
        self
    }

    pub const fn fail_get_feature(mut self, fault: Fault) -> Self {
        self.get_feature_fault = Some(fault);
        self
    }

    pub const fn fail_list_features(mut self, fault: Fault) -> Self {
        self.list_features_fault = Some(fault);
        self
    }

    pub const fn fail_record_route(mut self, fault: Fault) -> Self {
        self.record_route_fault = Some(fault);
        self
    }

    pub const fn fail_route_chat(mut self, fault: Fault) -> Self {
        self.route_chat_fault = Some(fault);
        self
    }

    fn feature_at(&self, point: &Point) -> Option<&Feature> {
        self.features
            .iter()
            .find(|f| f.location.as_ref() == Some(point))
    }
}

fn in_range(point: &Point, rect: &Rectangle) -> bool {
    let lo = rect.lo.unwrap_or_default();
    let hi = rect.hi.unwrap_or_default();

    let left = lo.longitude.min(hi.longitude);
    let right = lo.longitude.max(hi.longitude);
    let bottom = lo.latitude.min(hi.latitude);
    let top = lo.latitude.max(hi.latitude);

    (left..=right).contains(&point.longitude) && (bottom..=top).contains(&point.latitude)
}

#[tonic::async_trait]
impl RouteGuide for FakeRouteGuide {
    type ListFeaturesStream = BoxStream<'static, Result<Feature, Status>>;
    type RouteChatStream = ReceiverStream<Result<RouteNote, Status>>;

    async fn get_feature(&self, request: Request<Point>) -> Result<Response<Feature>, Status> {
        bump(&self.calls.get_feature);
        if let Some(fault) = self.get_feature_fault {
            return Err(fault.status("GetFeature"));
        }

        let point = request.into_inner();
        let feature = self.feature_at(&point).cloned().unwrap_or(Feature {
            name: String::new(),
            location: Some(point),
        });
        Ok(Response::new(feature))
    }

    async fn list_features(
        &self,
        request: Request<Rectangle>,
    ) -> Result<Response<Self::ListFeaturesStream>, Status> {
        bump(&self.calls.list_features);
        let rect = request.into_inner();

        let mut items: Vec<Result<Feature, Status>> = self
            .features
            .iter()
            .filter(|f| f.location.as_ref().is_some_and(|p| in_range(p, &rect)))
            .cloned()
            .map(Ok)
            .collect();

        if let Some(fault) = self.list_features_fault {
            items.truncate(fault.after);
            items.push(Err(fault.status("ListFeatures")));
        }

        Ok(Response::new(Box::pin(stream::iter(items))))
    }

    async fn record_route(
        &self,
        request: Request<Streaming<Point>>,
    ) -> Result<Response<RouteSummary>, Status> {
        bump(&self.calls.record_route);
        let mut stream = request.into_inner();
        let mut summary = RouteSummary::default();
        let mut received = 0;

        loop {
            if let Some(fault) = self.record_route_fault {
                if received >= fault.after {
                    return Err(fault.status("RecordRoute"));
                }
            }

            let Some(point) = stream.message().await? else {
                break;
            };
            received += 1;
            bump(&self.calls.points_received);

            summary.point_count += 1;
            if self.feature_at(&point).is_some() {
                summary.feature_count += 1;
            }
        }

        Ok(Response::new(summary))
    }

    async fn route_chat(
        &self,
        request: Request<Streaming<RouteNote>>,
    ) -> Result<Response<Self::RouteChatStream>, Status> {
        bump(&self.calls.route_chat);
        let (tx, rx) = mpsc::channel(16);

        if self.close_chat_immediately {
            return Ok(Response::new(ReceiverStream::new(rx)));
        }

        let mut inbound = request.into_inner();
        let greetings = Arc::clone(&self.greetings);
        let calls = Arc::clone(&self.calls);
        let echo = self.echo_notes;
        let fault = self.route_chat_fault;

        tokio::spawn(async move {
            for note in greetings.iter() {
                if tx.send(Ok(note.clone())).await.is_err() {
                    return;
                }
            }

            let mut received = 0;
            loop {
                if let Some(fault) = fault {
                    if received >= fault.after {
                        let _ = tx.send(Err(fault.status("RouteChat"))).await;
                        return;
                    }
                }

                match inbound.message().await {
                    Ok(Some(note)) => {
                        received += 1;
                        bump(&calls.notes_received);
                        if echo && tx.send(Ok(note)).await.is_err() {
                            return;
                        }
                    }
                    // The client closed its direction; close ours.
                    Ok(None) | Err(_) => return,
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub calls: Arc<CallCounts>,
}

impl TestServer {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_addr(self.addr.to_string()).expect("test address is valid")
    }

    pub async fn connect(&self) -> Connection {
        Connection::open(&self.config()).await
    }
}

/// Serves `service` on an ephemeral localhost port for the rest of the test.
pub async fn spawn_server(service: FakeRouteGuide) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    let calls = Arc::clone(&service.calls);

    tokio::spawn(
        Server::builder()
            .add_service(RouteGuideServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );

    TestServer { addr, calls }
}

/// A localhost address nothing is listening on.
pub async fn unused_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    let addr = listener.local_addr().expect("listener has an address");
    drop(listener);
    addr.to_string()
}

/// Features around northern New Jersey; the first sits on the point the
/// runner looks up and the last lies outside the runner's search area.
pub fn sample_features() -> Vec<Feature> {
    let feature = |name: &str, latitude, longitude| Feature {
        name: name.to_string(),
        location: Some(Point::new(latitude, longitude)),
    };

    vec![
        feature(
            "Berkshire Valley Management Area Trail, Jefferson, NJ, USA",
            409_146_138,
            -746_188_906,
        ),
        feature("Patriots Path, Mendham, NJ 07945, USA", 407_838_351, -746_143_763),
        feature(
            "101 New Jersey 10, Whippany, NJ 07981, USA",
            408_122_808,
            -743_999_179,
        ),
        feature("", 413_628_156, -749_015_468),
        feature("Null Island", 0, 0),
    ]
}
