//! # Duplex chat coordination
//!
//! A `RouteChat` call is split into two halves that run independently:
//!
//! - The receive half is a spawned task. It opens the call, then logs and
//!   keeps every inbound note until the server ends its direction (done) or
//!   the stream breaks (failed). Either way it fires a oneshot completion
//!   signal exactly once.
//! - The send half stays with the caller. It pushes each note of a
//!   [`NoteFeed`] and then closes by dropping the outbound sender, whether or
//!   not the receive half has finished.
//!
//! The caller only returns once the completion signal has fired. The call is
//! opened on the receive task so that a server which holds back its response
//! headers until the client closes cannot stall the send half.

use crate::client::streaming::feed::NoteFeed;
use routeguide_core::{
    Error, Result,
    proto::{RouteNote, route_guide_client::RouteGuideClient},
};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;
use tracing::Instrument;

pub const ROUTE_CHAT: &str = "RouteChat";

/// What a finished chat exchanged.
#[derive(Debug, Default)]
pub struct ChatOutcome {
    /// Notes handed to the outbound stream.
    pub sent: usize,
    /// Inbound notes in arrival order.
    pub received: Vec<RouteNote>,
}

enum SendHalf {
    Open(mpsc::Sender<RouteNote>),
    Closed,
}

impl SendHalf {
    /// Returns `false` once the outbound stream can take no more notes.
    async fn send(&mut self, note: RouteNote) -> bool {
        match self {
            Self::Open(tx) => tx.send(note).await.is_ok(),
            Self::Closed => false,
        }
    }

    /// Ends the outbound direction. The call stays open for receiving.
    fn close(&mut self) {
        *self = Self::Closed;
    }
}

type Completion = oneshot::Sender<Result<Vec<RouteNote>>>;

fn spawn_receiver(
    mut client: RouteGuideClient<Channel>,
    outbound: mpsc::Receiver<RouteNote>,
    done: Completion,
) {
    tokio::spawn(
        async move {
            let outcome = receive(&mut client, outbound).await;
            if done.send(outcome).is_err() {
                tracing::debug!("RouteChat caller went away before completion");
            }
        }
        .in_current_span(),
    );
}

fn inbound_line(note: &RouteNote) -> String {
    format!("Got message {note}")
}

async fn receive(
    client: &mut RouteGuideClient<Channel>,
    outbound: mpsc::Receiver<RouteNote>,
) -> Result<Vec<RouteNote>> {
    let mut inbound = client
        .route_chat(ReceiverStream::new(outbound))
        .await
        .map_err(|status| Error::stream(ROUTE_CHAT, status))?
        .into_inner();

    let mut received = Vec::new();
    while let Some(note) = inbound
        .message()
        .await
        .map_err(|status| Error::stream(ROUTE_CHAT, status))?
    {
        tracing::info!("{}", inbound_line(&note));
        received.push(note);
    }
    Ok(received)
}

/// Runs one `RouteChat` exchange, sending every note in `feed` while
/// concurrently receiving until the server closes its direction.
///
/// # Errors
///
/// A broken inbound stream is [`Error::Stream`]. A receive task that dies
/// without signalling completion is [`Error::ChannelError`].
#[tracing::instrument(skip_all, fields(notes = feed.len()))]
pub async fn route_chat(
    client: &RouteGuideClient<Channel>,
    feed: NoteFeed,
) -> Result<ChatOutcome> {
    // Room for the whole feed, so sends never wait on the transport.
    let (tx, rx) = mpsc::channel(feed.len().max(1));
    let (done_tx, done) = oneshot::channel();
    spawn_receiver(client.clone(), rx, done_tx);

    if feed.is_empty() {
        tracing::debug!("No outbound notes, only listening");
    }

    let mut send_half = SendHalf::Open(tx);
    let mut sent = 0;
    for note in feed {
        tracing::debug!("Sending {note}");
        if !send_half.send(note).await {
            // The call is over; the receive half reports how it ended.
            break;
        }
        sent += 1;
    }
    send_half.close();

    let received = done.await.map_err(|_| Error::ChannelError {
        context: format!("{ROUTE_CHAT} receiver ended without signalling completion"),
    })??;

    tracing::debug!("Chat finished: sent {sent}, received {}", received.len());
    Ok(ChatOutcome { sent, received })
}
