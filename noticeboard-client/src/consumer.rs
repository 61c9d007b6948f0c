//! Client side of the noticeboard: one unary lookup, then one author stream
//! drained by a spawned receiver task.
//!
//! The receiver reports back through a one-shot completion signal carrying
//! either every received note or the error that ended the stream. The main
//! flow waits on that signal before returning.

use std::pin::pin;

use tokio::sync::oneshot;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Status, transport::Channel};

use crate::{
    config::Config,
    error::ClientError,
    notes::{Author, Note, Title, noticeboard_client::NoticeboardClient},
};

/// Client-side lifecycle of a streaming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    StreamOpened,
    Receiving,
    Completed,
    Failed,
}

impl StreamState {
    /// Moves to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition(self, next: Self) -> Result<Self, ClientError> {
        match (self, next) {
            (Self::Idle, Self::StreamOpened | Self::Failed)
            | (Self::StreamOpened | Self::Receiving, Self::Receiving)
            | (Self::Receiving, Self::Completed | Self::Failed) => Ok(next),
            (from, to) => Err(ClientError::InvalidTransition { from, to }),
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Outcome of a full client run.
#[derive(Debug, Clone)]
pub struct ConsumerReport {
    /// Note returned by the unary lookup
    pub lookup: Note,
    /// Notes received from the stream, in arrival order
    pub streamed: Vec<Note>,
}

pub type Completion = oneshot::Receiver<Result<Vec<Note>, ClientError>>;

pub async fn connect(addr: String) -> Result<NoticeboardClient<Channel>, ClientError> {
    let client = NoticeboardClient::connect(addr).await?;
    Ok(client)
}

pub async fn get_note_by_title(
    client: &mut NoticeboardClient<Channel>,
    title: &str,
) -> Result<Note, ClientError> {
    let request = Title {
        title: title.to_string(),
    };

    client
        .get_note_by_title(Request::new(request))
        .await
        .map(tonic::Response::into_inner)
        .map_err(ClientError::Lookup)
}

/// Opens the author stream from `state`, which must be `Idle`.
///
/// Returns the `StreamOpened` state with the stream, or moves to `Failed` and
/// reports `OpenStream`. Only the mail is sent; the nickname stays empty.
pub async fn open_stream(
    client: &mut NoticeboardClient<Channel>,
    author_mail: &str,
    state: StreamState,
) -> Result<(StreamState, tonic::Streaming<Note>), ClientError> {
    let opened = state.transition(StreamState::StreamOpened)?;
    let author = Author {
        nickname: String::new(),
        mail: author_mail.to_string(),
    };

    match client.list_notes_by_author(Request::new(author)).await {
        Ok(response) => Ok((opened, response.into_inner())),
        Err(status) => {
            let failed = state.transition(StreamState::Failed)?;
            tracing::debug!("Stream {:?} before receiving any note", failed);
            Err(ClientError::OpenStream(status))
        }
    }
}

/// Spawns the receive loop for a stream in the `StreamOpened` state.
///
/// `on_note` is called for each note as it arrives. The returned receiver
/// resolves once the stream hits end-of-stream or fails.
pub fn spawn_receiver<S, F>(state: StreamState, stream: S, on_note: F) -> Completion
where
    S: Stream<Item = Result<Note, Status>> + Send + 'static,
    F: FnMut(&Note) + Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = receive_all(state, stream, on_note).await;
        // Nobody waiting any more is not an error for the receiver
        let _ = done_tx.send(outcome);
    });

    done_rx
}

async fn receive_all<S, F>(
    state: StreamState,
    stream: S,
    mut on_note: F,
) -> Result<Vec<Note>, ClientError>
where
    S: Stream<Item = Result<Note, Status>>,
    F: FnMut(&Note),
{
    let mut stream = pin!(stream);
    let mut state = state.transition(StreamState::Receiving)?;
    let mut received = Vec::new();

    loop {
        match stream.next().await {
            Some(Ok(note)) => {
                on_note(&note);
                received.push(note);
                state = state.transition(StreamState::Receiving)?;
            }
            None => {
                state = state.transition(StreamState::Completed)?;
                tracing::debug!("Stream {:?} after {} notes", state, received.len());
                return Ok(received);
            }
            Some(Err(status)) => {
                state = state.transition(StreamState::Failed)?;
                tracing::debug!("Stream {:?} after {} notes", state, received.len());
                return Err(ClientError::Receive(status));
            }
        }
    }
}

/// Waits for the receiver spawned by [`spawn_receiver`] to finish.
pub async fn wait_for_completion(done: Completion) -> Result<Vec<Note>, ClientError> {
    done.await.map_err(|_| ClientError::ReceiverDropped)?
}

/// Runs the whole client flow against `config.server_addr`.
///
/// `on_lookup` sees the looked-up note before the stream is opened; `on_note`
/// sees each streamed note as it arrives.
pub async fn run<L, F>(
    config: &Config,
    on_lookup: L,
    on_note: F,
) -> Result<ConsumerReport, ClientError>
where
    L: FnOnce(&Note),
    F: FnMut(&Note) + Send + 'static,
{
    let mut client = connect(config.server_addr.clone()).await?;
    tracing::info!("Connected to gRPC server at address {}", config.server_addr);

    let lookup = get_note_by_title(&mut client, &config.title).await?;
    tracing::info!("Note received: {}", lookup.content);
    on_lookup(&lookup);

    tracing::info!("Streaming notes from the server");
    let (state, stream) = open_stream(&mut client, &config.author_mail, StreamState::Idle).await?;

    let done = spawn_receiver(state, stream, on_note);
    let streamed = wait_for_completion(done).await?;
    tracing::info!("Finished streaming, received {} notes", streamed.len());

    Ok(ConsumerReport { lookup, streamed })
}
