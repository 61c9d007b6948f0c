use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

use crate::{
    config::Config,
    dto::{AuthorFilter, TitleRequest},
    error::ServiceError,
    models,
    service::NoticeboardService,
};

// Include the generated proto code
pub mod notes {
    tonic::include_proto!("notes");
}

use notes::{
    Author, Note, Title,
    noticeboard_server::{Noticeboard, NoticeboardServer},
};

impl From<models::Author> for Author {
    fn from(author: models::Author) -> Self {
        Self {
            nickname: author.nickname,
            mail: author.mail,
        }
    }
}

impl From<models::Note> for Note {
    fn from(note: models::Note) -> Self {
        Self {
            title: note.title,
            content: note.content,
            author: Some(note.author.into()),
        }
    }
}

/// Per-stream producer settings.
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    pub buffer: usize,
    pub delay: Duration,
}

impl From<&Config> for StreamSettings {
    fn from(config: &Config) -> Self {
        Self {
            buffer: config.stream_buffer.max(1),
            delay: config.stream_delay(),
        }
    }
}

// gRPC service implementation
pub struct GrpcNoticeboard {
    service: Arc<NoticeboardService>,
    stream: StreamSettings,
}

impl GrpcNoticeboard {
    pub const fn new(service: Arc<NoticeboardService>, stream: StreamSettings) -> Self {
        Self { service, stream }
    }
}

#[tonic::async_trait]
impl Noticeboard for GrpcNoticeboard {
    async fn get_note_by_title(&self, request: Request<Title>) -> Result<Response<Note>, Status> {
        let req = request.into_inner();
        let dto_req = TitleRequest { title: req.title };

        match self.service.get_note_by_title(&dto_req) {
            Ok(note) => Ok(Response::new(note.into())),
            Err(e) => Err(e.into()),
        }
    }

    type ListNotesByAuthorStream = ReceiverStream<Result<Note, Status>>;

    async fn list_notes_by_author(
        &self,
        request: Request<Author>,
    ) -> Result<Response<Self::ListNotesByAuthorStream>, Status> {
        let req = request.into_inner();
        let filter = AuthorFilter {
            nickname: req.nickname,
            mail: req.mail,
        };

        let (tx, rx) = mpsc::channel(self.stream.buffer);
        let service = Arc::clone(&self.service);
        let delay = self.stream.delay;

        tracing::info!("Streaming notes by author {}", filter.mail);

        tokio::spawn(async move {
            match service.list_notes_by_author(&filter, &tx, delay).await {
                Ok(sent) => {
                    tracing::info!("Streamed {sent} notes by author {}", filter.mail);
                }
                Err(e @ ServiceError::StreamClosed { .. }) => {
                    tracing::warn!("Stopped streaming notes by author {}: {e}", filter.mail);
                }
                Err(e) => {
                    tracing::error!("Failed to stream notes by author {}: {e}", filter.mail);
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

pub fn create_grpc_server(
    service: Arc<NoticeboardService>,
    stream: StreamSettings,
) -> NoticeboardServer<GrpcNoticeboard> {
    NoticeboardServer::new(GrpcNoticeboard::new(service, stream))
}
