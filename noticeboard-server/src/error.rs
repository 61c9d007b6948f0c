//! Errors raised by the noticeboard service.
//!
//! Business errors are converted into `tonic::Status` so they reach the
//! client as structured gRPC failures.

use tonic::Status;

pub type Result<T> = core::result::Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// No note carries the requested title.
    #[error("note not found: {title}")]
    NoteNotFound { title: String },

    /// The receiving side of a note stream went away mid-stream.
    #[error("note stream closed after {sent} notes")]
    StreamClosed { sent: usize },
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NoteNotFound { .. } => Self::not_found("note not found"),
            // Raised once the client is gone, so this status is never sent;
            // the stream producer only logs it.
            ServiceError::StreamClosed { .. } => Self::unavailable(err.to_string()),
        }
    }
}
