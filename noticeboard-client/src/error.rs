use tonic::Status;

use crate::consumer::StreamState;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("can not connect with server: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("error receiving note: {0}")]
    Lookup(Status),

    #[error("open stream error: {0}")]
    OpenStream(Status),

    #[error("cannot receive: {0}")]
    Receive(Status),

    #[error("stream receiver stopped without signalling completion")]
    ReceiverDropped,

    #[error("invalid stream transition from {from:?} to {to:?}")]
    InvalidTransition { from: StreamState, to: StreamState },
}
