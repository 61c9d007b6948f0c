pub mod config;
pub mod consumer;
pub mod error;

// Include the generated proto code
pub mod notes {
    tonic::include_proto!("notes");
}

pub use consumer::{ConsumerReport, StreamState, run};
pub use error::ClientError;
