pub mod client;
pub mod message;

pub use client::GraphClient;
pub use message::{DraftRequest, MailDraft, MessageBody, Recipient};

use reqwest::StatusCode;
use thiserror::Error;

/// Microsoft Graph request errors
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to create draft message: server returned {status}")]
    DraftCreationFailed { status: StatusCode },

    #[error("Failed to send message {message_id}: server returned {status}")]
    SendFailed {
        message_id: String,
        status: StatusCode,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
