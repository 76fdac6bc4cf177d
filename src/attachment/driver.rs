use std::io;

use reqwest::{header, Client, StatusCode};

use crate::attachment::chunks::ChunkReader;
use crate::attachment::session::UploadSession;
use crate::attachment::{AttachmentError, AttachmentResult};

/// How the driver reacts to a failed chunk response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkFailurePolicy {
    /// Abort the attachment upload on the first non-success response
    #[default]
    AbortOnError,
    /// Log intermediate statuses and judge the upload solely by the final
    /// chunk's response, matching the original client's behavior
    FinalStatusOnly,
}

/// Streams chunks to an upload session URL, strictly in order.
///
/// The session tracks a single monotonically advancing byte offset, so
/// chunks are never sent in parallel or out of order. Each request carries a
/// computed `Content-Range`; the final chunk must come back 201 Created for
/// the upload to count as complete.
pub struct ChunkedUploadDriver {
    http: Client,
    policy: ChunkFailurePolicy,
}

impl ChunkedUploadDriver {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            policy: ChunkFailurePolicy::default(),
        }
    }

    pub fn with_policy(http: Client, policy: ChunkFailurePolicy) -> Self {
        Self { http, policy }
    }

    pub async fn upload(&self, session: &UploadSession, reader: ChunkReader) -> AttachmentResult<()> {
        let mut last: Option<(usize, String, StatusCode)> = None;

        for (index, chunk) in reader.enumerate() {
            let chunk = chunk?;
            let range = chunk.content_range();
            let length = chunk.len();

            let response = self
                .http
                .put(session.upload_url.clone())
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .header(header::CONTENT_LENGTH, length)
                .header(header::CONTENT_RANGE, &range)
                .body(chunk.payload)
                .send()
                .await?;

            let status = response.status();
            tracing::debug!(
                "Chunk {} of {} ({}): {}",
                index,
                session.attachment_name,
                range,
                status
            );

            if self.policy == ChunkFailurePolicy::AbortOnError && !status.is_success() {
                return Err(AttachmentError::ChunkRejected {
                    index,
                    range,
                    status,
                });
            }

            last = Some((index, range, status));
        }

        match last {
            Some((_, _, StatusCode::CREATED)) => Ok(()),
            Some((index, range, status)) => Err(AttachmentError::ChunkRejected {
                index,
                range,
                status,
            }),
            None => Err(AttachmentError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "attachment produced no chunks",
            ))),
        }
    }
}
