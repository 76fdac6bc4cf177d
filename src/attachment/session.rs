use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::attachment::{Attachment, AttachmentError, AttachmentResult};
use crate::graph::GraphClient;

#[derive(Debug, Serialize)]
struct UploadSessionRequest<'a> {
    #[serde(rename = "AttachmentItem")]
    attachment_item: AttachmentItem<'a>,
}

#[derive(Debug, Serialize)]
struct AttachmentItem<'a> {
    #[serde(rename = "attachmentType")]
    attachment_type: &'a str,
    name: &'a str,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct UploadSessionResponse {
    #[serde(rename = "uploadUrl")]
    upload_url: String,
}

/// Server-allocated upload session for one large attachment.
///
/// The URL is opaque, pre-authorized, used for every chunk of this
/// attachment and nothing else, and never reused once abandoned.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub attachment_name: String,
    pub upload_url: Url,
    pub total_size: u64,
}

/// Negotiate an upload session for a chunk-routed attachment.
///
/// On any non-created response the attachment upload fails with no partial
/// state to clean up; the server owns session lifecycle on failure.
pub async fn create_upload_session(
    client: &GraphClient,
    message_id: &str,
    attachment: &Attachment,
) -> AttachmentResult<UploadSession> {
    let request = UploadSessionRequest {
        attachment_item: AttachmentItem {
            attachment_type: "file",
            name: attachment.name(),
            size: attachment.size(),
        },
    };

    tracing::debug!("Creating upload session for {}", attachment.name());

    let response = client
        .http()
        .post(client.upload_session_url(message_id))
        .header(header::AUTHORIZATION, client.authorization())
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::CREATED {
        tracing::error!(
            "Failed to create upload session for {}: {}",
            attachment.name(),
            status
        );
        return Err(AttachmentError::SessionCreationFailed {
            name: attachment.name().to_string(),
            status,
        });
    }

    let session: UploadSessionResponse = response.json().await?;
    let upload_url = Url::parse(&session.upload_url)?;

    tracing::debug!(
        "Successfully created an upload session for {}",
        attachment.name()
    );

    Ok(UploadSession {
        attachment_name: attachment.name().to_string(),
        upload_url,
        total_size: attachment.size(),
    })
}
