use base64::{engine::general_purpose, Engine as _};
use reqwest::{header, StatusCode};
use serde::Serialize;

use crate::attachment::{Attachment, AttachmentError, AttachmentResult};
use crate::graph::GraphClient;

#[derive(Debug, Serialize)]
struct FileAttachmentRequest<'a> {
    #[serde(rename = "@odata.type")]
    odata_type: &'a str,
    name: &'a str,
    #[serde(rename = "contentBytes")]
    content_bytes: String,
}

/// Upload a small attachment whole, base64-encoded in one request
pub async fn upload_inline(
    client: &GraphClient,
    message_id: &str,
    attachment: &Attachment,
) -> AttachmentResult<()> {
    let content = std::fs::read(attachment.path())?;
    let body = FileAttachmentRequest {
        odata_type: "#microsoft.graph.fileAttachment",
        name: attachment.name(),
        content_bytes: general_purpose::STANDARD.encode(content),
    };

    tracing::debug!("Uploading attachment {}", attachment.name());

    let response = client
        .http()
        .post(client.attachments_url(message_id))
        .header(header::AUTHORIZATION, client.authorization())
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::CREATED {
        tracing::error!("Uploading failed for {}: {}", attachment.name(), status);
        return Err(AttachmentError::InlineUploadFailed {
            name: attachment.name().to_string(),
            status,
        });
    }

    tracing::debug!("Successfully uploaded {}", attachment.name());
    Ok(())
}
