use std::time::Duration;

use reqwest::{header, Client, StatusCode};

use crate::auth::AccessToken;
use crate::config::Config;
use crate::graph::message::{DraftRequest, DraftResponse, MailDraft};
use crate::graph::{GraphError, GraphResult};

/// Microsoft Graph mail client
///
/// Owns the HTTP client, the sender address and the bearer token. The base
/// URL comes from configuration so tests can point it at a local server.
pub struct GraphClient {
    client: Client,
    base_url: String,
    sender_email: String,
    token: AccessToken,
}

impl GraphClient {
    pub fn new(config: &Config, token: AccessToken) -> GraphResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            sender_email: config.sender_email.clone(),
            token,
        })
    }

    pub fn sender_email(&self) -> &str {
        &self.sender_email
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn authorization(&self) -> String {
        self.token.authorization_header()
    }

    fn messages_url(&self) -> String {
        format!("{}/users/{}/messages", self.base_url, self.sender_email)
    }

    fn send_url(&self, message_id: &str) -> String {
        format!(
            "{}/users/{}/messages/{}/send",
            self.base_url, self.sender_email, message_id
        )
    }

    pub(crate) fn attachments_url(&self, message_id: &str) -> String {
        format!(
            "{}/users/{}/messages/{}/attachments",
            self.base_url, self.sender_email, message_id
        )
    }

    pub(crate) fn upload_session_url(&self, message_id: &str) -> String {
        format!(
            "{}/users/{}/messages/{}/attachments/createUploadSession",
            self.base_url, self.sender_email, message_id
        )
    }

    /// Create a draft message and return it with the server-assigned id
    pub async fn create_draft(&self, request: &DraftRequest) -> GraphResult<MailDraft> {
        tracing::debug!("Creating draft message");

        let response = self
            .client
            .post(self.messages_url())
            .header(header::AUTHORIZATION, self.authorization())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            tracing::error!("Failed to create draft message: {}", status);
            return Err(GraphError::DraftCreationFailed { status });
        }

        let created: DraftResponse = response.json().await?;
        tracing::debug!("Successfully created draft message {}", created.id);

        Ok(MailDraft {
            id: created.id,
            subject: request.subject.clone(),
            recipient: request
                .to_recipients
                .first()
                .map(|r| r.email_address.address.clone())
                .unwrap_or_default(),
        })
    }

    /// Send a previously created draft
    pub async fn send_draft(&self, message_id: &str) -> GraphResult<()> {
        tracing::debug!("Sending message {}", message_id);

        let response = self
            .client
            .post(self.send_url(message_id))
            .header(header::AUTHORIZATION, self.authorization())
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            tracing::error!("Failed to send message {}: {}", message_id, status);
            return Err(GraphError::SendFailed {
                message_id: message_id.to_string(),
                status,
            });
        }

        tracing::debug!("Successfully sent message {}", message_id);
        Ok(())
    }
}
