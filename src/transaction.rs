use std::path::Path;

use thiserror::Error;

use crate::attachment::{
    self, Attachment, AttachmentError, AttachmentResult, ChunkFailurePolicy, ChunkReader,
    ChunkedUploadDriver, UploadPolicy,
};
use crate::graph::{DraftRequest, GraphClient, GraphError, MailDraft};

/// Transaction lifecycle: draft creation, attachment uploads, then send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Composing,
    AttachmentsPending,
    Sending,
    Sent,
    Failed,
}

/// Whether one failed attachment fails the whole transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentFailurePolicy {
    /// Log the failure, report it per attachment, and keep going
    #[default]
    ContinueOnFailure,
    /// Fail the transaction on the first attachment that does not upload
    AbortOnFirstFailure,
}

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("No draft message exists yet")]
    NoDraft,

    #[error("Draft message already created")]
    DraftAlreadyCreated,

    #[error("Transaction has already failed")]
    AlreadyFailed,
}

pub type TransactionResult<T> = Result<T, TransactionError>;

/// Sequences one outbound mail: draft, attachments, send.
///
/// Every step blocks on its HTTP response before the next proceeds. A draft
/// creation failure is terminal and nothing further is attempted; a send
/// failure is terminal; attachment failures follow the configured policy.
pub struct MailTransaction {
    client: GraphClient,
    recipient: String,
    draft: Option<MailDraft>,
    state: TransactionState,
    attachment_policy: AttachmentFailurePolicy,
    chunk_policy: ChunkFailurePolicy,
}

impl MailTransaction {
    pub fn new(client: GraphClient, recipient: impl Into<String>) -> Self {
        Self {
            client,
            recipient: recipient.into(),
            draft: None,
            state: TransactionState::Composing,
            attachment_policy: AttachmentFailurePolicy::default(),
            chunk_policy: ChunkFailurePolicy::default(),
        }
    }

    pub fn with_attachment_policy(mut self, policy: AttachmentFailurePolicy) -> Self {
        self.attachment_policy = policy;
        self
    }

    pub fn with_chunk_policy(mut self, policy: ChunkFailurePolicy) -> Self {
        self.chunk_policy = policy;
        self
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn message_id(&self) -> Option<&str> {
        self.draft.as_ref().map(|draft| draft.id.as_str())
    }

    pub fn draft(&self) -> Option<&MailDraft> {
        self.draft.as_ref()
    }

    /// Create the draft message. Must succeed before any attachment or send
    /// call; failure is terminal for the transaction.
    pub async fn create_draft(&mut self, subject: &str, body: &str) -> TransactionResult<()> {
        if self.state == TransactionState::Failed {
            return Err(TransactionError::AlreadyFailed);
        }
        if self.state != TransactionState::Composing {
            return Err(TransactionError::DraftAlreadyCreated);
        }

        let request = DraftRequest::html(subject, body, &self.recipient);
        match self.client.create_draft(&request).await {
            Ok(draft) => {
                self.draft = Some(draft);
                self.state = TransactionState::AttachmentsPending;
                Ok(())
            }
            Err(err) => {
                self.state = TransactionState::Failed;
                Err(err.into())
            }
        }
    }

    /// Route and upload one attachment.
    ///
    /// Under `ContinueOnFailure` the outcome is reported per attachment:
    /// `Ok(true)` uploaded, `Ok(false)` failed but the transaction goes on.
    /// Under `AbortOnFirstFailure` a failed attachment fails the
    /// transaction.
    pub async fn add_attachment(&mut self, path: impl AsRef<Path>) -> TransactionResult<bool> {
        if self.state == TransactionState::Failed {
            return Err(TransactionError::AlreadyFailed);
        }
        if self.state != TransactionState::AttachmentsPending {
            return Err(TransactionError::NoDraft);
        }
        let message_id = self
            .draft
            .as_ref()
            .map(|draft| draft.id.clone())
            .ok_or(TransactionError::NoDraft)?;

        match self.upload_attachment(&message_id, path.as_ref()).await {
            Ok(()) => Ok(true),
            Err(err) => {
                tracing::error!("Attachment upload failed: {}", err);
                match self.attachment_policy {
                    AttachmentFailurePolicy::ContinueOnFailure => Ok(false),
                    AttachmentFailurePolicy::AbortOnFirstFailure => {
                        self.state = TransactionState::Failed;
                        Err(err.into())
                    }
                }
            }
        }
    }

    async fn upload_attachment(&self, message_id: &str, path: &Path) -> AttachmentResult<()> {
        let attachment = Attachment::from_path(path)?;

        match attachment.policy() {
            UploadPolicy::Inline => {
                attachment::inline::upload_inline(&self.client, message_id, &attachment).await
            }
            UploadPolicy::Chunked => {
                let session =
                    attachment::session::create_upload_session(&self.client, message_id, &attachment)
                        .await?;
                let reader = ChunkReader::open(attachment.path())?;
                let driver =
                    ChunkedUploadDriver::with_policy(self.client.http().clone(), self.chunk_policy);
                driver.upload(&session, reader).await?;
                tracing::debug!("Successfully uploaded byte streams of {}", attachment.name());
                Ok(())
            }
            UploadPolicy::Rejected => {
                tracing::error!("File size is too big to upload: {}", attachment.name());
                Err(AttachmentError::TooLarge {
                    name: attachment.name().to_string(),
                    size: attachment.size(),
                })
            }
        }
    }

    /// Send the draft. Any non-accepted status is terminal failure.
    pub async fn send(&mut self) -> TransactionResult<()> {
        if self.state == TransactionState::Failed {
            return Err(TransactionError::AlreadyFailed);
        }
        if self.state != TransactionState::AttachmentsPending {
            return Err(TransactionError::NoDraft);
        }
        let draft = self.draft.clone().ok_or(TransactionError::NoDraft)?;

        self.state = TransactionState::Sending;
        match self.client.send_draft(&draft.id).await {
            Ok(()) => {
                self.state = TransactionState::Sent;
                tracing::info!("Sent \"{}\" to {}", draft.subject, draft.recipient);
                Ok(())
            }
            Err(err) => {
                self.state = TransactionState::Failed;
                Err(err.into())
            }
        }
    }
}
