use serde::{Deserialize, Serialize};

/// Draft message payload for `POST /users/{sender}/messages`
#[derive(Debug, Clone, Serialize)]
pub struct DraftRequest {
    pub subject: String,
    pub importance: String,
    pub body: MessageBody,
    #[serde(rename = "toRecipients")]
    pub to_recipients: Vec<Recipient>,
}

impl DraftRequest {
    /// Build a normal-importance HTML draft addressed to a single recipient
    pub fn html(subject: &str, body: &str, recipient: &str) -> Self {
        Self {
            subject: subject.to_string(),
            importance: "Normal".to_string(),
            body: MessageBody {
                content_type: "HTML".to_string(),
                content: body.to_string(),
            },
            to_recipients: vec![Recipient {
                email_address: EmailAddress {
                    address: recipient.to_string(),
                },
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageBody {
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipient {
    #[serde(rename = "emailAddress")]
    pub email_address: EmailAddress,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailAddress {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftResponse {
    pub id: String,
}

/// A created draft, identified by the server-assigned message id.
///
/// The id is required before any attachment or send operation.
#[derive(Debug, Clone)]
pub struct MailDraft {
    pub id: String,
    pub subject: String,
    pub recipient: String,
}
