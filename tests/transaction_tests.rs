//! Mail transaction state machine tests against a mock Graph server
//!
//! This test suite validates:
//! - A failed draft creation is terminal and issues no further requests
//! - The full draft -> attachment -> send sequence, inline and chunked
//! - Oversized attachments are skipped or abort per the configured policy
//! - A failed send is terminal

use std::io::Write;

use graphpost::attachment::{AttachmentError, MIB};
use graphpost::auth::AccessToken;
use graphpost::config::Config;
use graphpost::graph::GraphClient;
use graphpost::transaction::{
    AttachmentFailurePolicy, MailTransaction, TransactionError, TransactionState,
};
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SENDER: &str = "sender@example.com";
const RECIPIENT: &str = "receiver@example.com";

fn graph_client(server: &MockServer) -> GraphClient {
    let config = Config {
        sender_email: SENDER.to_string(),
        graph_base_url: server.uri(),
        request_timeout_secs: 5,
    };
    GraphClient::new(&config, AccessToken::bearer("test-token")).unwrap()
}

fn small_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"spreadsheet bytes").unwrap();
    file.flush().unwrap();
    file
}

fn sparse_file(len: u64) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    file.as_file().set_len(len).unwrap();
    file
}

async fn mount_draft_created(server: &MockServer, message_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/users/{}/messages", SENDER)))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": message_id })),
        )
        .mount(server)
        .await;
}

async fn mount_send_accepted(server: &MockServer, message_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/users/{}/messages/{}/send", SENDER, message_id)))
        .respond_with(ResponseTemplate::new(202))
        .mount(server)
        .await;
}

#[tokio::test]
async fn draft_failure_is_terminal_and_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let file = small_file();
    let mut transaction = MailTransaction::new(graph_client(&server), RECIPIENT);

    let result = transaction.create_draft("Subject", "<p>body</p>").await;
    assert!(matches!(result, Err(TransactionError::Graph(_))));
    assert_eq!(transaction.state(), TransactionState::Failed);

    assert!(matches!(
        transaction.add_attachment(file.path()).await,
        Err(TransactionError::AlreadyFailed)
    ));
    assert!(matches!(
        transaction.send().await,
        Err(TransactionError::AlreadyFailed)
    ));

    // Only the failed draft request ever reached the server
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn full_transaction_with_inline_attachment() {
    let server = MockServer::start().await;
    mount_draft_created(&server, "msg-1").await;
    Mock::given(method("POST"))
        .and(path(format!("/users/{}/messages/msg-1/attachments", SENDER)))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    mount_send_accepted(&server, "msg-1").await;

    let file = small_file();
    let mut transaction = MailTransaction::new(graph_client(&server), RECIPIENT);

    transaction.create_draft("Subject", "<p>body</p>").await.unwrap();
    assert_eq!(transaction.state(), TransactionState::AttachmentsPending);
    assert_eq!(transaction.message_id(), Some("msg-1"));

    // The draft carries what was composed, not just the server-assigned id
    let draft = transaction.draft().unwrap();
    assert_eq!(draft.subject, "Subject");
    assert_eq!(draft.recipient, RECIPIENT);

    assert!(transaction.add_attachment(file.path()).await.unwrap());
    transaction.send().await.unwrap();
    assert_eq!(transaction.state(), TransactionState::Sent);

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(
        paths,
        vec![
            format!("/users/{}/messages", SENDER),
            format!("/users/{}/messages/msg-1/attachments", SENDER),
            format!("/users/{}/messages/msg-1/send", SENDER),
        ]
    );
    for request in &requests {
        assert_eq!(
            request.headers.get("authorization").unwrap().to_str().unwrap(),
            "Bearer test-token"
        );
    }
}

#[tokio::test]
async fn chunked_attachment_goes_through_an_upload_session() {
    let server = MockServer::start().await;
    mount_draft_created(&server, "msg-2").await;

    let upload_url = format!("{}/upload/tx", server.uri());
    Mock::given(method("POST"))
        .and(path(format!(
            "/users/{}/messages/msg-2/attachments/createUploadSession",
            SENDER
        )))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({ "uploadUrl": upload_url })),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/tx"))
        .and(header("content-range", "bytes 2097152-3145727/3145728"))
        .respond_with(ResponseTemplate::new(201))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/tx"))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(5)
        .mount(&server)
        .await;
    mount_send_accepted(&server, "msg-2").await;

    let file = sparse_file(3 * MIB);
    let mut transaction = MailTransaction::new(graph_client(&server), RECIPIENT);

    transaction.create_draft("Subject", "<p>body</p>").await.unwrap();
    assert!(transaction.add_attachment(file.path()).await.unwrap());
    transaction.send().await.unwrap();
    assert_eq!(transaction.state(), TransactionState::Sent);

    let requests = server.received_requests().await.unwrap();
    let puts: Vec<_> = requests.iter().filter(|r| r.method.as_str() == "PUT").collect();
    assert_eq!(puts.len(), 2);
    assert_eq!(
        puts[0].headers.get("content-range").unwrap().to_str().unwrap(),
        "bytes 0-2097151/3145728"
    );
    assert_eq!(
        puts[1].headers.get("content-range").unwrap().to_str().unwrap(),
        "bytes 2097152-3145727/3145728"
    );
}

#[tokio::test]
async fn oversized_attachment_is_skipped_under_continue_policy() {
    let server = MockServer::start().await;
    mount_draft_created(&server, "msg-3").await;
    mount_send_accepted(&server, "msg-3").await;

    let file = sparse_file(37 * MIB);
    let mut transaction = MailTransaction::new(graph_client(&server), RECIPIENT);

    transaction.create_draft("Subject", "<p>body</p>").await.unwrap();
    assert!(!transaction.add_attachment(file.path()).await.unwrap());

    // The rejected attachment never produced an upload request
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    transaction.send().await.unwrap();
    assert_eq!(transaction.state(), TransactionState::Sent);
}

#[tokio::test]
async fn oversized_attachment_aborts_under_abort_policy() {
    let server = MockServer::start().await;
    mount_draft_created(&server, "msg-4").await;

    let file = sparse_file(37 * MIB);
    let mut transaction = MailTransaction::new(graph_client(&server), RECIPIENT)
        .with_attachment_policy(AttachmentFailurePolicy::AbortOnFirstFailure);

    transaction.create_draft("Subject", "<p>body</p>").await.unwrap();

    let result = transaction.add_attachment(file.path()).await;
    assert!(matches!(
        result,
        Err(TransactionError::Attachment(AttachmentError::TooLarge { .. }))
    ));
    assert_eq!(transaction.state(), TransactionState::Failed);
}

#[tokio::test]
async fn send_failure_is_terminal() {
    let server = MockServer::start().await;
    mount_draft_created(&server, "msg-5").await;
    Mock::given(method("POST"))
        .and(path(format!("/users/{}/messages/msg-5/send", SENDER)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut transaction = MailTransaction::new(graph_client(&server), RECIPIENT);
    transaction.create_draft("Subject", "<p>body</p>").await.unwrap();

    let result = transaction.send().await;
    assert!(matches!(result, Err(TransactionError::Graph(_))));
    assert_eq!(transaction.state(), TransactionState::Failed);
}

#[tokio::test]
async fn attachment_before_draft_is_rejected() {
    let server = MockServer::start().await;
    let file = small_file();
    let mut transaction = MailTransaction::new(graph_client(&server), RECIPIENT);

    assert!(matches!(
        transaction.add_attachment(file.path()).await,
        Err(TransactionError::NoDraft)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
