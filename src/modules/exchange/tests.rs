// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::base64_encode;
use crate::modules::error::code::ErrorCode;
use crate::modules::exchange::entity::{ExchangeOptions, ExchangeSettings};
use crate::modules::exchange::reader::read_exchange_email;
use crate::modules::mailbox::ReadQuery;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INBOX: &str = "/users/agent/mailFolders/inbox/messages";
const TEXT_PREFERENCE: &str = "outlook.body-content-type=\"text\"";

fn settings(server: &MockServer) -> ExchangeSettings {
    ExchangeSettings {
        use_auto_discover: false,
        server_address: format!("{}/", server.uri()),
        username: "agent".into(),
        access_token: "graph-token".into(),
        mailbox: String::new(),
    }
}

fn message(id: &str, subject: &str, from: &str, html: bool, has_attachments: bool) -> Value {
    let body = if html {
        json!({"contentType": "html", "content": format!("<p>{}</p>", subject)})
    } else {
        json!({"contentType": "text", "content": subject})
    };
    json!({
        "id": id,
        "subject": subject,
        "isRead": false,
        "hasAttachments": has_attachments,
        "receivedDateTime": "2025-06-02T08:30:00Z",
        "body": body,
        "from": {"emailAddress": {"name": "Sender", "address": from}},
        "toRecipients": [{"emailAddress": {"name": "Agent", "address": "agent@example.com"}}],
        "ccRecipients": []
    })
}

async fn mount_inbox(server: &MockServer, messages: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(INBOX))
        .and(header("Authorization", "Bearer graph-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": messages })))
        .mount(server)
        .await;
}

fn query(max_emails: usize) -> ReadQuery {
    ReadQuery {
        max_emails,
        ..Default::default()
    }
}

#[tokio::test]
async fn filters_and_maps_matching_messages() {
    let server = MockServer::start().await;
    mount_inbox(
        &server,
        vec![
            message("m1", "Lunch plans", "friend@example.com", false, false),
            message("m2", "Invoice June", "billing@vendor.com", true, false),
            message("m3", "Invoice July", "billing@other.com", false, false),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/users/agent/messages/m2"))
        .and(query_param("$select", "body"))
        .and(header("Prefer", TEXT_PREFERENCE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m2",
            "body": {"contentType": "text", "content": "Invoice June"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = ExchangeOptions {
        email_sender_filter: "VENDOR.com".into(),
        email_subject_filter: "invoice".into(),
        ..Default::default()
    };
    let summaries = read_exchange_email(
        &settings(&server),
        &options,
        &query(10),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.id, "m2");
    assert_eq!(summary.from, "Sender <billing@vendor.com>");
    assert_eq!(summary.to, "Agent <agent@example.com>");
    assert_eq!(summary.subject, "Invoice June");
    assert_eq!(summary.body_text, "Invoice June");
    assert_eq!(summary.body_html.as_deref(), Some("<p>Invoice June</p>"));
    assert_eq!(summary.date.to_rfc3339(), "2025-06-02T08:30:00+00:00");
    assert!(summary.attachment_save_dirs.is_empty());
}

#[tokio::test]
async fn follows_next_link_until_max_is_reached() {
    let server = MockServer::start().await;
    let next_link = format!("{}{}?$skiptoken=page2", server.uri(), INBOX);
    Mock::given(method("GET"))
        .and(path(INBOX))
        .and(query_param("$top", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.nextLink": next_link,
            "value": [
                message("m1", "one", "a@example.com", false, false),
                message("m2", "two", "a@example.com", false, false)
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                message("m3", "three", "a@example.com", false, false),
                message("m4", "four", "a@example.com", false, false)
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summaries = read_exchange_email(
        &settings(&server),
        &ExchangeOptions::default(),
        &query(3),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2", "m3"]);
    assert_eq!(summaries[2].body_text, "three");
    assert_eq!(summaries[2].body_html, None);
}

#[tokio::test]
async fn empty_result_only_fails_when_requested() {
    let server = MockServer::start().await;
    mount_inbox(&server, vec![]).await;

    let summaries = read_exchange_email(
        &settings(&server),
        &ExchangeOptions::default(),
        &query(5),
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert!(summaries.is_empty());

    let options = ExchangeOptions {
        throw_error_if_no_messages_found: true,
        ..Default::default()
    };
    let error = read_exchange_email(
        &settings(&server),
        &options,
        &query(5),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(error.code(), ErrorCode::NoMessagesFound);
}

#[tokio::test]
async fn zero_max_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let summaries = read_exchange_email(
        &settings(&server),
        &ExchangeOptions::default(),
        &query(0),
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert!(summaries.is_empty());
}

#[tokio::test]
async fn unread_and_attachment_filters_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .and(query_param(
            "$filter",
            "receivedDateTime ge 1900-01-01T00:00:00Z and isRead eq false and hasAttachments eq true",
        ))
        .and(query_param("$orderby", "receivedDateTime desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let options = ExchangeOptions {
        get_only_emails_with_attachments: true,
        ..Default::default()
    };
    let query = ReadQuery {
        get_only_unread_emails: true,
        ..query(10)
    };
    let summaries = read_exchange_email(
        &settings(&server),
        &options,
        &query,
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert!(summaries.is_empty());
}

#[tokio::test]
async fn saves_file_attachments_next_to_existing_ones() {
    let server = MockServer::start().await;
    mount_inbox(
        &server,
        vec![message("m1", "Report", "a@example.com", false, true)],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/users/agent/messages/m1/attachments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {
                    "@odata.type": "#microsoft.graph.fileAttachment",
                    "id": "a1",
                    "name": "report.pdf",
                    "contentType": "application/pdf",
                    "size": 8,
                    "isInline": false,
                    "contentBytes": base64_encode!(b"%PDF-new")
                },
                {
                    "@odata.type": "#microsoft.graph.itemAttachment",
                    "id": "a2",
                    "name": "Forwarded message"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("report.pdf"), b"%PDF-old").unwrap();
    let options = ExchangeOptions {
        attachment_save_directory: dir.path().to_string_lossy().into_owned(),
        ..Default::default()
    };
    let summaries = read_exchange_email(
        &settings(&server),
        &options,
        &query(10),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let saved = &summaries[0].attachment_save_dirs;
    assert_eq!(saved.len(), 1);
    assert_ne!(saved[0], dir.path().join("report.pdf").to_string_lossy());
    assert_eq!(std::fs::read(&saved[0]).unwrap(), b"%PDF-new");
    assert_eq!(
        std::fs::read(dir.path().join("report.pdf")).unwrap(),
        b"%PDF-old"
    );
}

#[tokio::test]
async fn ignored_attachments_are_not_downloaded() {
    let server = MockServer::start().await;
    mount_inbox(
        &server,
        vec![message("m1", "Report", "a@example.com", false, true)],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/users/agent/messages/m1/attachments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let options = ExchangeOptions {
        ignore_attachments: true,
        attachment_save_directory: dir.path().to_string_lossy().into_owned(),
        ..Default::default()
    };
    let summaries = read_exchange_email(
        &settings(&server),
        &options,
        &query(10),
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert!(summaries[0].attachment_save_dirs.is_empty());
}

#[tokio::test]
async fn marks_read_then_deletes() {
    let server = MockServer::start().await;
    mount_inbox(
        &server,
        vec![message("m1", "Done", "a@example.com", false, false)],
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/users/agent/messages/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "m1", "isRead": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/agent/messages/m1/permanentDelete"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let query = ReadQuery {
        mark_emails_as_read: true,
        delete_read_emails: true,
        ..query(10)
    };
    let summaries = read_exchange_email(
        &settings(&server),
        &ExchangeOptions::default(),
        &query,
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(summaries.len(), 1);
}

#[tokio::test]
async fn rejected_token_is_a_graph_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "InvalidAuthenticationToken", "message": "Access token has expired."}
        })))
        .mount(&server)
        .await;

    let error = read_exchange_email(
        &settings(&server),
        &ExchangeOptions::default(),
        &query(10),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(error.code(), ErrorCode::GraphApiCallFailed);
    assert!(error.code().is_protocol_failure());
    assert!(error.message().contains("401"));
}

#[tokio::test]
async fn cancelled_before_first_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let error = read_exchange_email(
        &settings(&server),
        &ExchangeOptions::default(),
        &query(10),
        &cancel,
    )
    .await
    .unwrap_err();
    assert_eq!(error.code(), ErrorCode::Cancelled);
}

#[tokio::test]
async fn missing_server_address_is_rejected() {
    let settings = ExchangeSettings {
        username: "agent".into(),
        access_token: "graph-token".into(),
        ..Default::default()
    };
    let error = read_exchange_email(
        &settings,
        &ExchangeOptions::default(),
        &query(10),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(error.code(), ErrorCode::InvalidParameter);
}

#[tokio::test]
async fn failed_read_leaves_mailbox_unchanged() {
    let server = MockServer::start().await;
    mount_inbox(
        &server,
        vec![
            message("m1", "First", "a@example.com", false, false),
            message("m2", "Second", "a@example.com", false, true),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/users/agent/messages/m2/attachments"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let options = ExchangeOptions {
        attachment_save_directory: dir.path().to_string_lossy().into_owned(),
        ..Default::default()
    };
    let query = ReadQuery {
        mark_emails_as_read: true,
        delete_read_emails: true,
        ..query(10)
    };
    let error = read_exchange_email(
        &settings(&server),
        &options,
        &query,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(error.code(), ErrorCode::GraphApiCallFailed);
}
