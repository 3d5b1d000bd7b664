// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::cancel::run_cancellable;
use crate::modules::common::{Addr, AddrVec};
use crate::modules::error::{code::ErrorCode, MailTaskResult};
use crate::modules::exchange::attachment::save_attachment;
use crate::modules::exchange::client::GraphClient;
use crate::modules::exchange::entity::{ExchangeOptions, ExchangeSettings};
use crate::modules::exchange::model::Message;
use crate::modules::mailbox::ReadQuery;
use crate::modules::message::MessageSummary;
use crate::modules::utils::tls::install_crypto_provider;
use crate::raise_error;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reads up to `query.max_emails` messages from an Exchange inbox through
/// Microsoft Graph, newest first.
pub async fn read_exchange_email(
    settings: &ExchangeSettings,
    options: &ExchangeOptions,
    query: &ReadQuery,
    cancel: &CancellationToken,
) -> MailTaskResult<Vec<MessageSummary>> {
    install_crypto_provider();
    let client = GraphClient::new(settings)?;

    let messages = collect_matching(&client, options, query, cancel).await?;
    if messages.is_empty() {
        if options.throw_error_if_no_messages_found {
            return Err(raise_error!(
                "No messages matching the search criteria found.".into(),
                ErrorCode::NoMessagesFound
            ));
        }
        info!("No matching messages in {}", client.mailbox_url());
        return Ok(Vec::new());
    }

    let save_directory = options.attachment_save_directory.trim();
    let save_attachments = !options.ignore_attachments && !save_directory.is_empty();
    if !options.ignore_attachments && save_directory.is_empty() {
        warn!("No attachment save directory configured, attachments will not be saved");
    }

    let mut summaries = Vec::with_capacity(messages.len());
    for message in &messages {
        let mut summary = summarize(message);
        let has_plain_body = message.body.as_ref().is_some_and(|b| !b.is_html());
        if !has_plain_body {
            summary.body_text = run_cancellable(
                cancel,
                "graph text body",
                client.get_text_body(&message.id),
            )
            .await?
            .unwrap_or_default();
        }

        if save_attachments && message.has_attachments != Some(false) {
            summary.attachment_save_dirs = save_message_attachments(
                &client,
                message,
                Path::new(save_directory),
                options.overwrite_attachment,
                cancel,
            )
            .await?;
        }
        summaries.push(summary);
    }

    // Mailbox changes start only once every message has been read
    for message in &messages {
        if query.mark_emails_as_read {
            run_cancellable(cancel, "graph mark read", client.mark_as_read(&message.id)).await?;
        }
        if query.delete_read_emails {
            run_cancellable(
                cancel,
                "graph delete",
                client.permanent_delete(&message.id),
            )
            .await?;
            debug!("Permanently deleted message {}", message.id);
        }
    }

    info!(
        "Read {} message(s) from {}",
        summaries.len(),
        client.mailbox_url()
    );
    Ok(summaries)
}

async fn collect_matching(
    client: &GraphClient,
    options: &ExchangeOptions,
    query: &ReadQuery,
    cancel: &CancellationToken,
) -> MailTaskResult<Vec<Message>> {
    let mut matches = Vec::new();
    if query.max_emails == 0 {
        return Ok(matches);
    }

    let only_with_attachments =
        !options.ignore_attachments && options.get_only_emails_with_attachments;
    let mut next = Some(
        client.inbox_messages_url(query.get_only_unread_emails, only_with_attachments)?,
    );
    let sender_filter = options.email_sender_filter.trim().to_lowercase();
    let subject_filter = options.email_subject_filter.trim().to_lowercase();

    while let Some(url) = next.take() {
        let page =
            run_cancellable(cancel, "graph list messages", client.list_messages(&url)).await?;
        for message in page.value {
            if matches_sender(&message, &sender_filter) && matches_subject(&message, &subject_filter)
            {
                matches.push(message);
                if matches.len() >= query.max_emails {
                    return Ok(matches);
                }
            }
        }
        next = page.next_link;
    }
    Ok(matches)
}

fn matches_sender(message: &Message, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    [message.from.as_ref(), message.sender.as_ref()]
        .into_iter()
        .flatten()
        .any(|r| {
            let email = &r.email_address;
            [email.address.as_deref(), email.name.as_deref()]
                .into_iter()
                .flatten()
                .any(|v| v.to_lowercase().contains(filter))
        })
}

fn matches_subject(message: &Message, filter: &str) -> bool {
    filter.is_empty()
        || message
            .subject
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(filter))
}

fn summarize(message: &Message) -> MessageSummary {
    let from = message
        .from
        .as_ref()
        .or(message.sender.as_ref())
        .map(|r| Addr::from(r).to_string())
        .unwrap_or_default();
    let date = message
        .received_date_time
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default();

    let (body_text, body_html) = match &message.body {
        Some(body) if body.is_html() => (String::new(), Some(body.content.clone())),
        Some(body) => (body.content.clone(), None),
        None => (String::new(), None),
    };

    MessageSummary {
        id: message.id.clone(),
        to: AddrVec::from(message.to_recipients.as_deref().unwrap_or_default()).to_string(),
        cc: AddrVec::from(message.cc_recipients.as_deref().unwrap_or_default()).to_string(),
        from,
        date,
        subject: message.subject.clone().unwrap_or_default(),
        body_text,
        body_html,
        attachment_save_dirs: Vec::new(),
    }
}

async fn save_message_attachments(
    client: &GraphClient,
    message: &Message,
    directory: &Path,
    overwrite: bool,
    cancel: &CancellationToken,
) -> MailTaskResult<Vec<String>> {
    let attachments = run_cancellable(
        cancel,
        "graph list attachments",
        client.list_attachments(&message.id),
    )
    .await?;

    let mut saved = Vec::new();
    for attachment in attachments {
        let content = match (attachment.is_file_attachment(), &attachment.content_bytes) {
            (true, Some(content)) => content,
            _ => {
                warn!(
                    "Skipping attachment {} of message {}: not a file attachment",
                    attachment.id, message.id
                );
                continue;
            }
        };
        let name = attachment.name.as_deref().unwrap_or_default();
        let path = save_attachment(directory, name, content, overwrite).await?;
        saved.push(path.to_string_lossy().into_owned());
    }
    Ok(saved)
}
