// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::cancel::run_cancellable;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailTaskResult;
use crate::modules::imap::client::{Client, Session};
use crate::modules::imap::entity::ImapSettings;
use crate::modules::imap::executor::{compress_uid_list, ImapExecutor, DELETED, SEEN};
use crate::modules::mailbox::ReadQuery;
use crate::modules::message::MessageSummary;
use crate::modules::utils::tls::install_crypto_provider;
use crate::raise_error;
use chrono::Utc;
use mail_parser::MessageParser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reads up to `query.max_emails` messages from an IMAP folder.
///
/// The session is logged out before returning, also when a step failed.
pub async fn read_imap_email(
    settings: &ImapSettings,
    query: &ReadQuery,
    cancel: &CancellationToken,
) -> MailTaskResult<Vec<MessageSummary>> {
    install_crypto_provider();
    let client = run_cancellable(cancel, "imap connect", Client::connection(settings)).await?;
    let mut session = run_cancellable(
        cancel,
        "imap login",
        client.login(&settings.user_name, &settings.password),
    )
    .await?;

    let result = read_messages(&mut session, settings, query, cancel).await;

    if !cancel.is_cancelled() {
        if let Err(e) = session.logout().await {
            warn!("IMAP LOGOUT failed: {:#?}", e);
        }
    }
    result
}

async fn read_messages(
    session: &mut Session,
    settings: &ImapSettings,
    query: &ReadQuery,
    cancel: &CancellationToken,
) -> MailTaskResult<Vec<MessageSummary>> {
    let mut executor = ImapExecutor::new(session);
    run_cancellable(
        cancel,
        "imap select",
        executor.select_mailbox(&settings.mailbox),
    )
    .await?;

    let uids = run_cancellable(
        cancel,
        "imap search",
        executor.uid_search(query.get_only_unread_emails),
    )
    .await?;
    let selected: Vec<u32> = uids.into_iter().take(query.max_emails).collect();
    if selected.is_empty() {
        info!("No messages to read in '{}'", settings.mailbox);
        return Ok(Vec::new());
    }

    let uid_set = compress_uid_list(&selected);
    let mut fetches = run_cancellable(
        cancel,
        "imap fetch",
        executor.uid_fetch_full_messages(&uid_set),
    )
    .await?;
    fetches.sort_by_key(|f| f.uid);

    let parser = MessageParser::default();
    let mut summaries = Vec::with_capacity(fetches.len());
    for fetch in &fetches {
        let uid = fetch.uid.ok_or_else(|| {
            raise_error!(
                "FETCH response without UID".into(),
                ErrorCode::ImapUnexpectedResult
            )
        })?;
        // Servers may answer for messages outside the requested set
        if !selected.contains(&uid) {
            continue;
        }
        let body = fetch.body().ok_or_else(|| {
            raise_error!(
                format!("FETCH response for UID {} has no body", uid),
                ErrorCode::ImapUnexpectedResult
            )
        })?;
        let message = parser.parse(body).ok_or_else(|| {
            raise_error!(
                format!("Failed to parse message with UID {}", uid),
                ErrorCode::ImapUnexpectedResult
            )
        })?;
        let internal_date = fetch.internal_date().map(|d| d.with_timezone(&Utc));
        summaries.push(MessageSummary::from_parsed(
            uid.to_string(),
            &message,
            internal_date,
        ));
    }
    debug!("Fetched {} message(s) from '{}'", summaries.len(), settings.mailbox);

    if query.mark_emails_as_read {
        run_cancellable(cancel, "imap mark read", executor.uid_add_flag(&uid_set, SEEN)).await?;
    }
    if query.delete_read_emails {
        run_cancellable(cancel, "imap delete", executor.uid_add_flag(&uid_set, DELETED)).await?;
        run_cancellable(cancel, "imap expunge", executor.expunge()).await?;
        info!("Deleted {} message(s) from '{}'", selected.len(), settings.mailbox);
    }

    Ok(summaries)
}
