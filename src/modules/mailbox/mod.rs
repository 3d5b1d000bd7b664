// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::MailTaskResult;
use crate::modules::exchange::entity::{ExchangeOptions, ExchangeSettings};
use crate::modules::exchange::reader::read_exchange_email;
use crate::modules::imap::entity::ImapSettings;
use crate::modules::imap::reader::read_imap_email;
use crate::modules::message::MessageSummary;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Where to read from.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum MailboxConnection {
    Imap(ImapSettings),
    Exchange {
        settings: ExchangeSettings,
        #[serde(default)]
        options: ExchangeOptions,
    },
}

/// Query options shared by both mailbox kinds.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadQuery {
    pub max_emails: usize,
    pub get_only_unread_emails: bool,
    pub mark_emails_as_read: bool,
    /// Permanently delete every message that was read.
    pub delete_read_emails: bool,
}

impl Default for ReadQuery {
    fn default() -> Self {
        Self {
            max_emails: 10,
            get_only_unread_emails: false,
            mark_emails_as_read: false,
            delete_read_emails: false,
        }
    }
}

pub async fn read_email(
    connection: &MailboxConnection,
    query: &ReadQuery,
    cancel: &CancellationToken,
) -> MailTaskResult<Vec<MessageSummary>> {
    match connection {
        MailboxConnection::Imap(settings) => read_imap_email(settings, query, cancel).await,
        MailboxConnection::Exchange { settings, options } => {
            read_exchange_email(settings, options, query, cancel).await
        }
    }
}
