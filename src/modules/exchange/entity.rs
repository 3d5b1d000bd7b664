// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExchangeSettings {
    /// Use the public Microsoft Graph endpoint instead of `server_address`.
    pub use_auto_discover: bool,
    /// Graph base URL, e.g. `https://graph.microsoft.com/v1.0`.
    pub server_address: String,
    /// Account the token belongs to. Used as the mailbox when `mailbox` is
    /// empty.
    pub username: String,
    /// OAuth2 bearer token with `Mail.ReadWrite` permission.
    pub access_token: String,
    /// Mailbox to read from, e.g. a shared inbox address.
    pub mailbox: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExchangeOptions {
    /// Case-insensitive substring of the sender address or name.
    pub email_sender_filter: String,
    /// Case-insensitive substring of the subject.
    pub email_subject_filter: String,
    pub throw_error_if_no_messages_found: bool,
    pub ignore_attachments: bool,
    /// Only considered when attachments are not ignored.
    pub get_only_emails_with_attachments: bool,
    pub attachment_save_directory: String,
    /// Replace files with the same name instead of adding a random suffix.
    pub overwrite_attachment: bool,
}
