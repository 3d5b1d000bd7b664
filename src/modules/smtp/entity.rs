// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// The message to send.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SendRequest {
    /// Recipient addresses separated by `,` or `;`.
    pub to: String,
    pub cc: String,
    pub bcc: String,
    /// Sender address. Must resolve to exactly one mailbox.
    pub from: String,
    /// Display name shown next to the sender address.
    pub sender_name: String,
    pub subject: String,
    pub message: String,
    pub is_message_html: bool,
    /// Encoding label used for the body, subject and string attachments,
    /// e.g. `utf-8` or `iso-8859-1`.
    pub message_encoding: String,
}

impl Default for SendRequest {
    fn default() -> Self {
        Self {
            to: String::new(),
            cc: String::new(),
            bcc: String::new(),
            from: String::new(),
            sender_name: String::new(),
            subject: String::new(),
            message: String::new(),
            is_message_html: false,
            message_encoding: "utf-8".into(),
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub enum SecureSocketOption {
    /// Plaintext, never upgraded.
    None,
    /// Implicit TLS on port 465, otherwise STARTTLS when the server offers it.
    #[default]
    Auto,
    /// TLS from the first byte.
    SslOnConnect,
    /// STARTTLS, failing when the server does not offer it.
    StartTls,
    /// STARTTLS when offered, plaintext otherwise.
    StartTlsWhenAvailable,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SmtpOptions {
    pub smtp_server: String,
    pub port: u16,
    pub secure_socket: SecureSocketOption,
    /// Skip certificate validation.
    pub accept_all_certs: bool,
    /// Leave empty to send without authentication.
    pub user_name: String,
    pub password: String,
}

impl Default for SmtpOptions {
    fn default() -> Self {
        Self {
            smtp_server: String::new(),
            port: 25,
            secure_socket: SecureSocketOption::Auto,
            accept_all_certs: false,
            user_name: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct SendResult {
    pub email_sent: bool,
    pub status_string: String,
}

impl SendResult {
    pub fn sent(to: &str) -> Self {
        Self {
            email_sent: true,
            status_string: format!("Email sent to: {}", to),
        }
    }

    pub fn skipped(file_path: &str) -> Self {
        Self {
            email_sent: false,
            status_string: format!(
                "No attachments found matching path \"{}\". No email sent.",
                file_path
            ),
        }
    }
}
