// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImapSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS. When false the session runs in plaintext.
    pub use_ssl: bool,
    /// Skip certificate validation.
    pub accept_all_certs: bool,
    pub user_name: String,
    pub password: String,
    /// Folder to read from.
    pub mailbox: String,
}

impl Default for ImapSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 993,
            use_ssl: true,
            accept_all_certs: false,
            user_name: String::new(),
            password: String::new(),
            mailbox: "INBOX".into(),
        }
    }
}
