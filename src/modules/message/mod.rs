// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::AddrVec;
use chrono::{DateTime, Utc};
use mail_parser::{Message, PartType};
use serde::{Deserialize, Serialize};

/// One retrieved message, as handed back to the host.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct MessageSummary {
    /// IMAP UID, or the Graph message id.
    pub id: String,
    pub to: String,
    pub cc: String,
    pub from: String,
    pub date: DateTime<Utc>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    /// Where the attachments of this message were written.
    pub attachment_save_dirs: Vec<String>,
}

impl MessageSummary {
    /// Maps a parsed RFC 5322 message. `fallback_date` is used when the
    /// message has no usable `Date:` header.
    pub fn from_parsed(
        id: impl Into<String>,
        message: &Message<'_>,
        fallback_date: Option<DateTime<Utc>>,
    ) -> Self {
        let header_date = message
            .date()
            .and_then(|d| DateTime::<Utc>::from_timestamp(d.to_timestamp(), 0));
        MessageSummary {
            id: id.into(),
            to: joined(message.to().map(AddrVec::from)),
            cc: joined(message.cc().map(AddrVec::from)),
            from: joined(message.from().map(AddrVec::from)),
            date: header_date.or(fallback_date).unwrap_or_default(),
            subject: message.subject().unwrap_or_default().to_string(),
            body_text: message
                .body_text(0)
                .map(|b| b.into_owned())
                .unwrap_or_default(),
            body_html: html_body(message),
            attachment_save_dirs: Vec::new(),
        }
    }
}

fn joined(addresses: Option<AddrVec>) -> String {
    addresses.map(|a| a.to_string()).unwrap_or_default()
}

// body_html(0) would render a text part as HTML, so only real HTML parts count
fn html_body(message: &Message<'_>) -> Option<String> {
    message
        .html_body
        .first()
        .and_then(|id| message.part(*id))
        .and_then(|part| match &part.body {
            PartType::Html(html) => Some(html.to_string()),
            _ => None,
        })
}
