// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::{Addr, AddrVec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessageListResponse {
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    #[serde(default)]
    pub value: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Message {
    pub id: String,
    pub subject: Option<String>,
    #[serde(rename = "isRead")]
    pub is_read: Option<bool>,
    #[serde(rename = "hasAttachments")]
    pub has_attachments: Option<bool>,
    #[serde(rename = "receivedDateTime")]
    pub received_date_time: Option<String>,
    pub body: Option<ItemBody>,
    pub from: Option<Recipient>,
    pub sender: Option<Recipient>,
    #[serde(rename = "toRecipients")]
    pub to_recipients: Option<Vec<Recipient>>,
    #[serde(rename = "ccRecipients")]
    pub cc_recipients: Option<Vec<Recipient>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemBody {
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub content: String,
}

impl ItemBody {
    pub fn is_html(&self) -> bool {
        self.content_type.eq_ignore_ascii_case("html")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Recipient {
    #[serde(rename = "emailAddress")]
    pub email_address: EmailAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmailAddress {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl From<&Recipient> for Addr {
    fn from(recipient: &Recipient) -> Self {
        Addr::new(
            recipient.email_address.name.as_deref(),
            recipient.email_address.address.as_deref(),
        )
    }
}

impl From<&[Recipient]> for AddrVec {
    fn from(recipients: &[Recipient]) -> Self {
        AddrVec(recipients.iter().map(Addr::from).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AttachmentListResponse {
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    #[serde(default)]
    pub value: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Attachment {
    #[serde(rename = "@odata.type")]
    pub odata_type: Option<String>,
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
    pub size: Option<u64>,
    #[serde(rename = "isInline")]
    pub is_inline: Option<bool>,
    /// Base64 content, only present on file attachments.
    #[serde(rename = "contentBytes")]
    pub content_bytes: Option<String>,
}

impl Attachment {
    pub fn is_file_attachment(&self) -> bool {
        self.odata_type
            .as_deref()
            .map(|t| t.eq_ignore_ascii_case("#microsoft.graph.fileAttachment"))
            .unwrap_or(self.content_bytes.is_some())
    }
}
