// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, MailTaskResult};
use crate::modules::exchange::entity::ExchangeSettings;
use crate::modules::exchange::http::HttpClient;
use crate::modules::exchange::model::{
    Attachment, AttachmentListResponse, Message, MessageListResponse,
};
use crate::raise_error;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub const GRAPH_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";
const PAGE_SIZE: usize = 50;
const MESSAGE_FIELDS: &str =
    "id,subject,from,sender,toRecipients,ccRecipients,receivedDateTime,hasAttachments,isRead,body";
const TEXT_BODY_PREFERENCE: (&str, &str) = ("Prefer", "outlook.body-content-type=\"text\"");

/// Graph mail operations on one mailbox.
pub struct GraphClient {
    http: HttpClient,
    /// Endpoint plus `/users/{id}` or `/me`.
    mailbox_url: String,
    access_token: String,
}

impl GraphClient {
    pub fn new(settings: &ExchangeSettings) -> MailTaskResult<Self> {
        let endpoint = if settings.use_auto_discover {
            GRAPH_ENDPOINT.to_string()
        } else {
            let address = settings.server_address.trim().trim_end_matches('/');
            if address.is_empty() {
                return Err(raise_error!(
                    "Exchange server address is required when autodiscover is off".into(),
                    ErrorCode::InvalidParameter
                ));
            }
            address.to_string()
        };
        if settings.access_token.trim().is_empty() {
            return Err(raise_error!(
                "Exchange access token cannot be empty".into(),
                ErrorCode::MissingConfiguration
            ));
        }

        let owner = [settings.mailbox.trim(), settings.username.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(|id| format!("/users/{}", urlencoding::encode(id)))
            .unwrap_or_else(|| "/me".to_string());

        Ok(Self {
            http: HttpClient::new()?,
            mailbox_url: format!("{}{}", endpoint, owner),
            access_token: settings.access_token.trim().to_string(),
        })
    }

    pub fn mailbox_url(&self) -> &str {
        &self.mailbox_url
    }

    /// URL of the first inbox page, newest first.
    pub fn inbox_messages_url(
        &self,
        only_unread: bool,
        only_with_attachments: bool,
    ) -> MailTaskResult<String> {
        let mut filters = Vec::new();
        if only_unread {
            filters.push("isRead eq false");
        }
        if only_with_attachments {
            filters.push("hasAttachments eq true");
        }

        let top = PAGE_SIZE.to_string();
        let mut params = vec![
            ("$top", top),
            ("$select", MESSAGE_FIELDS.to_string()),
            ("$orderby", "receivedDateTime desc".to_string()),
        ];
        if !filters.is_empty() {
            // Graph rejects $orderby on a property that is missing from $filter
            let mut clauses = vec!["receivedDateTime ge 1900-01-01T00:00:00Z"];
            clauses.extend(filters);
            params.push(("$filter", clauses.join(" and ")));
        }

        let url = reqwest::Url::parse_with_params(
            &format!("{}/mailFolders/inbox/messages", self.mailbox_url),
            &params,
        )
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InvalidParameter))?;
        Ok(url.to_string())
    }

    /// One page of messages. `url` is either the first page URL or a
    /// previous page's `@odata.nextLink`.
    pub async fn list_messages(&self, url: &str) -> MailTaskResult<MessageListResponse> {
        let value = self.http.get(url, &self.access_token).await?;
        Self::parse(value, "MessageListResponse")
    }

    /// The body converted to plain text by the server.
    pub async fn get_text_body(&self, id: &str) -> MailTaskResult<Option<String>> {
        let url = format!("{}?$select=body", self.message_url(id));
        let value = self
            .http
            .get_with_header(&url, &self.access_token, TEXT_BODY_PREFERENCE)
            .await?;
        let message: Message = Self::parse(value, "Message")?;
        Ok(message.body.map(|b| b.content))
    }

    pub async fn list_attachments(&self, id: &str) -> MailTaskResult<Vec<Attachment>> {
        let mut url = format!("{}/attachments", self.message_url(id));
        let mut attachments = Vec::new();
        loop {
            let value = self.http.get(&url, &self.access_token).await?;
            let page: AttachmentListResponse = Self::parse(value, "AttachmentListResponse")?;
            attachments.extend(page.value);
            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(attachments)
    }

    pub async fn mark_as_read(&self, id: &str) -> MailTaskResult<()> {
        self.http
            .patch(
                &self.message_url(id),
                &self.access_token,
                &json!({ "isRead": true }),
            )
            .await
    }

    /// Deletes the message without moving it to Deleted Items.
    pub async fn permanent_delete(&self, id: &str) -> MailTaskResult<()> {
        let url = format!("{}/permanentDelete", self.message_url(id));
        self.http.post(&url, &self.access_token, None).await
    }

    fn message_url(&self, id: &str) -> String {
        format!("{}/messages/{}", self.mailbox_url, urlencoding::encode(id))
    }

    fn parse<T: DeserializeOwned>(value: Value, type_name: &str) -> MailTaskResult<T> {
        serde_json::from_value::<T>(value).map_err(|e| {
            raise_error!(
                format!(
                    "Failed to deserialize Graph API response into {}: {:#?}. Possible model mismatch or API change.",
                    type_name, e
                ),
                ErrorCode::HttpResponseError
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ExchangeSettings {
        ExchangeSettings {
            use_auto_discover: true,
            username: "agent@example.com".into(),
            access_token: "token".into(),
            ..Default::default()
        }
    }

    #[test]
    fn mailbox_falls_back_to_username_then_me() {
        let client = GraphClient::new(&settings()).unwrap();
        assert_eq!(
            client.mailbox_url(),
            "https://graph.microsoft.com/v1.0/users/agent%40example.com"
        );

        let mut shared = settings();
        shared.mailbox = "shared@example.com".into();
        let client = GraphClient::new(&shared).unwrap();
        assert!(client.mailbox_url().ends_with("/users/shared%40example.com"));

        let mut me = settings();
        me.username.clear();
        me.use_auto_discover = false;
        me.server_address = "https://graph.local/v1.0/".into();
        let client = GraphClient::new(&me).unwrap();
        assert_eq!(client.mailbox_url(), "https://graph.local/v1.0/me");
    }

    #[test]
    fn missing_server_address_is_rejected() {
        let mut manual = settings();
        manual.use_auto_discover = false;
        let error = GraphClient::new(&manual).err().unwrap();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn filters_are_combined() {
        let client = GraphClient::new(&settings()).unwrap();
        let url = reqwest::Url::parse(&client.inbox_messages_url(true, true).unwrap()).unwrap();
        let filter = url
            .query_pairs()
            .find(|(k, _)| k == "$filter")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(
            filter,
            "receivedDateTime ge 1900-01-01T00:00:00Z and isRead eq false and hasAttachments eq true"
        );

        let url = reqwest::Url::parse(&client.inbox_messages_url(false, false).unwrap()).unwrap();
        assert!(!url.query_pairs().any(|(k, _)| k == "$filter"));
    }
}
