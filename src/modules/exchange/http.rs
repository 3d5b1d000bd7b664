// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::{mailtasks_version, modules::error::MailTaskResult, raise_error};
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer-authenticated JSON client for the Graph REST API.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> MailTaskResult<HttpClient> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(format!("mailtasks/{}", mailtasks_version!()))
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| {
                raise_error!(
                    format!("Failed to build HTTP client: {:#?}", e),
                    ErrorCode::InternalError
                )
            })?;
        Ok(Self { client })
    }

    pub async fn get(&self, url: &str, access_token: &str) -> MailTaskResult<Value> {
        let response = Self::send(self.client.get(url).bearer_auth(access_token), url).await?;
        Self::json(response, url).await
    }

    /// GET with one extra request header, e.g. `Prefer`.
    pub async fn get_with_header(
        &self,
        url: &str,
        access_token: &str,
        header: (&str, &str),
    ) -> MailTaskResult<Value> {
        let request = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(header.0, header.1);
        let response = Self::send(request, url).await?;
        Self::json(response, url).await
    }

    pub async fn patch(&self, url: &str, access_token: &str, data: &Value) -> MailTaskResult<()> {
        Self::send(self.client.patch(url).bearer_auth(access_token).json(data), url).await?;
        Ok(())
    }

    pub async fn post(
        &self,
        url: &str,
        access_token: &str,
        data: Option<&Value>,
    ) -> MailTaskResult<()> {
        let mut request = self.client.post(url).bearer_auth(access_token);
        request = match data {
            Some(data) => request.json(data),
            // Graph wants an explicit empty body on action endpoints
            None => request.header(reqwest::header::CONTENT_LENGTH, 0),
        };
        Self::send(request, url).await?;
        Ok(())
    }

    async fn send(request: RequestBuilder, url: &str) -> MailTaskResult<Response> {
        let response = request.send().await.map_err(|e| {
            let code = if e.is_timeout() {
                ErrorCode::ConnectionTimeout
            } else {
                ErrorCode::NetworkError
            };
            raise_error!(format!("Request to {} failed: {:#?}", url, e), code)
        })?;

        let status = response.status();
        debug!("{} -> {}", url, status);
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("Graph API call to {} failed with {}: {}", url, status, body);
        Err(raise_error!(
            format!("Graph API call failed with {}: {}", status, body),
            ErrorCode::GraphApiCallFailed
        ))
    }

    async fn json(response: Response, url: &str) -> MailTaskResult<Value> {
        response.json::<Value>().await.map_err(|e| {
            raise_error!(
                format!("Invalid JSON from {}: {:#?}", url, e),
                ErrorCode::HttpResponseError
            )
        })
    }
}
