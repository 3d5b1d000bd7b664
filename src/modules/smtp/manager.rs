// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailTaskResult;
use crate::modules::smtp::client::MailTaskSmtpClient;
use crate::modules::smtp::entity::{SecureSocketOption, SmtpOptions};
use crate::raise_error;
use mail_send::smtp::tls::build_tls_connector;
use mail_send::smtp::AssertReply;
use mail_send::{Credentials, SmtpClient};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, info};

pub const EXT_START_TLS: u32 = 1 << 24;
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
const IMPLICIT_TLS_PORT: u16 = 465;

/// Concrete connection behaviour after `SecureSocketOption::Auto` has been
/// decided for the configured port.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encryption {
    None,
    Ssl,
    StartTls,
    StartTlsWhenAvailable,
}

impl Encryption {
    pub fn resolve(option: SecureSocketOption, port: u16) -> Self {
        match option {
            SecureSocketOption::None => Encryption::None,
            SecureSocketOption::SslOnConnect => Encryption::Ssl,
            SecureSocketOption::StartTls => Encryption::StartTls,
            SecureSocketOption::StartTlsWhenAvailable => Encryption::StartTlsWhenAvailable,
            SecureSocketOption::Auto if port == IMPLICIT_TLS_PORT => Encryption::Ssl,
            SecureSocketOption::Auto => Encryption::StartTlsWhenAvailable,
        }
    }
}

pub struct SmtpClientManager;

impl SmtpClientManager {
    /// Opens, secures and authenticates one SMTP session.
    pub async fn build(options: &SmtpOptions) -> MailTaskResult<MailTaskSmtpClient> {
        let host = options.smtp_server.trim();
        if host.is_empty() {
            return Err(raise_error!(
                "SMTP server address cannot be empty".into(),
                ErrorCode::InvalidParameter
            ));
        }
        let encryption = Encryption::resolve(options.secure_socket, options.port);
        let credentials = (!options.user_name.trim().is_empty())
            .then(|| Credentials::new(options.user_name.clone(), options.password.clone()));

        info!(
            "Connecting to SMTP server {}:{} ({:?})",
            host, options.port, encryption
        );
        let tcp_stream = tokio::time::timeout(SMTP_TIMEOUT, TcpStream::connect((host, options.port)))
            .await
            .map_err(|_| {
                raise_error!(
                    format!(
                        "Connection to {}:{} timed out after {}s",
                        host,
                        options.port,
                        SMTP_TIMEOUT.as_secs()
                    ),
                    ErrorCode::ConnectionTimeout
                )
            })?
            .map_err(|e| raise_error!(e.to_string(), ErrorCode::SmtpConnectionFailed))?;

        Self::connect(
            encryption,
            host,
            SMTP_TIMEOUT,
            tcp_stream,
            credentials,
            options.accept_all_certs,
        )
        .await
        .map_err(|e| match e {
            mail_send::Error::Timeout => raise_error!(
                format!("SMTP handshake with {} timed out", host),
                ErrorCode::ConnectionTimeout
            ),
            e => raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed),
        })
    }

    async fn connect(
        encryption: Encryption,
        host: &str,
        timeout: Duration,
        tcp_stream: TcpStream,
        credentials: Option<Credentials<String>>,
        accept_all_certs: bool,
    ) -> Result<MailTaskSmtpClient, mail_send::Error> {
        tokio::time::timeout(timeout, async {
            let mut client = SmtpClient {
                stream: tcp_stream,
                timeout,
            };

            let local_host = gethostname::gethostname()
                .to_str()
                .unwrap_or("[127.0.0.1]")
                .to_string();
            let tls_connector = build_tls_connector(accept_all_certs);
            match encryption {
                Encryption::Ssl => {
                    let mut client = client.into_tls(&tls_connector, host).await?;
                    // Read greeting
                    client.read().await?.assert_positive_completion()?;
                    let capabilities = client.capabilities(&local_host, false).await?;
                    if let Some(credentials) = &credentials {
                        client.authenticate(credentials, &capabilities).await?;
                    }
                    Ok(MailTaskSmtpClient::Tls(client))
                }
                Encryption::StartTls | Encryption::StartTlsWhenAvailable => {
                    // Read greeting
                    client.read().await?.assert_positive_completion()?;
                    let response = client.ehlo(&local_host).await?;
                    if response.has_capability(EXT_START_TLS) {
                        let mut client = client.start_tls(&tls_connector, host).await?;
                        let capabilities = client.capabilities(&local_host, false).await?;
                        if let Some(credentials) = &credentials {
                            client.authenticate(credentials, &capabilities).await?;
                        }
                        Ok(MailTaskSmtpClient::Tls(client))
                    } else if encryption == Encryption::StartTls {
                        Err(mail_send::Error::MissingStartTls)
                    } else {
                        debug!("Server {} does not offer STARTTLS, staying on plaintext", host);
                        if let Some(credentials) = &credentials {
                            client.authenticate(credentials, &response).await?;
                        }
                        Ok(MailTaskSmtpClient::Plain(client))
                    }
                }
                Encryption::None => {
                    // Read greeting
                    client.read().await?.assert_positive_completion()?;
                    let capabilities = client.capabilities(&local_host, false).await?;
                    if let Some(credentials) = &credentials {
                        client.authenticate(credentials, &capabilities).await?;
                    }
                    Ok(MailTaskSmtpClient::Plain(client))
                }
            }
        })
        .await
        .map_err(|_| mail_send::Error::Timeout)?
    }
}
