// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailTaskResult;
use crate::raise_error;
use mail_send::smtp::message::IntoMessage;
use mail_send::SmtpClient;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

pub enum MailTaskSmtpClient {
    Plain(SmtpClient<TcpStream>),
    Tls(SmtpClient<TlsStream<TcpStream>>),
}

pub(crate) trait Sender {
    async fn send_email<'x>(&mut self, message: impl IntoMessage<'x>) -> MailTaskResult<()>;
    async fn quit(self) -> MailTaskResult<()>;
}

impl Sender for MailTaskSmtpClient {
    async fn send_email<'x>(&mut self, message: impl IntoMessage<'x>) -> MailTaskResult<()> {
        match self {
            MailTaskSmtpClient::Plain(smtp_client) => smtp_client
                .send(message)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            MailTaskSmtpClient::Tls(smtp_client) => smtp_client
                .send(message)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }

    async fn quit(self) -> MailTaskResult<()> {
        match self {
            MailTaskSmtpClient::Plain(smtp_client) => smtp_client
                .quit()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            MailTaskSmtpClient::Tls(smtp_client) => smtp_client
                .quit()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }
}

impl MailTaskSmtpClient {
    pub fn is_tls(&self) -> bool {
        matches!(self, MailTaskSmtpClient::Tls(_))
    }
}
