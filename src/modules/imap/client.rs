// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailTaskResult;
use crate::modules::imap::entity::ImapSettings;
use crate::modules::imap::session::SessionStream;
use crate::modules::utils::net::{
    establish_tcp_connection_with_timeout, establish_tls_connection, resolve_to_socket_addr,
};
use crate::raise_error;
use async_imap::Client as ImapClient;
use async_imap::Session as ImapSession;
use std::net::SocketAddr;
use std::ops::{Deref, DerefMut};
use tokio::io::BufWriter;
use tracing::debug;

pub(crate) type Session = ImapSession<Box<dyn SessionStream>>;

#[derive(Debug)]
pub(crate) struct Client {
    inner: ImapClient<Box<dyn SessionStream>>,
}

impl Deref for Client {
    type Target = ImapClient<Box<dyn SessionStream>>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Client {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

fn alpn(port: u16) -> &'static [&'static str] {
    if port == 993 {
        &[]
    } else {
        &["imap"]
    }
}

impl Client {
    fn new(stream: Box<dyn SessionStream>) -> Self {
        Self {
            inner: ImapClient::new(stream),
        }
    }

    pub(crate) async fn login(self, username: &str, password: &str) -> MailTaskResult<Session> {
        let Client { inner, .. } = self;
        let session = inner.login(username, password).await.map_err(|(e, _)| {
            raise_error!(format!("{:#?}", e), ErrorCode::ImapAuthenticationFailed)
        })?;
        Ok(session)
    }

    /// Connects and consumes the server greeting.
    pub async fn connection(settings: &ImapSettings) -> MailTaskResult<Self> {
        let domain = settings.host.trim();
        let resolved_addr = resolve_to_socket_addr(domain, settings.port).await?;
        debug!("Attempting IMAP connection to {domain} ({resolved_addr}).");
        let mut client = if settings.use_ssl {
            Self::establish_secure_connection(resolved_addr, domain, settings.accept_all_certs)
                .await?
        } else {
            Self::establish_insecure_connection(resolved_addr).await?
        };

        let _greeting = client
            .read_response()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?
            .ok_or_else(|| {
                raise_error!(
                    "failed to read greeting".into(),
                    ErrorCode::ImapCommandFailed
                )
            })?;
        Ok(client)
    }

    async fn establish_secure_connection(
        address: SocketAddr,
        server_hostname: &str,
        accept_all_certs: bool,
    ) -> MailTaskResult<Self> {
        let tls_stream = establish_tls_connection(
            address,
            server_hostname,
            alpn(address.port()),
            accept_all_certs,
        )
        .await?;
        let session_stream: Box<dyn SessionStream> = Box::new(BufWriter::new(tls_stream));
        Ok(Client::new(session_stream))
    }

    async fn establish_insecure_connection(address: SocketAddr) -> MailTaskResult<Self> {
        let tcp_stream = establish_tcp_connection_with_timeout(address).await?;
        let session_stream: Box<dyn SessionStream> = Box::new(BufWriter::new(tcp_stream));
        Ok(Client::new(session_stream))
    }
}
