// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::utils::tls::establish_tls_stream;
use crate::modules::{error::MailTaskResult, imap::session::SessionStream};
use crate::raise_error;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_io_timeout::TimeoutStream;
use tracing::error;

pub(crate) const TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) async fn establish_tcp_connection_with_timeout(
    address: SocketAddr,
) -> MailTaskResult<Pin<Box<TimeoutStream<TcpStream>>>> {
    let tcp_stream = timeout(TIMEOUT, TcpStream::connect(address))
        .await
        .map_err(|_| {
            error!(
                "TCP connection to {} timed out after {}s",
                address,
                TIMEOUT.as_secs()
            );
            raise_error!(
                format!(
                    "TCP connection to {} timed out after {}s",
                    address,
                    TIMEOUT.as_secs()
                ),
                ErrorCode::ConnectionTimeout
            )
        })?
        .map_err(|e| raise_error!(e.to_string(), ErrorCode::NetworkError))?;

    // Disable Nagle's algorithm
    tcp_stream
        .set_nodelay(true)
        .map_err(|e| raise_error!(e.to_string(), ErrorCode::NetworkError))?;

    let mut timeout_stream = TimeoutStream::new(tcp_stream);
    timeout_stream.set_write_timeout(Some(TIMEOUT));
    timeout_stream.set_read_timeout(Some(TIMEOUT));

    Ok(Box::pin(timeout_stream))
}

pub(crate) async fn establish_tls_connection(
    address: SocketAddr,
    server_hostname: &str,
    alpn_protocols: &[&str],
    accept_all_certs: bool,
) -> MailTaskResult<Box<dyn SessionStream>> {
    let tcp_stream = establish_tcp_connection_with_timeout(address).await?;
    establish_tls_stream(server_hostname, alpn_protocols, accept_all_certs, tcp_stream).await
}

pub(crate) async fn resolve_to_socket_addr(domain: &str, port: u16) -> MailTaskResult<SocketAddr> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(raise_error!(
            "Host address cannot be empty".into(),
            ErrorCode::InvalidParameter
        ));
    }
    if domain.contains(|c: char| !c.is_ascii()) {
        return Err(raise_error!(
            format!("Invalid domain format: '{}'", domain),
            ErrorCode::InvalidParameter
        ));
    }

    let mut socket_addrs = tokio::net::lookup_host((domain, port))
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::NetworkError))?;

    socket_addrs.next().ok_or_else(|| {
        raise_error!(
            format!("Unable to resolve address '{}:{}'", domain, port),
            ErrorCode::NetworkError
        )
    })
}

#[cfg(test)]
mod tests {
    use super::resolve_to_socket_addr;
    use crate::modules::error::code::ErrorCode;

    #[tokio::test]
    async fn resolves_ip_literals() {
        let addr = resolve_to_socket_addr("127.0.0.1", 993).await.unwrap();
        assert_eq!(addr.port(), 993);
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn rejects_empty_and_non_ascii_hosts() {
        let error = resolve_to_socket_addr("  ", 25).await.unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
        let error = resolve_to_socket_addr("exämple.com", 25).await.unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
    }
}
