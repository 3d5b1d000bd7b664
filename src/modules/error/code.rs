// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    MissingConfiguration = 10020,
    Cancelled = 10100,

    // Resource errors (30000–30999)
    AttachmentNotFound = 30000,
    NoMessagesFound = 30030,

    // Network connection errors (40000–40999)
    NetworkError = 40000,
    ConnectionTimeout = 40010,
    HttpResponseError = 40030,

    // Mail service errors (50000–50999)
    ImapCommandFailed = 50000,
    ImapAuthenticationFailed = 50010,
    ImapUnexpectedResult = 50020,
    SmtpCommandFailed = 50030,
    SmtpConnectionFailed = 50040,
    GraphApiCallFailed = 50090,

    // Internal system errors (70000–70999)
    InternalError = 70000,
}

impl ErrorCode {
    /// Authentication, TLS, server rejection or connectivity failures reported
    /// by the mail protocol layers.
    pub fn is_protocol_failure(&self) -> bool {
        matches!(
            self,
            ErrorCode::NetworkError
                | ErrorCode::ConnectionTimeout
                | ErrorCode::HttpResponseError
                | ErrorCode::ImapCommandFailed
                | ErrorCode::ImapAuthenticationFailed
                | ErrorCode::ImapUnexpectedResult
                | ErrorCode::SmtpCommandFailed
                | ErrorCode::SmtpConnectionFailed
                | ErrorCode::GraphApiCallFailed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;

    #[test]
    fn only_wire_failures_are_protocol_failures() {
        assert!(ErrorCode::SmtpConnectionFailed.is_protocol_failure());
        assert!(ErrorCode::GraphApiCallFailed.is_protocol_failure());
        assert!(!ErrorCode::AttachmentNotFound.is_protocol_failure());
        assert!(!ErrorCode::NoMessagesFound.is_protocol_failure());
        assert!(!ErrorCode::Cancelled.is_protocol_failure());
        assert_eq!(ErrorCode::InvalidParameter as u32, 10000);
    }
}
