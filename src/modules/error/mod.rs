// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use code::ErrorCode;
use snafu::{Location, Snafu};

pub mod code;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MailTaskError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
}

pub type MailTaskResult<T, E = MailTaskError> = std::result::Result<T, E>;

impl MailTaskError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MailTaskError::Generic { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            MailTaskError::Generic { message, .. } => message,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            MailTaskError::Generic { location, .. } => location,
        }
    }
}
