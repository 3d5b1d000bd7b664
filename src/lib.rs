// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

//! Email integration tasks for a workflow host.
//!
//! Two single-shot operations are exposed:
//!
//! - [`send_email`] assembles one message (with optional file or string
//!   attachments) and transmits it over SMTP.
//! - [`read_email`] fetches a bounded list of messages from an IMAP or
//!   Exchange mailbox, optionally marking them read, deleting them, and
//!   saving their attachments.
//!
//! The SMTP, IMAP and Graph conversations are delegated to `mail-send`,
//! `async-imap` and `reqwest`; this crate owns input normalization, attachment
//! resolution, message assembly and result mapping.

pub mod modules;

pub use modules::error::{code::ErrorCode, MailTaskError, MailTaskResult};
pub use modules::exchange::entity::{ExchangeOptions, ExchangeSettings};
pub use modules::exchange::reader::read_exchange_email;
pub use modules::imap::entity::ImapSettings;
pub use modules::imap::reader::read_imap_email;
pub use modules::logger::initialize_logging;
pub use modules::mailbox::{read_email, MailboxConnection, ReadQuery};
pub use modules::message::MessageSummary;
pub use modules::smtp::attachment::{AttachmentFromString, AttachmentSpec, FileAttachment};
pub use modules::smtp::entity::{SecureSocketOption, SendRequest, SendResult, SmtpOptions};
pub use modules::smtp::send::send_email;
pub use tokio_util::sync::CancellationToken;
