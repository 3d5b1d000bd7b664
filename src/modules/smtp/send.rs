// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::cancel::run_cancellable;
use crate::modules::error::MailTaskResult;
use crate::modules::smtp::attachment::{resolve_attachments, AttachmentOutcome, AttachmentSpec};
use crate::modules::smtp::client::Sender;
use crate::modules::smtp::composer::{compose_message, message_encoding};
use crate::modules::smtp::entity::{SendRequest, SendResult, SmtpOptions};
use crate::modules::smtp::manager::SmtpClientManager;
use crate::modules::utils::tls::install_crypto_provider;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Sends one message over SMTP.
///
/// Attachments are resolved and the message is assembled before any
/// connection is opened. A file attachment that matches nothing while
/// neither of its flags is set is not an error: the result comes back with
/// `email_sent = false`.
pub async fn send_email(
    request: &SendRequest,
    attachments: Option<&[AttachmentSpec]>,
    options: &SmtpOptions,
    cancel: &CancellationToken,
) -> MailTaskResult<SendResult> {
    let encoding = message_encoding(&request.message_encoding)?;
    let resolved = match resolve_attachments(attachments.unwrap_or_default(), encoding).await? {
        AttachmentOutcome::Ready(resolved) => resolved,
        AttachmentOutcome::Skipped { file_path } => return Ok(SendResult::skipped(&file_path)),
    };
    let attachment_count = resolved.len();
    let message = compose_message(request, encoding, resolved)?;

    install_crypto_provider();
    let mut client =
        run_cancellable(cancel, "smtp connect", SmtpClientManager::build(options)).await?;
    debug!("SMTP session ready (tls: {})", client.is_tls());
    let sent = run_cancellable(cancel, "smtp send", client.send_email(message)).await;
    if !cancel.is_cancelled() {
        if let Err(e) = client.quit().await {
            warn!("SMTP QUIT failed: {}", e);
        }
    }
    sent?;

    info!(
        "Email sent to: {} ({} attachment(s))",
        request.to, attachment_count
    );
    Ok(SendResult::sent(&request.to))
}
