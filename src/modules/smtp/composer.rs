// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, MailTaskResult};
use crate::modules::smtp::address::{sender_address, split_addresses, to_address};
use crate::modules::smtp::attachment::ResolvedAttachment;
use crate::modules::smtp::entity::SendRequest;
use crate::{base64_encode, get_encoding, raise_error};
use encoding_rs::Encoding;
use mail_send::mail_builder::headers::content_type::ContentType;
use mail_send::mail_builder::headers::raw::Raw;
use mail_send::mail_builder::mime::{BodyPart, MimePart};
use mail_send::mail_builder::MessageBuilder;
use mail_send::smtp::message::{IntoMessage, Message};
use tracing::warn;

// Keeps each encoded word under the 75 character limit of RFC 2047.
const MAX_ENCODED_WORD_BYTES: usize = 39;

/// Resolves the configured text encoding label.
pub fn message_encoding(label: &str) -> MailTaskResult<&'static Encoding> {
    get_encoding!(label).ok_or_else(|| {
        raise_error!(
            format!("Unknown message encoding '{}'", label),
            ErrorCode::InvalidParameter
        )
    })
}

/// Builds the outgoing message and its SMTP envelope. Bcc recipients only
/// appear in the envelope, never in the rendered headers.
pub fn compose_message(
    request: &SendRequest,
    encoding: &'static Encoding,
    attachments: Vec<ResolvedAttachment>,
) -> MailTaskResult<Message<'static>> {
    let builder = build_message(request, encoding, attachments)?;
    let mut message = builder.into_message().map_err(|e| {
        raise_error!(
            format!("Failed to render message: {:#?}", e),
            ErrorCode::InvalidParameter
        )
    })?;
    for bcc in split_addresses(&request.bcc) {
        let known = message
            .rcpt_to
            .iter()
            .any(|rcpt| rcpt.email.eq_ignore_ascii_case(&bcc));
        if !known {
            message = message.to(bcc);
        }
    }
    Ok(message)
}

fn build_message(
    request: &SendRequest,
    encoding: &'static Encoding,
    attachments: Vec<ResolvedAttachment>,
) -> MailTaskResult<MessageBuilder<'static>> {
    let to = to_address(&split_addresses(&request.to)).ok_or_else(|| {
        raise_error!(
            "At least one 'to' address is required".into(),
            ErrorCode::InvalidParameter
        )
    })?;

    let mut builder = MessageBuilder::new()
        .from(sender_address(&request.from, &request.sender_name)?)
        .to(to);
    if let Some(cc) = to_address(&split_addresses(&request.cc)) {
        builder = builder.cc(cc);
    }

    builder = if request.subject.is_ascii() || encoding == encoding_rs::UTF_8 {
        builder.subject(request.subject.clone())
    } else {
        builder.header("Subject", Raw::new(encoded_words(&request.subject, encoding)))
    };

    let body = text_part(request, encoding);
    if attachments.is_empty() {
        return Ok(builder.body(body));
    }

    let mut parts = Vec::with_capacity(attachments.len() + 1);
    parts.push(body);
    parts.extend(attachments.into_iter().map(attachment_part));
    Ok(builder.body(MimePart::new(
        ContentType::new("multipart/mixed"),
        BodyPart::Multipart(parts),
    )))
}

fn text_part(request: &SendRequest, encoding: &'static Encoding) -> MimePart<'static> {
    let (bytes, used, had_errors) = encoding.encode(&request.message);
    if had_errors {
        warn!(
            "Message body contains characters not representable in {}",
            used.name()
        );
    }
    let content_type = if request.is_message_html {
        "text/html"
    } else {
        "text/plain"
    };
    MimePart::new(
        ContentType::new(content_type).attribute("charset", used.name().to_lowercase()),
        BodyPart::Binary(bytes.into_owned().into()),
    )
}

fn attachment_part(attachment: ResolvedAttachment) -> MimePart<'static> {
    let mut params = attachment.content_type.split(';').map(str::trim);
    let mut content_type = ContentType::new(
        params
            .next()
            .unwrap_or("application/octet-stream")
            .to_string(),
    );
    for param in params {
        if let Some((key, value)) = param.split_once('=') {
            content_type =
                content_type.attribute(key.trim().to_string(), value.trim().to_string());
        }
    }
    MimePart::new(content_type, BodyPart::Binary(attachment.content.into()))
        .attachment(attachment.file_name)
}

/// Encodes a header value as RFC 2047 base64 words in the given charset,
/// folded onto continuation lines.
fn encoded_words(value: &str, encoding: &'static Encoding) -> String {
    let charset = encoding.output_encoding().name().to_lowercase();
    let mut words = Vec::new();
    let mut chunk: Vec<u8> = Vec::new();
    let mut buf = [0u8; 4];
    for ch in value.chars() {
        let (bytes, _, _) = encoding.encode(ch.encode_utf8(&mut buf));
        if !chunk.is_empty() && chunk.len() + bytes.len() > MAX_ENCODED_WORD_BYTES {
            words.push(format!("=?{}?B?{}?=", charset, base64_encode!(&chunk)));
            chunk.clear();
        }
        chunk.extend_from_slice(&bytes);
    }
    if !chunk.is_empty() {
        words.push(format!("=?{}?B?{}?=", charset, base64_encode!(&chunk)));
    }
    words.join("\r\n ")
}
