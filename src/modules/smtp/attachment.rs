// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, MailTaskResult};
use crate::raise_error;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One attachment source, selected by `attachment_type`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "attachment_type")]
pub enum AttachmentSpec {
    FileAttachment(FileAttachment),
    AttachmentFromString(AttachmentFromString),
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileAttachment {
    /// A file, a directory (every file directly inside it), or a glob
    /// pattern such as `/data/out/*.csv`.
    pub file_path: String,
    /// Fail the whole send when nothing matches. Takes precedence over
    /// `send_if_no_attachments_found`.
    pub throw_exception_if_attachment_not_found: bool,
    /// Send without this attachment when nothing matches. When neither flag
    /// is set the send is skipped.
    pub send_if_no_attachments_found: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AttachmentFromString {
    pub file_name: String,
    pub file_content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedAttachment {
    pub file_name: String,
    /// Full content type, including a `charset` parameter for encoded text.
    pub content_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug)]
pub enum AttachmentOutcome {
    Ready(Vec<ResolvedAttachment>),
    /// A file pattern matched nothing and neither flag allowed going on.
    Skipped { file_path: String },
}

/// Turns the attachment specs into concrete attachments, in order.
pub async fn resolve_attachments(
    specs: &[AttachmentSpec],
    encoding: &'static Encoding,
) -> MailTaskResult<AttachmentOutcome> {
    let mut resolved = Vec::new();
    for spec in specs {
        match spec {
            AttachmentSpec::AttachmentFromString(attachment) => {
                resolved.push(from_string(attachment, encoding));
            }
            AttachmentSpec::FileAttachment(attachment) => {
                let files = matching_files(&attachment.file_path).await?;
                if files.is_empty() {
                    if attachment.throw_exception_if_attachment_not_found {
                        return Err(raise_error!(
                            format!(
                                "The given path \"{}\" could not be found or did not match any file.",
                                attachment.file_path
                            ),
                            ErrorCode::AttachmentNotFound
                        ));
                    }
                    if attachment.send_if_no_attachments_found {
                        info!(
                            "No attachments found matching path \"{}\", sending without it",
                            attachment.file_path
                        );
                        continue;
                    }
                    info!(
                        "No attachments found matching path \"{}\", skipping send",
                        attachment.file_path
                    );
                    return Ok(AttachmentOutcome::Skipped {
                        file_path: attachment.file_path.clone(),
                    });
                }
                for file in files {
                    resolved.push(from_file(&file).await?);
                }
            }
        }
    }
    Ok(AttachmentOutcome::Ready(resolved))
}

fn from_string(
    attachment: &AttachmentFromString,
    encoding: &'static Encoding,
) -> ResolvedAttachment {
    let (bytes, used, had_errors) = encoding.encode(&attachment.file_content);
    if had_errors {
        warn!(
            "Attachment '{}' contains characters not representable in {}",
            attachment.file_name,
            used.name()
        );
    }
    let mime = mime_guess::from_path(&attachment.file_name).first_or_text_plain();
    let content_type = if mime.type_() == mime_guess::mime::TEXT {
        format!("{}; charset={}", mime.essence_str(), used.name().to_lowercase())
    } else {
        mime.essence_str().to_string()
    };
    ResolvedAttachment {
        file_name: attachment.file_name.clone(),
        content_type,
        content: bytes.into_owned(),
    }
}

async fn from_file(path: &Path) -> MailTaskResult<ResolvedAttachment> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        raise_error!(
            format!("Failed to read attachment '{}': {}", path.display(), e),
            ErrorCode::AttachmentNotFound
        )
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!("Attaching '{}' ({} bytes)", path.display(), content.len());
    Ok(ResolvedAttachment {
        file_name,
        content_type: mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
        content,
    })
}

/// Every regular file the path names, in enumeration order.
async fn matching_files(file_path: &str) -> MailTaskResult<Vec<PathBuf>> {
    let path = Path::new(file_path);
    // Brackets in real file names are not character classes
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if path.is_dir() {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| raise_error!(e.to_string(), ErrorCode::InternalError))?;
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| raise_error!(e.to_string(), ErrorCode::InternalError))?
        {
            let entry_path = entry.path();
            if entry_path.is_file() {
                files.push(entry_path);
            }
        }
        return Ok(files);
    }

    let paths = glob::glob(file_path).map_err(|e| {
        raise_error!(
            format!("Invalid attachment path \"{}\": {}", file_path, e),
            ErrorCode::InvalidParameter
        )
    })?;
    Ok(paths
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect())
}
