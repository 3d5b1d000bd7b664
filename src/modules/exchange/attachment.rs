// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, MailTaskResult};
use crate::modules::utils::random_suffix;
use crate::{base64_decode_safe, raise_error};
use std::path::{Path, PathBuf};
use tracing::debug;

const FALLBACK_NAME: &str = "attachment";

/// Writes a base64 attachment into `directory` and returns the full path.
///
/// With `overwrite` unset, an existing file is kept and the new one gets a
/// random suffix before its extension.
pub async fn save_attachment(
    directory: &Path,
    name: &str,
    content_base64: &str,
    overwrite: bool,
) -> MailTaskResult<PathBuf> {
    let content = base64_decode_safe!(content_base64).map_err(|e| {
        raise_error!(
            format!("Attachment '{}' has invalid base64 content: {:#?}", name, e),
            ErrorCode::HttpResponseError
        )
    })?;

    tokio::fs::create_dir_all(directory).await.map_err(|e| {
        raise_error!(
            format!("Failed to create directory {}: {:#?}", directory.display(), e),
            ErrorCode::InternalError
        )
    })?;

    let file_name = file_name_of(name);
    let mut path = directory.join(&file_name);
    if !overwrite && tokio::fs::try_exists(&path).await.unwrap_or(false) {
        path = directory.join(with_suffix(&file_name, &random_suffix()));
    }

    tokio::fs::write(&path, &content).await.map_err(|e| {
        raise_error!(
            format!("Failed to write attachment {}: {:#?}", path.display(), e),
            ErrorCode::InternalError
        )
    })?;
    debug!("Saved attachment {} ({} bytes)", path.display(), content.len());
    Ok(path)
}

// Last path component, for either separator
fn file_name_of(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}

fn with_suffix(file_name: &str, suffix: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{}{}", &file_name[..dot], suffix, &file_name[dot..]),
        _ => format!("{}_{}", file_name, suffix),
    }
}
