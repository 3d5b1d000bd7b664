// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use rand::Rng;

pub mod net;
pub mod tls;

#[macro_export]
macro_rules! mailtasks_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

#[macro_export]
macro_rules! raise_error {
    ($msg:expr, $code:expr) => {
        $crate::modules::error::MailTaskError::Generic {
            message: $msg,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}

#[macro_export]
macro_rules! base64_encode {
    ($bytes:expr) => {{
        use base64::{engine::general_purpose::STANDARD, *};
        STANDARD.encode($bytes)
    }};
}

#[macro_export]
macro_rules! base64_decode_safe {
    ($key:expr) => {{
        use base64::{engine::general_purpose::STANDARD, *};
        STANDARD.decode($key)
    }};
}

#[macro_export]
macro_rules! encode_mailbox_name {
    ($name:expr) => {{
        utf7_imap::encode_utf7_imap($name.to_string())
    }};
}

#[macro_export]
macro_rules! get_encoding {
    ($label:expr) => {
        encoding_rs::Encoding::for_label($label.trim().as_bytes())
    };
}

/// Short random hex token, used to make file names unique.
pub fn random_suffix() -> String {
    let random_bytes: [u8; 8] = rand::rng().random();
    hex::encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::random_suffix;

    #[test]
    fn encoding_labels_are_resolved_case_insensitively() {
        assert_eq!(get_encoding!("utf-8"), Some(encoding_rs::UTF_8));
        assert_eq!(get_encoding!(" UTF-8 "), Some(encoding_rs::UTF_8));
        assert_eq!(get_encoding!("latin1"), Some(encoding_rs::WINDOWS_1252));
        assert!(get_encoding!("no-such-charset").is_none());
    }

    #[test]
    fn mailbox_names_use_modified_utf7() {
        assert_eq!(encode_mailbox_name!("INBOX"), "INBOX");
        assert_eq!(encode_mailbox_name!("Entwürfe"), "Entw&APw-rfe");
    }

    #[test]
    fn random_suffix_is_hex() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(suffix, random_suffix());
    }
}
