// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, MailTaskResult};
use crate::raise_error;
use mail_send::mail_builder::headers::address::Address;

/// Splits an address list on `,` and `;`, trimming each entry and dropping
/// empty ones. No syntax checks happen here.
pub fn split_addresses(input: &str) -> Vec<String> {
    input
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn to_address(addresses: &[String]) -> Option<Address<'static>> {
    match addresses {
        [] => None,
        [single] => Some(Address::from(single.clone())),
        many => Some(Address::new_list(
            many.iter().cloned().map(Address::from).collect(),
        )),
    }
}

/// Resolves the sender mailbox, with the display name when one is given.
pub fn sender_address(from: &str, sender_name: &str) -> MailTaskResult<Address<'static>> {
    let mut addresses = split_addresses(from);
    if addresses.len() != 1 {
        return Err(raise_error!(
            format!(
                "'from' must contain exactly one address, found {}",
                addresses.len()
            ),
            ErrorCode::InvalidParameter
        ));
    }
    let address = addresses.remove(0);
    let name = sender_name.trim();
    Ok(if name.is_empty() {
        Address::from(address)
    } else {
        Address::from((name.to_string(), address))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_delimiters_are_split_and_trimmed() {
        assert_eq!(
            split_addresses("a@x.com ; b@x.com, c@x.com"),
            vec!["a@x.com", "b@x.com", "c@x.com"]
        );
    }

    #[test]
    fn blank_lists_are_empty() {
        assert!(split_addresses("").is_empty());
        assert!(split_addresses("  ; ,, ").is_empty());
        assert!(to_address(&[]).is_none());
    }

    #[test]
    fn sender_must_be_a_single_mailbox() {
        assert!(sender_address("me@x.com", "Me").is_ok());
        let error = sender_address("a@x.com;b@x.com", "").unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
        assert!(sender_address(" ", "").is_err());
    }

    #[test]
    fn multiple_recipients_become_a_list() {
        let list = to_address(&split_addresses("a@x.com,b@x.com")).unwrap();
        assert!(matches!(list, Address::List(ref items) if items.len() == 2));
        let single = to_address(&split_addresses("a@x.com")).unwrap();
        assert!(matches!(single, Address::Address(_)));
    }
}
