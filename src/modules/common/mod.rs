// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use mail_parser::{Addr as ParsedAddr, Address as ParsedAddress};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

pub mod cancel;

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct Addr {
    /// Display name, e.g. "John Doe".
    pub name: Option<String>,
    /// Mailbox address, e.g. "john.doe@example.com".
    pub address: Option<String>,
}

impl Addr {
    pub fn new(name: Option<&str>, address: Option<&str>) -> Self {
        let clean = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(Into::into);
        Addr {
            name: clean(name),
            address: clean(address),
        }
    }
}

impl std::fmt::Display for Addr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.name, &self.address) {
            (Some(name), Some(address)) => write!(f, "{} <{}>", name, address),
            (None, Some(address)) => write!(f, "{}", address),
            (Some(name), None) => write!(f, "{}", name),
            (None, None) => Ok(()),
        }
    }
}

impl<'x> From<&ParsedAddr<'x>> for Addr {
    fn from(original: &ParsedAddr<'x>) -> Self {
        Addr::new(original.name.as_deref(), original.address.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddrVec(pub Vec<Addr>);

impl Deref for AddrVec {
    type Target = Vec<Addr>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'x> From<&ParsedAddress<'x>> for AddrVec {
    fn from(original: &ParsedAddress<'x>) -> Self {
        let vec = match original {
            ParsedAddress::List(addrs) => addrs.iter().map(Addr::from).collect(),
            ParsedAddress::Group(groups) => groups
                .iter()
                .flat_map(|group| group.addresses.iter().map(Addr::from))
                .collect(),
        };
        AddrVec(vec)
    }
}

impl std::fmt::Display for AddrVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .iter()
            .map(ToString::to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}
