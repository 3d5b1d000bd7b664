// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod attachment;
pub mod client;
pub mod entity;
pub mod http;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;
