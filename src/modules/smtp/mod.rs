// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod address;
pub mod attachment;
pub mod client;
pub mod composer;
pub mod entity;
pub mod manager;
pub mod send;
