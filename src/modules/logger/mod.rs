// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::Local;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `info` or `mailtasks=debug,async_imap=warn`.
pub const LOG_ENV: &str = "MAILTASKS_LOG";
/// `true`/`1` enables colored output.
pub const ANSI_ENV: &str = "MAILTASKS_ANSI_LOGS";
/// `true`/`1` switches to one JSON object per line.
pub const JSON_ENV: &str = "MAILTASKS_JSON_LOGS";

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Installs a stdout subscriber for hosts that do not bring their own.
///
/// Does nothing when a global subscriber is already set, so it is safe to
/// call from every task invocation.
pub fn initialize_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|e| {
        if std::env::var_os(LOG_ENV).is_some() {
            eprintln!("Invalid {} value, falling back to 'info': {}", LOG_ENV, e);
        }
        EnvFilter::new("info")
    });

    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_target(true)
        .with_timer(LocalTimer);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout);

    let _ = if env_flag(JSON_ENV) {
        builder
            .event_format(format.json().flatten_event(true))
            .try_init()
    } else {
        builder
            .with_ansi(env_flag(ANSI_ENV))
            .event_format(format)
            .try_init()
    };
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| parse_flag(&v)).unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::{initialize_logging, parse_flag};

    #[test]
    fn repeated_initialization_is_harmless() {
        initialize_logging();
        initialize_logging();
        tracing::info!("logger initialized twice");
    }

    #[test]
    fn flag_values() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
