// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, MailTaskResult};
use crate::raise_error;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Runs one network step, giving up with `ErrorCode::Cancelled` as soon as
/// the host cancels the task.
pub async fn run_cancellable<T, F>(
    cancel: &CancellationToken,
    step: &str,
    task: F,
) -> MailTaskResult<T>
where
    F: Future<Output = MailTaskResult<T>>,
{
    if cancel.is_cancelled() {
        return Err(cancelled(step));
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(cancelled(step)),
        result = task => result,
    }
}

fn cancelled(step: &str) -> crate::modules::error::MailTaskError {
    warn!("Task cancelled during '{}'", step);
    raise_error!(
        format!("Operation cancelled during '{}'", step),
        ErrorCode::Cancelled
    )
}

#[cfg(test)]
mod tests {
    use super::run_cancellable;
    use crate::modules::error::code::ErrorCode;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let value = run_cancellable(&cancel, "noop", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn cancellation_interrupts_pending_step() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });
        let error = run_cancellable(&cancel, "sleep", async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert_eq!(error.code(), ErrorCode::Cancelled);
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_the_step() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let error = run_cancellable(&cancel, "connect", async { Ok(()) })
            .await
            .unwrap_err();
        assert_eq!(error.code(), ErrorCode::Cancelled);
    }
}
