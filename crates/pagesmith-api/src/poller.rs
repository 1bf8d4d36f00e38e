//! `getUpdates` long polling.
//!
//! One loop owns the offset; every update is handled on its own task so a
//! publish run in one chat does not hold up the others.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::state::AppState;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Poll until `cancel` fires. Transient API failures back off and retry.
pub async fn run(state: AppState, cancel: CancellationToken) -> anyhow::Result<()> {
    // getUpdates is refused while a webhook is registered.
    state.telegram.delete_webhook().await?;

    let wait_secs = state.config.telegram.poll_timeout_secs;
    let mut offset: Option<i64> = None;
    let mut backoff = INITIAL_BACKOFF;

    info!(wait_secs, "polling for updates");

    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = state.telegram.get_updates(offset, wait_secs) => result,
        };

        match result {
            Ok(updates) => {
                backoff = INITIAL_BACKOFF;
                if !updates.is_empty() {
                    debug!(count = updates.len(), "received updates");
                }
                for update in updates {
                    offset = Some(next_offset(offset, update.update_id));
                    let state = state.clone();
                    tokio::spawn(async move { state.dispatch(update).await });
                }
            }
            Err(err) => {
                warn!(error = %err, retry_in = ?backoff, "getUpdates failed");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }

    info!("polling stopped");
    Ok(())
}

/// Offset confirming everything up to and including `update_id`.
fn next_offset(current: Option<i64>, update_id: i64) -> i64 {
    current.map_or(update_id + 1, |offset| offset.max(update_id + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_offset_advances_past_update() {
        assert_eq!(next_offset(None, 41), 42);
        assert_eq!(next_offset(Some(10), 41), 42);
    }

    #[test]
    fn test_next_offset_never_moves_backwards() {
        assert_eq!(next_offset(Some(50), 41), 50);
    }
}
