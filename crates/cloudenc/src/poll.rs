//! Blocking-style polling helpers built on top of the raw status endpoints.
//!
//! The status endpoints only report; these helpers sleep between polls and
//! turn terminal error states into `ApiError` values.

use std::time::Duration;

use tracing::{info, warn};

use crate::client::CloudencClient;
use crate::error::ApiError;
use crate::models::common::{Task, TaskStatus};
use crate::models::manifests::StartEncodingRequest;

const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Live encodings can take a few minutes to get an ingest endpoint assigned.
const LIVE_DETAILS_ATTEMPTS: u32 = 60;
const STATE_CHANGE_ATTEMPTS: u32 = 120;

/// Start an encoding and poll its status until it reaches a terminal state.
///
/// Fails with [`ApiError::TaskFailed`] carrying the task's error messages if
/// the encoding ends in any state other than `FINISHED`.
pub async fn execute_encoding(
    client: &CloudencClient,
    encoding_id: &str,
    request: Option<&StartEncodingRequest>,
) -> Result<(), ApiError> {
    client.start_encoding(encoding_id, request).await?;

    loop {
        tokio::time::sleep(STATUS_POLL_INTERVAL).await;
        let task = client.encoding_status(encoding_id).await?;
        info!(
            "Encoding status is {} (progress: {} %)",
            task.status,
            task.progress.unwrap_or(0)
        );
        if task.status.is_terminal() {
            return check_finished(task);
        }
    }
}

/// Start rendering a hand-assembled DASH manifest and wait for it.
pub async fn execute_dash_manifest(
    client: &CloudencClient,
    manifest_id: &str,
) -> Result<(), ApiError> {
    client.start_dash_manifest(manifest_id).await?;

    loop {
        tokio::time::sleep(STATUS_POLL_INTERVAL).await;
        let task = client.dash_manifest_status(manifest_id).await?;
        info!("DASH manifest status is {}", task.status);
        if task.status.is_terminal() {
            return check_finished(task);
        }
    }
}

/// Start rendering a hand-assembled HLS manifest and wait for it.
pub async fn execute_hls_manifest(
    client: &CloudencClient,
    manifest_id: &str,
) -> Result<(), ApiError> {
    client.start_hls_manifest(manifest_id).await?;

    loop {
        tokio::time::sleep(STATUS_POLL_INTERVAL).await;
        let task = client.hls_manifest_status(manifest_id).await?;
        info!("HLS manifest status is {}", task.status);
        if task.status.is_terminal() {
            return check_finished(task);
        }
    }
}

/// Poll until the encoding reaches `target`, with a bounded number of
/// attempts. Terminal failure states short-circuit with an error so a live
/// encoding that dies during startup does not run out the clock.
pub async fn wait_until_encoding_status(
    client: &CloudencClient,
    encoding_id: &str,
    target: TaskStatus,
) -> Result<(), ApiError> {
    for _ in 0..STATE_CHANGE_ATTEMPTS {
        let task = client.encoding_status(encoding_id).await?;
        info!("Encoding status is {}", task.status);
        if task.status == target {
            return Ok(());
        }
        if task.status.is_terminal() {
            let mut messages = task.error_messages();
            if messages.is_empty() {
                messages.push(format!(
                    "encoding reached terminal state {} while waiting for {target}",
                    task.status
                ));
            }
            return Err(ApiError::TaskFailed { messages });
        }
        tokio::time::sleep(STATUS_POLL_INTERVAL).await;
    }

    Err(ApiError::Timeout {
        operation: "encoding status change",
        seconds: timeout_seconds(STATE_CHANGE_ATTEMPTS),
    })
}

/// Fetch the ingest details of a live encoding, retrying while the encoder
/// is still being provisioned.
pub async fn wait_for_live_encoding_details(
    client: &CloudencClient,
    encoding_id: &str,
) -> Result<crate::models::live::LiveEncoding, ApiError> {
    for attempt in 1..=LIVE_DETAILS_ATTEMPTS {
        match client.live_encoding_details(encoding_id).await {
            Ok(details) => return Ok(details),
            Err(err @ ApiError::Api { .. }) => {
                warn!(attempt, "live details not available yet: {err}");
            }
            Err(err) => return Err(err),
        }
        tokio::time::sleep(STATUS_POLL_INTERVAL).await;
    }

    Err(ApiError::Timeout {
        operation: "live encoding details",
        seconds: timeout_seconds(LIVE_DETAILS_ATTEMPTS),
    })
}

fn check_finished(task: Task) -> Result<(), ApiError> {
    match task.status {
        TaskStatus::Finished => Ok(()),
        _ => {
            let mut messages = task.error_messages();
            if messages.is_empty() {
                messages.push(format!("task ended in state {}", task.status));
            }
            Err(ApiError::TaskFailed { messages })
        }
    }
}

fn timeout_seconds(attempts: u32) -> u64 {
    u64::from(attempts) * STATUS_POLL_INTERVAL.as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::{Message, MessageType};

    fn task(status: TaskStatus, messages: Vec<Message>) -> Task {
        Task {
            status,
            progress: None,
            messages,
            error: None,
        }
    }

    #[test]
    fn finished_task_passes() {
        assert!(check_finished(task(TaskStatus::Finished, Vec::new())).is_ok());
    }

    #[test]
    fn errored_task_surfaces_error_messages() {
        let err = check_finished(task(
            TaskStatus::Error,
            vec![Message {
                message_type: MessageType::Error,
                text: "input not found".into(),
            }],
        ))
        .unwrap_err();

        match err {
            ApiError::TaskFailed { messages } => {
                assert_eq!(messages, vec!["input not found".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn canceled_task_without_messages_reports_its_state() {
        let err = check_finished(task(TaskStatus::Canceled, Vec::new())).unwrap_err();
        match err {
            ApiError::TaskFailed { messages } => {
                assert_eq!(messages, vec!["task ended in state CANCELED".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
