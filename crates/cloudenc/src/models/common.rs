//! Shared wire types: response envelope, task/status polling, pagination.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every successful response body.
///
/// The service nests the created/fetched resource under `data.result`; error
/// responses carry `data.code` / `data.message` instead (handled by the
/// client before this type is deserialized).
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: ResponseData<T>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData<T> {
    pub result: Option<T>,
}

/// Error body returned with a non-success HTTP status.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub data: ErrorData,
}

#[derive(Debug, Deserialize)]
pub struct ErrorData {
    pub code: u32,
    pub message: String,
    #[serde(default, rename = "developerMessage")]
    pub developer_message: Option<String>,
}

/// Paginated list result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_count: u64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// State of a remote encoding or manifest-generation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Created,
    Queued,
    Running,
    Finished,
    Error,
    Canceled,
    #[serde(rename = "TRANSFER_ERROR")]
    TransferError,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Error | Self::Canceled | Self::TransferError
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
            Self::Error => "ERROR",
            Self::Canceled => "CANCELED",
            Self::TransferError => "TRANSFER_ERROR",
        };
        f.write_str(s)
    }
}

/// Hint attached to a failed task telling whether a retry can succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetryHint {
    Retry,
    NoRetry,
    #[default]
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Info,
    Debug,
    Warning,
    Error,
    Trace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskError {
    pub code: Option<u32>,
    pub message: Option<String>,
    #[serde(default)]
    pub retry_hint: RetryHint,
}

/// Status of a long-running remote job, polled until terminal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub error: Option<TaskError>,
}

impl Task {
    /// Texts of all messages of type ERROR.
    pub fn error_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.message_type == MessageType::Error)
            .map(|m| m.text.clone())
            .collect()
    }

    /// A task error is retryable unless the platform explicitly said NO_RETRY.
    pub fn is_retryable_error(&self) -> bool {
        self.status == TaskStatus::Error
            && self
                .error
                .as_ref()
                .is_none_or(|e| e.retry_hint != RetryHint::NoRetry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclPermission {
    PublicRead,
    Private,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclEntry {
    pub permission: AclPermission,
}

impl AclEntry {
    pub fn public_read() -> Self {
        Self {
            permission: AclPermission::PublicRead,
        }
    }
}

/// Reference to an output resource plus the path to write to, with ACLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingOutput {
    pub output_id: String,
    pub output_path: String,
    #[serde(default)]
    pub acl: Vec<AclEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_error_messages_filters_by_type() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "status": "ERROR",
            "progress": 42,
            "messages": [
                {"type": "INFO", "text": "starting"},
                {"type": "ERROR", "text": "input unreadable"},
                {"type": "ERROR", "text": "no video track"}
            ]
        }))
        .unwrap();

        assert_eq!(
            task.error_messages(),
            vec!["input unreadable".to_string(), "no video track".to_string()]
        );
    }

    #[test]
    fn retry_hint_defaults_to_retryable() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "status": "ERROR",
            "messages": []
        }))
        .unwrap();
        assert!(task.is_retryable_error());

        let task: Task = serde_json::from_value(serde_json::json!({
            "status": "ERROR",
            "messages": [],
            "error": {"code": 1000, "message": "boom", "retryHint": "NO_RETRY"}
        }))
        .unwrap();
        assert!(!task.is_retryable_error());
    }

    #[test]
    fn finished_task_is_not_a_retryable_error() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "status": "FINISHED"
        }))
        .unwrap();
        assert!(!task.is_retryable_error());
        assert!(task.status.is_terminal());
    }
}
