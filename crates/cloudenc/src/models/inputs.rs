//! Input resources: where the service reads source files from.

use serde::{Deserialize, Serialize};

/// HTTP server hosting input files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub host: String,
}

impl HttpInput {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            id: None,
            host: host.into(),
        }
    }
}


/// RTMP ingest point provided by the platform for live encodings.
///
/// These are account-level resources; they are listed, never created.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtmpInput {
    pub id: String,
}
