//! Live encoding start/stop models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDashManifest {
    pub manifest_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveHlsManifest {
    pub manifest_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLiveEncodingRequest {
    pub stream_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash_manifests: Vec<LiveDashManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hls_manifests: Vec<LiveHlsManifest>,
}

/// Ingest details of a running live encoding. Only available some time
/// after the start call succeeded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEncoding {
    pub stream_key: String,
    pub encoder_ip: String,
}
