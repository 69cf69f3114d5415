//! Muxings: server-side packaging of encoded streams into containers.

use serde::{Deserialize, Serialize};

use super::common::EncodingOutput;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuxingStream {
    pub stream_id: String,
}

impl MuxingStream {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
        }
    }
}

/// Fragmented MP4 muxing producing fixed-length segments for adaptive
/// streaming.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fmp4Muxing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Segment length in seconds.
    pub segment_length: f64,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
    pub streams: Vec<MuxingStream>,
}

/// MPEG-TS segmented muxing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsMuxing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub segment_length: f64,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
    pub streams: Vec<MuxingStream>,
}

/// Progressive MP4 muxing producing a single output file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mp4Muxing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
    pub streams: Vec<MuxingStream>,
}

/// WebM segmented muxing for VP9/Vorbis renditions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebmMuxing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub segment_length: f64,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
    pub streams: Vec<MuxingStream>,
}
