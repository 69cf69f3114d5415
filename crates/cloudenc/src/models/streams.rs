//! Encodings, streams and the input-stream graph feeding them.

use serde::{Deserialize, Serialize};

/// The base resource an encoding job is built around. Streams, muxings and
/// DRM configurations are attached to it before the start call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Encoding {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: Some(description.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamSelectionMode {
    Auto,
    PositionAbsolute,
    VideoRelative,
    AudioRelative,
}

/// Per-title template streams are expanded server-side into the computed
/// bitrate ladder; standard streams map 1:1 to an output rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamMode {
    Standard,
    PerTitleTemplate,
}

/// Reference from a stream to its source: either an input resource plus file
/// path, or a previously created input stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_mode: Option<StreamSelectionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_stream_id: Option<String>,
}

impl StreamInput {
    /// Source a stream directly from a file on an input resource.
    pub fn from_input(input_id: impl Into<String>, input_path: impl Into<String>) -> Self {
        Self {
            input_id: Some(input_id.into()),
            input_path: Some(input_path.into()),
            selection_mode: Some(StreamSelectionMode::Auto),
            ..Default::default()
        }
    }

    /// Source a stream from an input stream created beforehand.
    pub fn from_input_stream(input_stream_id: impl Into<String>) -> Self {
        Self {
            input_stream_id: Some(input_stream_id.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub input_streams: Vec<StreamInput>,
    pub codec_config_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<StreamMode>,
}

/// Plain file-backed input stream, the root of any input-stream graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestInputStream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub input_id: String,
    pub input_path: String,
    pub selection_mode: StreamSelectionMode,
}

impl Default for StreamSelectionMode {
    fn default() -> Self {
        Self::Auto
    }
}

/// Section of another input stream selected by offset and duration (seconds).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBasedTrimmingInputStream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub input_stream_id: String,
    pub offset: f64,
    pub duration: f64,
}

/// One entry of a concatenation, ordered by `position`. Exactly one entry is
/// flagged as the main part; its properties drive the output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcatenationInputConfiguration {
    pub input_stream_id: String,
    pub is_main: bool,
    pub position: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcatenationInputStream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub concatenation: Vec<ConcatenationInputConfiguration>,
}

/// Dolby Vision source, optionally with a sidecar metadata file. When the
/// metadata path is absent the metadata is expected to be embedded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DolbyVisionInputStream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub input_id: String,
    pub video_input_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_input_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioMixChannelType {
    FrontLeft,
    FrontRight,
    Center,
    LowFrequency,
    BackLeft,
    BackRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioMixSourceChannelType {
    FrontLeft,
    FrontRight,
    Center,
    LowFrequency,
    BackLeft,
    BackRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioMixChannelLayout {
    #[serde(rename = "CL_STEREO")]
    Stereo,
    #[serde(rename = "CL_5_1_BACK")]
    Surround5_1Back,
}

/// One source channel contributing to an output channel, scaled by `gain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMixInputStreamSourceChannel {
    #[serde(rename = "type")]
    pub channel_type: AudioMixSourceChannelType,
    pub gain: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMixInputStreamChannel {
    pub input_stream_id: String,
    pub output_channel_type: AudioMixChannelType,
    pub source_channels: Vec<AudioMixInputStreamSourceChannel>,
}

/// Remixes the channels of a source input stream into a new channel layout,
/// e.g. downmixing 5.1 to stereo with per-channel gains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMixInputStream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub channel_layout: Option<AudioMixChannelLayout>,
    pub audio_mix_channels: Vec<AudioMixInputStreamChannel>,
}

/// Point on the encoding timeline; with `segment_cut` the written segments
/// are split there, which ad-insertion workflows rely on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Position in seconds.
    pub time: f64,
    pub segment_cut: bool,
}

/// Query parameters accepted by the encoding list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingListQueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<crate::models::common::TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}
