//! Codec configurations applied to streams.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresetConfiguration {
    VodStandard,
    VodHighQuality,
    VodSpeed,
    LiveStandard,
    LiveLowLatency,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H264VideoConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_configuration: Option<PresetConfiguration>,
    /// Output height in pixels; width follows the input aspect ratio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Target bitrate in bit/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileH265 {
    Main,
    Main10,
}

/// Dynamic range treatment of the H.265 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum H265DynamicRangeFormat {
    Sdr,
    Hdr10,
    Hlg,
    DolbyVision,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H265VideoConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_configuration: Option<PresetConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileH265>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_range_format: Option<H265DynamicRangeFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vp9VideoConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AacChannelLayout {
    #[serde(rename = "CL_STEREO")]
    Stereo,
    #[serde(rename = "CL_5_1_BACK")]
    Surround5_1Back,
    #[serde(rename = "CL_MONO")]
    Mono,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AacAudioConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Target bitrate in bit/s.
    pub bitrate: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_layout: Option<AacChannelLayout>,
}

impl AacAudioConfiguration {
    pub fn new(bitrate: u64) -> Self {
        Self {
            id: None,
            name: format!("AAC {} kbit/s", bitrate / 1000),
            bitrate,
            channel_layout: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VorbisAudioConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub bitrate: u64,
}

/// Discriminator returned by the configuration type lookup, used when
/// assembling manifests from a mixed set of muxings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodecConfigType {
    H264,
    H265,
    Vp9,
    Aac,
    Vorbis,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecConfigTypeResponse {
    #[serde(rename = "type")]
    pub config_type: CodecConfigType,
}
