//! DASH/HLS manifests, default and hand-assembled variants, and the start
//! request models referencing them.

use serde::{Deserialize, Serialize};

use super::common::EncodingOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashManifestDefaultVersion {
    V1,
    V2,
}

/// DASH manifest that automatically includes every representation of the
/// encoding it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashManifestDefault {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub encoding_id: String,
    pub manifest_name: String,
    pub version: DashManifestDefaultVersion,
    pub outputs: Vec<EncodingOutput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HlsManifestDefaultVersion {
    V1,
}

/// HLS master manifest that automatically includes every representation of
/// the encoding it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HlsManifestDefault {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub encoding_id: String,
    pub name: String,
    pub manifest_name: String,
    pub version: HlsManifestDefaultVersion,
    pub outputs: Vec<EncodingOutput>,
}

/// Hand-assembled DASH manifest; periods, adaptation sets and
/// representations are attached separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub manifest_name: String,
    pub outputs: Vec<EncodingOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAdaptationSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAdaptationSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashRepresentationType {
    Template,
    Timeline,
}

/// Reference from an adaptation set to the segments of one fmp4/webm muxing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashFmp4Representation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub representation_type: DashRepresentationType,
    pub encoding_id: String,
    pub muxing_id: String,
    pub segment_path: String,
}

impl DashFmp4Representation {
    pub fn template(
        encoding_id: impl Into<String>,
        muxing_id: impl Into<String>,
        segment_path: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            representation_type: DashRepresentationType::Template,
            encoding_id: encoding_id.into(),
            muxing_id: muxing_id.into(),
            segment_path: segment_path.into(),
        }
    }
}

/// Reference from an adaptation set to the segments of one webm muxing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashWebmRepresentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub representation_type: DashRepresentationType,
    pub encoding_id: String,
    pub muxing_id: String,
    pub segment_path: String,
}

impl DashWebmRepresentation {
    pub fn template(
        encoding_id: impl Into<String>,
        muxing_id: impl Into<String>,
        segment_path: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            representation_type: DashRepresentationType::Template,
            encoding_id: encoding_id.into(),
            muxing_id: muxing_id.into(),
            segment_path: segment_path.into(),
        }
    }
}

/// Hand-assembled HLS master manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HlsManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_name: Option<String>,
    pub outputs: Vec<EncodingOutput>,
}

/// Variant-stream playlist entry of an HLS master manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub uri: String,
    pub encoding_id: String,
    pub stream_id: String,
    pub muxing_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drm_id: Option<String>,
    /// Group id of the associated audio media playlists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub segment_path: String,
}

/// Audio media playlist entry of an HLS master manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMediaInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    pub group_id: String,
    pub encoding_id: String,
    pub stream_id: String,
    pub muxing_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drm_id: Option<String>,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assoc_language: Option<String>,
    #[serde(default)]
    pub autoselect: bool,
    #[serde(default, rename = "isDefault")]
    pub is_default: bool,
    #[serde(default)]
    pub forced: bool,
    pub segment_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionMode {
    Keyframe,
    Time,
    Segment,
}

/// Free-form tag injected into a playlist at a keyframe position, used for
/// ad-placement markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub keyframe_id: String,
    pub position_mode: PositionMode,
    pub data: String,
}

/// Which manifest generator version renders the referenced manifests at the
/// end of the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManifestGenerator {
    Legacy,
    V2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestResource {
    pub manifest_id: String,
}

impl ManifestResource {
    pub fn new(manifest_id: impl Into<String>) -> Self {
        Self {
            manifest_id: manifest_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoRepresentation {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H264PerTitleConfiguration {
    pub auto_representations: AutoRepresentation,
}

/// Content-adaptive bitrate ladder selection performed by the platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerTitle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h264_configuration: Option<H264PerTitleConfiguration>,
}

/// Optional payload of the encoding start call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEncodingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_title: Option<PerTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_generator: Option<ManifestGenerator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vod_dash_manifests: Vec<ManifestResource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vod_hls_manifests: Vec<ManifestResource>,
}
