//! Video filters and their position-ordered attachment to streams.

use serde::{Deserialize, Serialize};

/// Overlays an image on the video. Coordinates are pixel distances from the
/// respective edge; only the set ones apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
}

/// Renders text onto the video; `x`/`y` accept ffmpeg position expressions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub x: String,
    pub y: String,
}

/// Converts interlaced input to progressive; a no-op on progressive input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeinterlaceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Attachment of a filter resource to a stream; `position` determines the
/// order in which filters are applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamFilter {
    pub id: String,
    pub position: u32,
}
