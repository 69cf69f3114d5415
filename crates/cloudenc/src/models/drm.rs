//! DRM configurations attached to muxings. All key handling is remote; these
//! models only describe which systems to encrypt for.

use serde::{Deserialize, Serialize};

use super::common::EncodingOutput;

/// Well-known DRM system identifiers used with SPEKE key providers.
pub const WIDEVINE_SYSTEM_ID: &str = "edef8ba9-79d6-4ace-a3c8-27dcd51d21ed";
pub const PLAYREADY_SYSTEM_ID: &str = "9a04f079-9840-4286-ab92-e65be0885f95";
pub const FAIRPLAY_SYSTEM_ID: &str = "94ce86fb-07ff-4f43-adb8-93d2fa968ca2";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CencWidevine {
    pub pssh: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CencPlayReady {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub la_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CencFairPlay {
    pub iv: String,
    pub uri: String,
}

/// Common-encryption DRM with caller-supplied key material.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CencDrm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 16-byte key as 32 hex characters.
    pub key: String,
    /// 16-byte key id as 32 hex characters.
    pub kid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widevine: Option<CencWidevine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_ready: Option<CencPlayReady>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fair_play: Option<CencFairPlay>,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
}

/// Key server spoken to via the SPEKE protocol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpekeDrmProvider {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// DRM whose keys are fetched from a SPEKE key provider at encoding time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpekeDrm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub provider: SpekeDrmProvider,
    pub content_id: String,
    pub system_ids: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
}

impl SpekeDrm {
    pub fn protects_system(&self, system_id: &str) -> bool {
        self.system_ids.iter().any(|id| id == system_id)
    }
}
