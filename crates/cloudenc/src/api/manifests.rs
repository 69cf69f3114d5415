//! Manifest resources. Default manifests need a single call; hand-assembled
//! ones are built up from periods, adaptation sets and playlist entries.

use crate::client::CloudencClient;
use crate::error::ApiError;
use crate::models::common::Task;
use crate::models::manifests::{
    AudioAdaptationSet, AudioMediaInfo, CustomTag, DashFmp4Representation, DashManifest,
    DashManifestDefault, DashWebmRepresentation, HlsManifest, HlsManifestDefault, Period,
    StreamInfo, VideoAdaptationSet,
};

impl CloudencClient {
    pub async fn create_dash_manifest_default(
        &self,
        manifest: &DashManifestDefault,
    ) -> Result<DashManifestDefault, ApiError> {
        self.post("encoding/manifests/dash/default", manifest).await
    }

    pub async fn create_hls_manifest_default(
        &self,
        manifest: &HlsManifestDefault,
    ) -> Result<HlsManifestDefault, ApiError> {
        self.post("encoding/manifests/hls/default", manifest).await
    }

    pub async fn create_dash_manifest(
        &self,
        manifest: &DashManifest,
    ) -> Result<DashManifest, ApiError> {
        self.post("encoding/manifests/dash", manifest).await
    }

    pub async fn create_dash_period(
        &self,
        manifest_id: &str,
        period: &Period,
    ) -> Result<Period, ApiError> {
        self.post(
            &format!("encoding/manifests/dash/{manifest_id}/periods"),
            period,
        )
        .await
    }

    pub async fn create_dash_video_adaptation_set(
        &self,
        manifest_id: &str,
        period_id: &str,
        adaptation_set: &VideoAdaptationSet,
    ) -> Result<VideoAdaptationSet, ApiError> {
        self.post(
            &format!(
                "encoding/manifests/dash/{manifest_id}/periods/{period_id}/adaptationsets/video"
            ),
            adaptation_set,
        )
        .await
    }

    pub async fn create_dash_audio_adaptation_set(
        &self,
        manifest_id: &str,
        period_id: &str,
        adaptation_set: &AudioAdaptationSet,
    ) -> Result<AudioAdaptationSet, ApiError> {
        self.post(
            &format!(
                "encoding/manifests/dash/{manifest_id}/periods/{period_id}/adaptationsets/audio"
            ),
            adaptation_set,
        )
        .await
    }

    pub async fn create_dash_fmp4_representation(
        &self,
        manifest_id: &str,
        period_id: &str,
        adaptation_set_id: &str,
        representation: &DashFmp4Representation,
    ) -> Result<DashFmp4Representation, ApiError> {
        self.post(
            &format!(
                "encoding/manifests/dash/{manifest_id}/periods/{period_id}/adaptationsets/{adaptation_set_id}/representations/fmp4"
            ),
            representation,
        )
        .await
    }

    pub async fn create_dash_webm_representation(
        &self,
        manifest_id: &str,
        period_id: &str,
        adaptation_set_id: &str,
        representation: &DashWebmRepresentation,
    ) -> Result<DashWebmRepresentation, ApiError> {
        self.post(
            &format!(
                "encoding/manifests/dash/{manifest_id}/periods/{period_id}/adaptationsets/{adaptation_set_id}/representations/webm"
            ),
            representation,
        )
        .await
    }

    pub async fn create_hls_manifest(
        &self,
        manifest: &HlsManifest,
    ) -> Result<HlsManifest, ApiError> {
        self.post("encoding/manifests/hls", manifest).await
    }

    pub async fn create_hls_stream_info(
        &self,
        manifest_id: &str,
        stream_info: &StreamInfo,
    ) -> Result<StreamInfo, ApiError> {
        self.post(
            &format!("encoding/manifests/hls/{manifest_id}/streams"),
            stream_info,
        )
        .await
    }

    pub async fn create_hls_audio_media_info(
        &self,
        manifest_id: &str,
        media_info: &AudioMediaInfo,
    ) -> Result<AudioMediaInfo, ApiError> {
        self.post(
            &format!("encoding/manifests/hls/{manifest_id}/media/audio"),
            media_info,
        )
        .await
    }

    /// Custom tags land in the media playlist of the given stream at the
    /// playback position of the referenced keyframe.
    pub async fn create_hls_stream_custom_tag(
        &self,
        manifest_id: &str,
        stream_id: &str,
        tag: &CustomTag,
    ) -> Result<CustomTag, ApiError> {
        self.post(
            &format!("encoding/manifests/hls/{manifest_id}/streams/{stream_id}/custom-tags"),
            tag,
        )
        .await
    }

    pub async fn start_dash_manifest(&self, manifest_id: &str) -> Result<(), ApiError> {
        self.post_action(&format!("encoding/manifests/dash/{manifest_id}/start"))
            .await
    }

    pub async fn dash_manifest_status(&self, manifest_id: &str) -> Result<Task, ApiError> {
        self.get(&format!("encoding/manifests/dash/{manifest_id}/status"))
            .await
    }

    pub async fn start_hls_manifest(&self, manifest_id: &str) -> Result<(), ApiError> {
        self.post_action(&format!("encoding/manifests/hls/{manifest_id}/start"))
            .await
    }

    pub async fn hls_manifest_status(&self, manifest_id: &str) -> Result<Task, ApiError> {
        self.get(&format!("encoding/manifests/hls/{manifest_id}/status"))
            .await
    }
}
