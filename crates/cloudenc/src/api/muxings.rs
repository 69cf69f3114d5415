//! Muxings and the DRM resources attached to them.

use crate::client::CloudencClient;
use crate::error::ApiError;
use crate::models::common::Page;
use crate::models::drm::{CencDrm, SpekeDrm};
use crate::models::muxings::{Fmp4Muxing, Mp4Muxing, TsMuxing, WebmMuxing};

impl CloudencClient {
    pub async fn create_fmp4_muxing(
        &self,
        encoding_id: &str,
        muxing: &Fmp4Muxing,
    ) -> Result<Fmp4Muxing, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/muxings/fmp4"),
            muxing,
        )
        .await
    }

    pub async fn create_ts_muxing(
        &self,
        encoding_id: &str,
        muxing: &TsMuxing,
    ) -> Result<TsMuxing, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/muxings/ts"),
            muxing,
        )
        .await
    }

    pub async fn create_mp4_muxing(
        &self,
        encoding_id: &str,
        muxing: &Mp4Muxing,
    ) -> Result<Mp4Muxing, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/muxings/mp4"),
            muxing,
        )
        .await
    }

    pub async fn create_webm_muxing(
        &self,
        encoding_id: &str,
        muxing: &WebmMuxing,
    ) -> Result<WebmMuxing, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/muxings/webm"),
            muxing,
        )
        .await
    }

    /// All fmp4 muxings of an encoding; per-title workflows list these after
    /// the fact to discover the generated renditions.
    pub async fn list_fmp4_muxings(&self, encoding_id: &str) -> Result<Page<Fmp4Muxing>, ApiError> {
        self.get(&format!("encoding/encodings/{encoding_id}/muxings/fmp4"))
            .await
    }

    pub async fn create_fmp4_cenc_drm(
        &self,
        encoding_id: &str,
        muxing_id: &str,
        drm: &CencDrm,
    ) -> Result<CencDrm, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/muxings/fmp4/{muxing_id}/drm/cenc"),
            drm,
        )
        .await
    }

    pub async fn create_fmp4_speke_drm(
        &self,
        encoding_id: &str,
        muxing_id: &str,
        drm: &SpekeDrm,
    ) -> Result<SpekeDrm, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/muxings/fmp4/{muxing_id}/drm/speke"),
            drm,
        )
        .await
    }
}
