//! Codec configurations and filters.

use crate::client::CloudencClient;
use crate::error::ApiError;
use crate::models::configurations::{
    AacAudioConfiguration, CodecConfigTypeResponse, H264VideoConfiguration,
    H265VideoConfiguration, VorbisAudioConfiguration, Vp9VideoConfiguration,
};
use crate::models::filters::{DeinterlaceFilter, StreamFilter, TextFilter, WatermarkFilter};

impl CloudencClient {
    pub async fn create_h264_configuration(
        &self,
        config: &H264VideoConfiguration,
    ) -> Result<H264VideoConfiguration, ApiError> {
        self.post("encoding/configurations/video/h264", config)
            .await
    }

    pub async fn create_h265_configuration(
        &self,
        config: &H265VideoConfiguration,
    ) -> Result<H265VideoConfiguration, ApiError> {
        self.post("encoding/configurations/video/h265", config)
            .await
    }

    pub async fn create_vp9_configuration(
        &self,
        config: &Vp9VideoConfiguration,
    ) -> Result<Vp9VideoConfiguration, ApiError> {
        self.post("encoding/configurations/video/vp9", config).await
    }

    pub async fn create_aac_configuration(
        &self,
        config: &AacAudioConfiguration,
    ) -> Result<AacAudioConfiguration, ApiError> {
        self.post("encoding/configurations/audio/aac", config).await
    }

    pub async fn create_vorbis_configuration(
        &self,
        config: &VorbisAudioConfiguration,
    ) -> Result<VorbisAudioConfiguration, ApiError> {
        self.post("encoding/configurations/audio/vorbis", config)
            .await
    }

    /// Codec discriminator of an arbitrary configuration id, used when a
    /// workflow walks muxings of mixed codecs.
    pub async fn get_configuration_type(
        &self,
        configuration_id: &str,
    ) -> Result<CodecConfigTypeResponse, ApiError> {
        self.get(&format!("encoding/configurations/{configuration_id}/type"))
            .await
    }

    pub async fn get_h265_configuration(
        &self,
        configuration_id: &str,
    ) -> Result<H265VideoConfiguration, ApiError> {
        self.get(&format!(
            "encoding/configurations/video/h265/{configuration_id}"
        ))
        .await
    }

    pub async fn get_aac_configuration(
        &self,
        configuration_id: &str,
    ) -> Result<AacAudioConfiguration, ApiError> {
        self.get(&format!(
            "encoding/configurations/audio/aac/{configuration_id}"
        ))
        .await
    }

    pub async fn create_watermark_filter(
        &self,
        filter: &WatermarkFilter,
    ) -> Result<WatermarkFilter, ApiError> {
        self.post("encoding/filters/watermark", filter).await
    }

    pub async fn create_text_filter(&self, filter: &TextFilter) -> Result<TextFilter, ApiError> {
        self.post("encoding/filters/text", filter).await
    }

    pub async fn create_deinterlace_filter(
        &self,
        filter: &DeinterlaceFilter,
    ) -> Result<DeinterlaceFilter, ApiError> {
        self.post("encoding/filters/deinterlace", filter).await
    }

    /// Attach filters to a stream; each entry's position dictates
    /// application order.
    pub async fn create_stream_filters(
        &self,
        encoding_id: &str,
        stream_id: &str,
        filters: &[StreamFilter],
    ) -> Result<Vec<StreamFilter>, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/streams/{stream_id}/filters"),
            filters,
        )
        .await
    }
}
