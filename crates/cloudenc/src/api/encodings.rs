//! Encoding resources: creation, streams, input streams, keyframes, start /
//! status / stop, live control.

use crate::client::CloudencClient;
use crate::error::ApiError;
use crate::models::common::{Page, Task};
use crate::models::live::{LiveEncoding, StartLiveEncodingRequest};
use crate::models::manifests::StartEncodingRequest;
use crate::models::streams::{
    AudioMixInputStream, ConcatenationInputStream, DolbyVisionInputStream, Encoding,
    EncodingListQueryParams, IngestInputStream, Keyframe, Stream, TimeBasedTrimmingInputStream,
};

impl CloudencClient {
    pub async fn create_encoding(&self, encoding: &Encoding) -> Result<Encoding, ApiError> {
        self.post("encoding/encodings", encoding).await
    }

    pub async fn list_encodings(
        &self,
        params: &EncodingListQueryParams,
    ) -> Result<Page<Encoding>, ApiError> {
        self.get_with_query("encoding/encodings", params).await
    }

    /// Start a previously configured encoding, optionally with a request
    /// body carrying per-title or manifest settings.
    pub async fn start_encoding(
        &self,
        encoding_id: &str,
        request: Option<&StartEncodingRequest>,
    ) -> Result<(), ApiError> {
        let path = format!("encoding/encodings/{encoding_id}/start");
        match request {
            Some(request) => self.post_action_with(&path, request).await,
            None => self.post_action(&path).await,
        }
    }

    pub async fn encoding_status(&self, encoding_id: &str) -> Result<Task, ApiError> {
        self.get(&format!("encoding/encodings/{encoding_id}/status"))
            .await
    }

    pub async fn create_stream(
        &self,
        encoding_id: &str,
        stream: &Stream,
    ) -> Result<Stream, ApiError> {
        self.post(&format!("encoding/encodings/{encoding_id}/streams"), stream)
            .await
    }

    pub async fn get_stream(&self, encoding_id: &str, stream_id: &str) -> Result<Stream, ApiError> {
        self.get(&format!(
            "encoding/encodings/{encoding_id}/streams/{stream_id}"
        ))
        .await
    }

    pub async fn create_ingest_input_stream(
        &self,
        encoding_id: &str,
        input_stream: &IngestInputStream,
    ) -> Result<IngestInputStream, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/input-streams/ingest"),
            input_stream,
        )
        .await
    }

    pub async fn create_trimming_input_stream(
        &self,
        encoding_id: &str,
        input_stream: &TimeBasedTrimmingInputStream,
    ) -> Result<TimeBasedTrimmingInputStream, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/input-streams/trimming/time-based"),
            input_stream,
        )
        .await
    }

    pub async fn create_concatenation_input_stream(
        &self,
        encoding_id: &str,
        input_stream: &ConcatenationInputStream,
    ) -> Result<ConcatenationInputStream, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/input-streams/concatenation"),
            input_stream,
        )
        .await
    }

    pub async fn create_dolby_vision_input_stream(
        &self,
        encoding_id: &str,
        input_stream: &DolbyVisionInputStream,
    ) -> Result<DolbyVisionInputStream, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/input-streams/dolby-vision"),
            input_stream,
        )
        .await
    }

    pub async fn create_audio_mix_input_stream(
        &self,
        encoding_id: &str,
        input_stream: &AudioMixInputStream,
    ) -> Result<AudioMixInputStream, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/input-streams/audio-mix"),
            input_stream,
        )
        .await
    }

    pub async fn create_keyframe(
        &self,
        encoding_id: &str,
        keyframe: &Keyframe,
    ) -> Result<Keyframe, ApiError> {
        self.post(
            &format!("encoding/encodings/{encoding_id}/keyframes"),
            keyframe,
        )
        .await
    }

    pub async fn start_live_encoding(
        &self,
        encoding_id: &str,
        request: &StartLiveEncodingRequest,
    ) -> Result<(), ApiError> {
        self.post_action_with(
            &format!("encoding/encodings/{encoding_id}/live/start"),
            request,
        )
        .await
    }

    pub async fn stop_live_encoding(&self, encoding_id: &str) -> Result<(), ApiError> {
        self.post_action(&format!("encoding/encodings/{encoding_id}/live/stop"))
            .await
    }

    /// Ingest details of a running live encoding; fails until the encoder
    /// is actually reachable.
    pub async fn live_encoding_details(&self, encoding_id: &str) -> Result<LiveEncoding, ApiError> {
        self.get(&format!("encoding/encodings/{encoding_id}/live"))
            .await
    }
}
