//! Input and output storage resources.

use crate::client::CloudencClient;
use crate::error::ApiError;
use crate::models::common::Page;
use crate::models::inputs::{HttpInput, RtmpInput};
use crate::models::outputs::S3Output;

impl CloudencClient {
    pub async fn create_http_input(&self, input: &HttpInput) -> Result<HttpInput, ApiError> {
        self.post("encoding/inputs/http", input).await
    }

    /// RTMP ingest points are provisioned per account; the first listed one
    /// is used for live workflows.
    pub async fn list_rtmp_inputs(&self) -> Result<Page<RtmpInput>, ApiError> {
        self.get("encoding/inputs/rtmp").await
    }

    pub async fn create_s3_output(&self, output: &S3Output) -> Result<S3Output, ApiError> {
        self.post("encoding/outputs/s3", output).await
    }
}
