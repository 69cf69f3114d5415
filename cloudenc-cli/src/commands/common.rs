//! Resource helpers shared by the workflow subcommands.

use cloudenc::CloudencClient;
use cloudenc::models::{
    AacAudioConfiguration, AclEntry, EncodingOutput, H264VideoConfiguration, HttpInput,
    IngestInputStream, PresetConfiguration, S3Output, Stream, StreamInput, StreamSelectionMode,
};

use crate::config::ConfigProvider;
use crate::error::{AppError, Result};

/// The server assigns ids on creation; a missing one means the response was
/// not the created resource.
pub fn resource_id(id: Option<String>, what: &'static str) -> Result<String> {
    id.ok_or(AppError::MissingResourceId(what))
}

pub async fn create_http_input(
    client: &CloudencClient,
    config: &ConfigProvider,
) -> Result<HttpInput> {
    let input = client
        .create_http_input(&HttpInput::new(config.http_input_host()?))
        .await?;
    Ok(input)
}

pub async fn create_s3_output(
    client: &CloudencClient,
    config: &ConfigProvider,
) -> Result<S3Output> {
    let output = client
        .create_s3_output(&S3Output::new(
            config.s3_output_bucket_name()?,
            config.s3_output_access_key()?,
            config.s3_output_secret_key()?,
        ))
        .await?;
    Ok(output)
}

/// Absolute path below the configured S3 base path.
fn absolute_output_path(config: &ConfigProvider, relative: &str) -> Result<String> {
    Ok(format!(
        "{}{}",
        config.s3_output_base_path()?,
        relative.trim_start_matches('/')
    ))
}

/// Output reference with public-read ACLs so results are directly playable
/// over HTTP.
pub fn build_encoding_output(
    config: &ConfigProvider,
    output_id: &str,
    relative: &str,
) -> Result<EncodingOutput> {
    Ok(EncodingOutput {
        output_id: output_id.to_string(),
        output_path: absolute_output_path(config, relative)?,
        acl: vec![AclEntry::public_read()],
    })
}

pub fn h264_config(height: u32, bitrate: u64) -> H264VideoConfiguration {
    H264VideoConfiguration {
        id: None,
        name: format!("H.264 {height}p"),
        preset_configuration: Some(PresetConfiguration::VodStandard),
        height: Some(height),
        width: None,
        bitrate: Some(bitrate),
    }
}

pub fn aac_config(bitrate: u64) -> AacAudioConfiguration {
    AacAudioConfiguration::new(bitrate)
}

/// Stream fed directly from a file on an input resource.
pub async fn create_stream_from_input(
    client: &CloudencClient,
    encoding_id: &str,
    input_id: &str,
    input_path: &str,
    codec_config_id: &str,
) -> Result<Stream> {
    let stream = client
        .create_stream(
            encoding_id,
            &Stream {
                id: None,
                name: None,
                input_streams: vec![StreamInput::from_input(input_id, input_path)],
                codec_config_id: codec_config_id.to_string(),
                mode: None,
            },
        )
        .await?;
    Ok(stream)
}

/// Stream fed from a previously created input stream.
pub async fn create_stream_from_input_stream(
    client: &CloudencClient,
    encoding_id: &str,
    name: &str,
    input_stream_id: &str,
    codec_config_id: &str,
) -> Result<Stream> {
    let stream = client
        .create_stream(
            encoding_id,
            &Stream {
                id: None,
                name: Some(name.to_string()),
                input_streams: vec![StreamInput::from_input_stream(input_stream_id)],
                codec_config_id: codec_config_id.to_string(),
                mode: None,
            },
        )
        .await?;
    Ok(stream)
}

pub async fn create_ingest_input_stream(
    client: &CloudencClient,
    encoding_id: &str,
    input_id: &str,
    input_path: &str,
) -> Result<IngestInputStream> {
    let input_stream = client
        .create_ingest_input_stream(
            encoding_id,
            &IngestInputStream {
                id: None,
                input_id: input_id.to_string(),
                input_path: input_path.to_string(),
                selection_mode: StreamSelectionMode::Auto,
            },
        )
        .await?;
    Ok(input_stream)
}
