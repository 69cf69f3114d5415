//! Per-title workflow: one template stream expanded server-side into a
//! content-adaptive bitrate ladder.

use cloudenc::models::{
    AutoRepresentation, DashManifestDefault, DashManifestDefaultVersion, Encoding, Fmp4Muxing,
    H264PerTitleConfiguration, H264VideoConfiguration, HlsManifestDefault,
    HlsManifestDefaultVersion, ManifestGenerator, ManifestResource, MuxingStream, PerTitle,
    PresetConfiguration, StartEncodingRequest, Stream, StreamInput, StreamMode,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::Result;

const EXAMPLE_NAME: &str = "per_title";

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            "Per-title encoding with automatically generated renditions",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let input = common::create_http_input(client, config).await?;
    let input_id = common::resource_id(input.id, "HTTP input")?;
    let output = common::create_s3_output(client, config).await?;
    let output_id = common::resource_id(output.id, "S3 output")?;
    let input_path = config.http_input_file_path()?;

    // No height/bitrate: the per-title algorithm fills those in for each
    // generated rendition.
    let video_config = client
        .create_h264_configuration(&H264VideoConfiguration {
            id: None,
            name: "H.264 per-title template".to_string(),
            preset_configuration: Some(PresetConfiguration::VodStandard),
            height: None,
            width: None,
            bitrate: None,
        })
        .await?;
    let video_stream = client
        .create_stream(
            &encoding_id,
            &Stream {
                id: None,
                name: Some("Per-title template stream".to_string()),
                input_streams: vec![StreamInput::from_input(&input_id, &input_path)],
                codec_config_id: common::resource_id(video_config.id, "H264 configuration")?,
                mode: Some(StreamMode::PerTitleTemplate),
            },
        )
        .await?;
    let video_stream_id = common::resource_id(video_stream.id, "stream")?;

    let audio_config = client
        .create_aac_configuration(&common::aac_config(128_000))
        .await?;
    let audio_stream = common::create_stream_from_input(
        client,
        &encoding_id,
        &input_id,
        &input_path,
        &common::resource_id(audio_config.id, "AAC configuration")?,
    )
    .await?;
    let audio_stream_id = common::resource_id(audio_stream.id, "stream")?;

    // Placeholders are substituted per generated rendition.
    client
        .create_fmp4_muxing(
            &encoding_id,
            &Fmp4Muxing {
                id: None,
                segment_length: 4.0,
                outputs: vec![common::build_encoding_output(
                    config,
                    &output_id,
                    &format!("{EXAMPLE_NAME}/video/{{height}}/{{bitrate}}_{{uuid}}"),
                )?],
                streams: vec![MuxingStream::new(&video_stream_id)],
            },
        )
        .await?;
    client
        .create_fmp4_muxing(
            &encoding_id,
            &Fmp4Muxing {
                id: None,
                segment_length: 4.0,
                outputs: vec![common::build_encoding_output(
                    config,
                    &output_id,
                    &format!("{EXAMPLE_NAME}/audio"),
                )?],
                streams: vec![MuxingStream::new(&audio_stream_id)],
            },
        )
        .await?;

    let dash = client
        .create_dash_manifest_default(&DashManifestDefault {
            id: None,
            encoding_id: encoding_id.clone(),
            manifest_name: "stream.mpd".to_string(),
            version: DashManifestDefaultVersion::V1,
            outputs: vec![common::build_encoding_output(config, &output_id, EXAMPLE_NAME)?],
        })
        .await?;
    let hls = client
        .create_hls_manifest_default(&HlsManifestDefault {
            id: None,
            encoding_id: encoding_id.clone(),
            name: "master.m3u8".to_string(),
            manifest_name: "master.m3u8".to_string(),
            version: HlsManifestDefaultVersion::V1,
            outputs: vec![common::build_encoding_output(config, &output_id, EXAMPLE_NAME)?],
        })
        .await?;

    let start_request = StartEncodingRequest {
        per_title: Some(PerTitle {
            h264_configuration: Some(H264PerTitleConfiguration {
                auto_representations: AutoRepresentation {},
            }),
        }),
        manifest_generator: Some(ManifestGenerator::V2),
        vod_dash_manifests: vec![ManifestResource::new(common::resource_id(
            dash.id,
            "DASH manifest",
        )?)],
        vod_hls_manifests: vec![ManifestResource::new(common::resource_id(
            hls.id,
            "HLS manifest",
        )?)],
    };

    poll::execute_encoding(client, &encoding_id, Some(&start_request)).await?;
    info!("per-title encoding finished");
    Ok(())
}
