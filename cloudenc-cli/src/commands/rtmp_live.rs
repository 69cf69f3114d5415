//! RTMP live workflow: a live encoding fed from the account's RTMP ingest
//! point, with default DASH and HLS manifests updated while the stream runs.

use std::io::BufRead;

use cloudenc::models::{
    DashManifestDefault, DashManifestDefaultVersion, Encoding, Fmp4Muxing, H264VideoConfiguration,
    HlsManifestDefault, HlsManifestDefaultVersion, LiveDashManifest, LiveHlsManifest, MuxingStream,
    PresetConfiguration, StartLiveEncodingRequest, Stream, StreamInput, StreamSelectionMode,
    TaskStatus,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::{AppError, Result};

const EXAMPLE_NAME: &str = "rtmp_live";
const STREAM_KEY: &str = "myStreamKey";
/// Path the RTMP ingest exposes the incoming stream under.
const LIVE_INPUT_PATH: &str = "live";

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let rtmp_inputs = client.list_rtmp_inputs().await?;
    let rtmp_input = rtmp_inputs.items.into_iter().next().ok_or(AppError::NoRtmpInput)?;

    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            "Live encoding from the RTMP ingest point",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let output = common::create_s3_output(client, config).await?;
    let output_id = common::resource_id(output.id, "S3 output")?;

    let video_config = client
        .create_h264_configuration(&H264VideoConfiguration {
            id: None,
            name: "H.264 1080p live".to_string(),
            preset_configuration: Some(PresetConfiguration::LiveStandard),
            height: Some(1080),
            width: None,
            bitrate: Some(3_000_000),
        })
        .await?;
    let audio_config = client
        .create_aac_configuration(&common::aac_config(128_000))
        .await?;

    // The RTMP source carries video at position 0 and audio at position 1.
    let video_stream = client
        .create_stream(
            &encoding_id,
            &Stream {
                id: None,
                name: None,
                input_streams: vec![live_stream_input(&rtmp_input.id, 0)],
                codec_config_id: common::resource_id(video_config.id, "H264 configuration")?,
                mode: None,
            },
        )
        .await?;
    let audio_stream = client
        .create_stream(
            &encoding_id,
            &Stream {
                id: None,
                name: None,
                input_streams: vec![live_stream_input(&rtmp_input.id, 1)],
                codec_config_id: common::resource_id(audio_config.id, "AAC configuration")?,
                mode: None,
            },
        )
        .await?;

    for (stream, path) in [(video_stream, "video"), (audio_stream, "audio")] {
        client
            .create_fmp4_muxing(
                &encoding_id,
                &Fmp4Muxing {
                    id: None,
                    segment_length: 4.0,
                    outputs: vec![common::build_encoding_output(
                        config,
                        &output_id,
                        &format!("{EXAMPLE_NAME}/{path}"),
                    )?],
                    streams: vec![MuxingStream::new(common::resource_id(
                        stream.id, "stream",
                    )?)],
                },
            )
            .await?;
    }

    let dash_manifest = client
        .create_dash_manifest_default(&DashManifestDefault {
            id: None,
            encoding_id: encoding_id.clone(),
            manifest_name: "stream.mpd".to_string(),
            version: DashManifestDefaultVersion::V1,
            outputs: vec![common::build_encoding_output(config, &output_id, EXAMPLE_NAME)?],
        })
        .await?;
    let hls_manifest = client
        .create_hls_manifest_default(&HlsManifestDefault {
            id: None,
            encoding_id: encoding_id.clone(),
            name: "HLS manifest".to_string(),
            manifest_name: "master.m3u8".to_string(),
            version: HlsManifestDefaultVersion::V1,
            outputs: vec![common::build_encoding_output(config, &output_id, EXAMPLE_NAME)?],
        })
        .await?;

    client
        .start_live_encoding(
            &encoding_id,
            &StartLiveEncodingRequest {
                stream_key: STREAM_KEY.to_string(),
                dash_manifests: vec![LiveDashManifest {
                    manifest_id: common::resource_id(dash_manifest.id, "DASH manifest")?,
                }],
                hls_manifests: vec![LiveHlsManifest {
                    manifest_id: common::resource_id(hls_manifest.id, "HLS manifest")?,
                }],
            },
        )
        .await?;

    poll::wait_until_encoding_status(client, &encoding_id, TaskStatus::Running).await?;
    let details = poll::wait_for_live_encoding_details(client, &encoding_id).await?;

    println!("Live encoding is running.");
    println!(
        "Point your encoder at rtmp://{}/live with stream key '{}'.",
        details.encoder_ip, details.stream_key
    );
    println!("Press Enter to stop the live encoding.");
    wait_for_enter().await?;

    info!("stopping live encoding");
    client.stop_live_encoding(&encoding_id).await?;
    poll::wait_until_encoding_status(client, &encoding_id, TaskStatus::Finished).await?;

    info!("live encoding shut down");
    Ok(())
}

fn live_stream_input(rtmp_input_id: &str, position: u32) -> StreamInput {
    StreamInput {
        input_id: Some(rtmp_input_id.to_string()),
        input_path: Some(LIVE_INPUT_PATH.to_string()),
        selection_mode: Some(StreamSelectionMode::Auto),
        position: Some(position),
        input_stream_id: None,
    }
}

/// Blocks a worker thread on stdin so the async runtime keeps polling the
/// encoding in the meantime.
async fn wait_for_enter() -> Result<()> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).map(drop)
    })
    .await??;
    Ok(())
}
