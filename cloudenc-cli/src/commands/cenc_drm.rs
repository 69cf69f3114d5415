//! CENC DRM workflow: Widevine, PlayReady and FairPlay protection on fMP4
//! muxings with caller-supplied key material.

use cloudenc::models::{
    CencDrm, CencFairPlay, CencPlayReady, CencWidevine, DashManifestDefault,
    DashManifestDefaultVersion, Encoding, Fmp4Muxing, HlsManifestDefault,
    HlsManifestDefaultVersion, MuxingStream,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::Result;

const EXAMPLE_NAME: &str = "cenc_drm";

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            "Encoding with CENC DRM protection on fMP4 muxings",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let input = common::create_http_input(client, config).await?;
    let input_id = common::resource_id(input.id, "HTTP input")?;
    let output = common::create_s3_output(client, config).await?;
    let output_id = common::resource_id(output.id, "S3 output")?;
    let input_path = config.http_input_file_path()?;

    let video_config = client
        .create_h264_configuration(&common::h264_config(1080, 3_000_000))
        .await?;
    let video_stream = common::create_stream_from_input(
        client,
        &encoding_id,
        &input_id,
        &input_path,
        &common::resource_id(video_config.id, "H264 configuration")?,
    )
    .await?;

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

    // Muxings carry no outputs of their own; the DRM resources write the
    // protected segments.
    let video_muxing = client
        .create_fmp4_muxing(
            &encoding_id,
            &Fmp4Muxing {
                id: None,
                segment_length: 4.0,
                outputs: Vec::new(),
                streams: vec![MuxingStream::new(common::resource_id(
                    video_stream.id,
                    "stream",
                )?)],
            },
        )
        .await?;
    let audio_muxing = client
        .create_fmp4_muxing(
            &encoding_id,
            &Fmp4Muxing {
                id: None,
                segment_length: 4.0,
                outputs: Vec::new(),
                streams: vec![MuxingStream::new(common::resource_id(
                    audio_stream.id,
                    "stream",
                )?)],
            },
        )
        .await?;

    create_cenc_drm(
        client,
        config,
        &encoding_id,
        &common::resource_id(video_muxing.id, "fMP4 muxing")?,
        &output_id,
        &format!("{EXAMPLE_NAME}/video"),
    )
    .await?;
    create_cenc_drm(
        client,
        config,
        &encoding_id,
        &common::resource_id(audio_muxing.id, "fMP4 muxing")?,
        &output_id,
        &format!("{EXAMPLE_NAME}/audio"),
    )
    .await?;

    poll::execute_encoding(client, &encoding_id, None).await?;

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
    poll::execute_dash_manifest(client, &common::resource_id(dash.id, "DASH manifest")?).await?;
    poll::execute_hls_manifest(client, &common::resource_id(hls.id, "HLS manifest")?).await?;

    info!("CENC DRM encoding finished");
    Ok(())
}

async fn create_cenc_drm(
    client: &CloudencClient,
    config: &ConfigProvider,
    encoding_id: &str,
    muxing_id: &str,
    output_id: &str,
    relative_path: &str,
) -> Result<()> {
    client
        .create_fmp4_cenc_drm(
            encoding_id,
            muxing_id,
            &CencDrm {
                id: None,
                key: config.drm_key()?,
                kid: config.drm_widevine_kid()?,
                widevine: Some(CencWidevine {
                    pssh: config.drm_widevine_pssh()?,
                }),
                play_ready: Some(CencPlayReady { la_url: None }),
                fair_play: Some(CencFairPlay {
                    iv: config.drm_fairplay_iv()?,
                    uri: config.drm_fairplay_uri()?,
                }),
                outputs: vec![common::build_encoding_output(
                    config,
                    output_id,
                    relative_path,
                )?],
            },
        )
        .await?;
    Ok(())
}
