//! SPEKE DRM workflow: keys are fetched from a SPEKE key provider at
//! encoding time. CENC (Widevine + PlayReady) feeds the DASH manifest,
//! FairPlay feeds the HLS manifest.

use cloudenc::models::{
    AudioAdaptationSet, AudioMediaInfo, DashFmp4Representation, DashManifest, Encoding,
    FAIRPLAY_SYSTEM_ID, Fmp4Muxing, HlsManifest, MuxingStream, Period, SpekeDrm, SpekeDrmProvider,
    StreamInfo, VideoAdaptationSet, WIDEVINE_SYSTEM_ID,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::Result;

const EXAMPLE_NAME: &str = "speke_drm";
const PLAYREADY_SYSTEM_ID: &str = cloudenc::models::PLAYREADY_SYSTEM_ID;

struct ProtectedMuxing {
    muxing_id: String,
    stream_id: String,
    drms: Vec<SpekeDrm>,
    is_video: bool,
}

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            "Encoding with CENC and FairPlay DRM protection using SPEKE",
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

    let mut muxings = Vec::new();
    for (stream, is_video, name) in [
        (video_stream, true, "video"),
        (audio_stream, false, "audio"),
    ] {
        let stream_id = common::resource_id(stream.id, "stream")?;
        let muxing = client
            .create_fmp4_muxing(
                &encoding_id,
                &Fmp4Muxing {
                    id: None,
                    segment_length: 4.0,
                    outputs: Vec::new(),
                    streams: vec![MuxingStream::new(&stream_id)],
                },
            )
            .await?;
        let muxing_id = common::resource_id(muxing.id, "fMP4 muxing")?;

        let cenc = create_speke_drm(
            client,
            config,
            &encoding_id,
            &muxing_id,
            &output_id,
            &format!("{EXAMPLE_NAME}/{name}/cenc"),
            vec![
                WIDEVINE_SYSTEM_ID.to_string(),
                PLAYREADY_SYSTEM_ID.to_string(),
            ],
        )
        .await?;
        let fairplay = create_speke_drm(
            client,
            config,
            &encoding_id,
            &muxing_id,
            &output_id,
            &format!("{EXAMPLE_NAME}/{name}/fairplay"),
            vec![FAIRPLAY_SYSTEM_ID.to_string()],
        )
        .await?;

        muxings.push(ProtectedMuxing {
            muxing_id,
            stream_id,
            drms: vec![cenc, fairplay],
            is_video,
        });
    }

    poll::execute_encoding(client, &encoding_id, None).await?;

    let dash_id = create_dash_manifest(client, config, &encoding_id, &output_id, &muxings).await?;
    let hls_id = create_hls_manifest(client, config, &encoding_id, &output_id, &muxings).await?;
    poll::execute_dash_manifest(client, &dash_id).await?;
    poll::execute_hls_manifest(client, &hls_id).await?;

    info!("SPEKE DRM encoding finished");
    Ok(())
}

async fn create_speke_drm(
    client: &CloudencClient,
    config: &ConfigProvider,
    encoding_id: &str,
    muxing_id: &str,
    output_id: &str,
    relative_path: &str,
    system_ids: Vec<String>,
) -> Result<SpekeDrm> {
    let drm = client
        .create_fmp4_speke_drm(
            encoding_id,
            muxing_id,
            &SpekeDrm {
                id: None,
                provider: SpekeDrmProvider {
                    url: config.speke_url()?,
                    username: config.speke_username(),
                    password: config.speke_password(),
                },
                content_id: config.drm_content_id(),
                system_ids,
                outputs: vec![common::build_encoding_output(
                    config,
                    output_id,
                    relative_path,
                )?],
            },
        )
        .await?;
    Ok(drm)
}

/// DASH references only the CENC-protected segments.
async fn create_dash_manifest(
    client: &CloudencClient,
    config: &ConfigProvider,
    encoding_id: &str,
    output_id: &str,
    muxings: &[ProtectedMuxing],
) -> Result<String> {
    let manifest = client
        .create_dash_manifest(&DashManifest {
            id: None,
            name: "DASH manifest".to_string(),
            manifest_name: "stream.mpd".to_string(),
            outputs: vec![common::build_encoding_output(config, output_id, EXAMPLE_NAME)?],
        })
        .await?;
    let manifest_id = common::resource_id(manifest.id, "DASH manifest")?;

    let period = client.create_dash_period(&manifest_id, &Period::default()).await?;
    let period_id = common::resource_id(period.id, "period")?;

    let video_set = client
        .create_dash_video_adaptation_set(&manifest_id, &period_id, &VideoAdaptationSet::default())
        .await?;
    let video_set_id = common::resource_id(video_set.id, "video adaptation set")?;
    let audio_set = client
        .create_dash_audio_adaptation_set(
            &manifest_id,
            &period_id,
            &AudioAdaptationSet {
                id: None,
                lang: Some("en".to_string()),
            },
        )
        .await?;
    let audio_set_id = common::resource_id(audio_set.id, "audio adaptation set")?;

    for muxing in muxings {
        let Some(drm) = muxing
            .drms
            .iter()
            .find(|drm| drm.protects_system(WIDEVINE_SYSTEM_ID))
        else {
            continue;
        };
        let segment_path = drm_segment_path(drm)?;
        let adaptation_set_id = if muxing.is_video {
            &video_set_id
        } else {
            &audio_set_id
        };
        client
            .create_dash_fmp4_representation(
                &manifest_id,
                &period_id,
                adaptation_set_id,
                &DashFmp4Representation::template(encoding_id, &muxing.muxing_id, segment_path),
            )
            .await?;
    }

    Ok(manifest_id)
}

/// HLS references only the FairPlay-protected segments.
async fn create_hls_manifest(
    client: &CloudencClient,
    config: &ConfigProvider,
    encoding_id: &str,
    output_id: &str,
    muxings: &[ProtectedMuxing],
) -> Result<String> {
    let manifest = client
        .create_hls_manifest(&HlsManifest {
            id: None,
            name: "HLS manifest".to_string(),
            manifest_name: Some("master.m3u8".to_string()),
            outputs: vec![common::build_encoding_output(config, output_id, EXAMPLE_NAME)?],
        })
        .await?;
    let manifest_id = common::resource_id(manifest.id, "HLS manifest")?;

    for muxing in muxings {
        let Some(drm) = muxing
            .drms
            .iter()
            .find(|drm| drm.protects_system(FAIRPLAY_SYSTEM_ID))
        else {
            continue;
        };
        let segment_path = drm_segment_path(drm)?;
        let drm_id = drm
            .id
            .clone()
            .ok_or(crate::error::AppError::MissingResourceId("SPEKE DRM"))?;

        if muxing.is_video {
            client
                .create_hls_stream_info(
                    &manifest_id,
                    &StreamInfo {
                        id: None,
                        uri: "video.m3u8".to_string(),
                        encoding_id: encoding_id.to_string(),
                        stream_id: muxing.stream_id.clone(),
                        muxing_id: muxing.muxing_id.clone(),
                        drm_id: Some(drm_id),
                        audio: Some("AUDIO".to_string()),
                        segment_path,
                    },
                )
                .await?;
        } else {
            client
                .create_hls_audio_media_info(
                    &manifest_id,
                    &AudioMediaInfo {
                        id: None,
                        name: "HLS audio media".to_string(),
                        uri: "audio.m3u8".to_string(),
                        group_id: "AUDIO".to_string(),
                        encoding_id: encoding_id.to_string(),
                        stream_id: muxing.stream_id.clone(),
                        muxing_id: muxing.muxing_id.clone(),
                        drm_id: Some(drm_id),
                        language: "en".to_string(),
                        assoc_language: None,
                        autoselect: true,
                        is_default: true,
                        forced: false,
                        segment_path,
                    },
                )
                .await?;
        }
    }

    Ok(manifest_id)
}

/// Segment path relative to the manifest location, derived from the DRM's
/// output path.
fn drm_segment_path(drm: &SpekeDrm) -> Result<String> {
    let output = drm
        .outputs
        .first()
        .ok_or(crate::error::AppError::MissingResourceId("DRM output"))?;
    let relative = output
        .output_path
        .rsplit(&format!("{EXAMPLE_NAME}/"))
        .next()
        .unwrap_or(&output.output_path);
    Ok(relative.to_string())
}
