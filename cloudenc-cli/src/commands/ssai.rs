//! Server-side ad insertion workflow: keyframes force segment cuts at the ad
//! break boundaries and the HLS playlists carry CUE-OUT/CUE-IN markers there.

use cloudenc::models::{
    AudioMediaInfo, CustomTag, Encoding, Fmp4Muxing, HlsManifest, Keyframe, MuxingStream,
    PositionMode, StreamInfo,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::Result;

const EXAMPLE_NAME: &str = "ssai";
const RENDITIONS: [(u32, u64); 3] = [(480, 800_000), (720, 1_200_000), (1080, 2_000_000)];
/// Ad break boundaries in seconds, paired with the playlist marker emitted
/// at each cut.
const AD_BREAKS: [(f64, &str); 2] = [
    (5.0, "#EXT-X-CUE-OUT:DURATION=30"),
    (35.0, "#EXT-X-CUE-IN"),
];

struct Rendition {
    height: u32,
    stream_id: String,
    muxing_id: String,
    segment_path: String,
}

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            "Encoding with keyframes and HLS cue tags for server-side ad insertion",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let input = common::create_http_input(client, config).await?;
    let input_id = common::resource_id(input.id, "HTTP input")?;
    let output = common::create_s3_output(client, config).await?;
    let output_id = common::resource_id(output.id, "S3 output")?;
    let input_path = config.http_input_file_path()?;

    let mut renditions = Vec::new();
    for (height, bitrate) in RENDITIONS {
        let video_config = client
            .create_h264_configuration(&common::h264_config(height, bitrate))
            .await?;
        let stream = common::create_stream_from_input(
            client,
            &encoding_id,
            &input_id,
            &input_path,
            &common::resource_id(video_config.id, "H264 configuration")?,
        )
        .await?;
        let stream_id = common::resource_id(stream.id, "stream")?;

        let segment_path = format!("video/{height}p");
        let muxing = client
            .create_fmp4_muxing(
                &encoding_id,
                &Fmp4Muxing {
                    id: None,
                    segment_length: 4.0,
                    outputs: vec![common::build_encoding_output(
                        config,
                        &output_id,
                        &format!("{EXAMPLE_NAME}/{segment_path}"),
                    )?],
                    streams: vec![MuxingStream::new(&stream_id)],
                },
            )
            .await?;
        renditions.push(Rendition {
            height,
            stream_id,
            muxing_id: common::resource_id(muxing.id, "fMP4 muxing")?,
            segment_path,
        });
    }

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
    let audio_muxing = client
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
    let audio_muxing_id = common::resource_id(audio_muxing.id, "fMP4 muxing")?;

    let mut keyframes = Vec::new();
    for (time, tag_data) in AD_BREAKS {
        let keyframe = client
            .create_keyframe(
                &encoding_id,
                &Keyframe {
                    id: None,
                    time,
                    segment_cut: true,
                },
            )
            .await?;
        keyframes.push((common::resource_id(keyframe.id, "keyframe")?, tag_data));
    }

    poll::execute_encoding(client, &encoding_id, None).await?;

    let manifest = client
        .create_hls_manifest(&HlsManifest {
            id: None,
            name: "HLS manifest with ad markers".to_string(),
            manifest_name: Some("master.m3u8".to_string()),
            outputs: vec![common::build_encoding_output(config, &output_id, EXAMPLE_NAME)?],
        })
        .await?;
    let manifest_id = common::resource_id(manifest.id, "HLS manifest")?;

    for rendition in &renditions {
        let stream_info = client
            .create_hls_stream_info(
                &manifest_id,
                &StreamInfo {
                    id: None,
                    uri: format!("video_{}p.m3u8", rendition.height),
                    encoding_id: encoding_id.clone(),
                    stream_id: rendition.stream_id.clone(),
                    muxing_id: rendition.muxing_id.clone(),
                    drm_id: None,
                    audio: Some("AUDIO".to_string()),
                    segment_path: rendition.segment_path.clone(),
                },
            )
            .await?;
        let stream_info_id = common::resource_id(stream_info.id, "stream info")?;

        // Every variant playlist gets the cue markers at the keyframe cuts.
        for (keyframe_id, tag_data) in &keyframes {
            client
                .create_hls_stream_custom_tag(
                    &manifest_id,
                    &stream_info_id,
                    &CustomTag {
                        id: None,
                        keyframe_id: keyframe_id.clone(),
                        position_mode: PositionMode::Keyframe,
                        data: (*tag_data).to_string(),
                    },
                )
                .await?;
        }
    }

    client
        .create_hls_audio_media_info(
            &manifest_id,
            &AudioMediaInfo {
                id: None,
                name: "HLS audio media".to_string(),
                uri: "audio.m3u8".to_string(),
                group_id: "AUDIO".to_string(),
                encoding_id: encoding_id.clone(),
                stream_id: audio_stream_id,
                muxing_id: audio_muxing_id,
                drm_id: None,
                language: "en".to_string(),
                assoc_language: None,
                autoselect: true,
                is_default: true,
                forced: false,
                segment_path: "audio".to_string(),
            },
        )
        .await?;

    poll::execute_hls_manifest(client, &manifest_id).await?;
    info!("ad-insertion encoding finished");
    Ok(())
}
