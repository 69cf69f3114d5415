//! Multi-codec workflow: H.264, H.265 and VP9 renditions encoded as three
//! independent encodings run concurrently, then combined DASH and HLS
//! manifests referencing all of them.

use cloudenc::models::{
    AclEntry, AudioAdaptationSet, AudioMediaInfo, DashFmp4Representation, DashManifest,
    DashWebmRepresentation, Encoding, EncodingOutput, Fmp4Muxing, H265VideoConfiguration,
    HlsManifest, MuxingStream, Period, PresetConfiguration, StreamInfo, TsMuxing,
    VideoAdaptationSet, VorbisAudioConfiguration, Vp9VideoConfiguration, WebmMuxing,
};
use cloudenc::{CloudencClient, poll};
use tokio::task::JoinSet;
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::{AppError, Result};

const EXAMPLE_NAME: &str = "multi_codec";
const RENDITIONS: [(u32, u64); 3] = [(480, 1_200_000), (720, 2_400_000), (1080, 4_800_000)];
const SEGMENT_LENGTH: f64 = 4.0;

/// Everything the manifest assembly needs to know about one muxing.
#[derive(Debug, Clone)]
struct MuxingRef {
    encoding_id: String,
    stream_id: String,
    muxing_id: String,
    segment_path: String,
}

#[derive(Debug, Default)]
struct H264Outputs {
    fmp4: Vec<MuxingRef>,
    ts: Vec<MuxingRef>,
    audio_fmp4: Option<MuxingRef>,
    audio_ts: Option<MuxingRef>,
}

#[derive(Debug, Default)]
struct SegmentedOutputs {
    video: Vec<MuxingRef>,
    audio: Option<MuxingRef>,
}

enum TaskOutput {
    H264(H264Outputs),
    H265(SegmentedOutputs),
    Vp9(SegmentedOutputs),
}

/// Shared context cloned into each encoding task.
#[derive(Clone)]
struct Ctx {
    client: CloudencClient,
    input_id: String,
    output_id: String,
    input_path: String,
    s3_base: String,
}

impl Ctx {
    fn encoding_output(&self, relative: &str) -> EncodingOutput {
        EncodingOutput {
            output_id: self.output_id.clone(),
            output_path: format!("{}{EXAMPLE_NAME}/{relative}", self.s3_base),
            acl: vec![AclEntry::public_read()],
        }
    }
}

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let input = common::create_http_input(client, config).await?;
    let output = common::create_s3_output(client, config).await?;
    let ctx = Ctx {
        client: client.clone(),
        input_id: common::resource_id(input.id, "HTTP input")?,
        output_id: common::resource_id(output.id, "S3 output")?,
        input_path: config.http_input_file_path()?,
        s3_base: config.s3_output_base_path()?,
    };

    // Fork-join: the three encodings are independent and only their outputs
    // are combined afterwards.
    let mut tasks = JoinSet::new();
    {
        let ctx = ctx.clone();
        tasks.spawn(async move { run_h264_aac(&ctx).await.map(TaskOutput::H264) });
    }
    {
        let ctx = ctx.clone();
        tasks.spawn(async move { run_h265(&ctx).await.map(TaskOutput::H265) });
    }
    {
        let ctx = ctx.clone();
        tasks.spawn(async move { run_vp9_vorbis(&ctx).await.map(TaskOutput::Vp9) });
    }

    let mut h264 = H264Outputs::default();
    let mut h265 = SegmentedOutputs::default();
    let mut vp9 = SegmentedOutputs::default();
    while let Some(joined) = tasks.join_next().await {
        match joined?? {
            TaskOutput::H264(outputs) => h264 = outputs,
            TaskOutput::H265(outputs) => h265 = outputs,
            TaskOutput::Vp9(outputs) => vp9 = outputs,
        }
    }

    let dash_id = create_dash_manifest(&ctx, &h264, &h265, &vp9).await?;
    let hls_id = create_hls_manifest(&ctx, &h264).await?;
    poll::execute_dash_manifest(client, &dash_id).await?;
    poll::execute_hls_manifest(client, &hls_id).await?;

    info!("multi-codec encoding finished");
    Ok(())
}

async fn run_h264_aac(ctx: &Ctx) -> Result<H264Outputs> {
    let encoding = ctx
        .client
        .create_encoding(&Encoding::new(
            format!("{EXAMPLE_NAME} h264-aac"),
            "H.264 and AAC renditions for DASH and HLS",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let mut outputs = H264Outputs::default();
    for (height, bitrate) in RENDITIONS {
        let video_config = ctx
            .client
            .create_h264_configuration(&common::h264_config(height, bitrate))
            .await?;
        let stream = common::create_stream_from_input(
            &ctx.client,
            &encoding_id,
            &ctx.input_id,
            &ctx.input_path,
            &common::resource_id(video_config.id, "H264 configuration")?,
        )
        .await?;
        let stream_id = common::resource_id(stream.id, "stream")?;

        let fmp4_path = format!("video/h264/{height}p/fmp4");
        let fmp4 = ctx
            .client
            .create_fmp4_muxing(
                &encoding_id,
                &Fmp4Muxing {
                    id: None,
                    segment_length: SEGMENT_LENGTH,
                    outputs: vec![ctx.encoding_output(&fmp4_path)],
                    streams: vec![MuxingStream::new(&stream_id)],
                },
            )
            .await?;
        outputs.fmp4.push(MuxingRef {
            encoding_id: encoding_id.clone(),
            stream_id: stream_id.clone(),
            muxing_id: common::resource_id(fmp4.id, "fMP4 muxing")?,
            segment_path: fmp4_path,
        });

        let ts_path = format!("video/h264/{height}p/ts");
        let ts = ctx
            .client
            .create_ts_muxing(
                &encoding_id,
                &TsMuxing {
                    id: None,
                    segment_length: SEGMENT_LENGTH,
                    outputs: vec![ctx.encoding_output(&ts_path)],
                    streams: vec![MuxingStream::new(&stream_id)],
                },
            )
            .await?;
        outputs.ts.push(MuxingRef {
            encoding_id: encoding_id.clone(),
            stream_id,
            muxing_id: common::resource_id(ts.id, "TS muxing")?,
            segment_path: ts_path,
        });
    }

    let audio_config = ctx
        .client
        .create_aac_configuration(&common::aac_config(128_000))
        .await?;
    let audio_stream = common::create_stream_from_input(
        &ctx.client,
        &encoding_id,
        &ctx.input_id,
        &ctx.input_path,
        &common::resource_id(audio_config.id, "AAC configuration")?,
    )
    .await?;
    let audio_stream_id = common::resource_id(audio_stream.id, "stream")?;

    let audio_fmp4_path = "audio/aac/fmp4".to_string();
    let audio_fmp4 = ctx
        .client
        .create_fmp4_muxing(
            &encoding_id,
            &Fmp4Muxing {
                id: None,
                segment_length: SEGMENT_LENGTH,
                outputs: vec![ctx.encoding_output(&audio_fmp4_path)],
                streams: vec![MuxingStream::new(&audio_stream_id)],
            },
        )
        .await?;
    outputs.audio_fmp4 = Some(MuxingRef {
        encoding_id: encoding_id.clone(),
        stream_id: audio_stream_id.clone(),
        muxing_id: common::resource_id(audio_fmp4.id, "fMP4 muxing")?,
        segment_path: audio_fmp4_path,
    });

    let audio_ts_path = "audio/aac/ts".to_string();
    let audio_ts = ctx
        .client
        .create_ts_muxing(
            &encoding_id,
            &TsMuxing {
                id: None,
                segment_length: SEGMENT_LENGTH,
                outputs: vec![ctx.encoding_output(&audio_ts_path)],
                streams: vec![MuxingStream::new(&audio_stream_id)],
            },
        )
        .await?;
    outputs.audio_ts = Some(MuxingRef {
        encoding_id: encoding_id.clone(),
        stream_id: audio_stream_id,
        muxing_id: common::resource_id(audio_ts.id, "TS muxing")?,
        segment_path: audio_ts_path,
    });

    poll::execute_encoding(&ctx.client, &encoding_id, None).await?;
    Ok(outputs)
}

async fn run_h265(ctx: &Ctx) -> Result<SegmentedOutputs> {
    let encoding = ctx
        .client
        .create_encoding(&Encoding::new(
            format!("{EXAMPLE_NAME} h265"),
            "H.265 renditions for DASH",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let mut outputs = SegmentedOutputs::default();
    for (height, bitrate) in RENDITIONS {
        let video_config = ctx
            .client
            .create_h265_configuration(&H265VideoConfiguration {
                id: None,
                name: format!("H.265 {height}p"),
                preset_configuration: Some(PresetConfiguration::VodStandard),
                height: Some(height),
                bitrate: Some(bitrate),
                profile: None,
                dynamic_range_format: None,
            })
            .await?;
        let stream = common::create_stream_from_input(
            &ctx.client,
            &encoding_id,
            &ctx.input_id,
            &ctx.input_path,
            &common::resource_id(video_config.id, "H265 configuration")?,
        )
        .await?;
        let stream_id = common::resource_id(stream.id, "stream")?;

        let path = format!("video/h265/{height}p");
        let muxing = ctx
            .client
            .create_fmp4_muxing(
                &encoding_id,
                &Fmp4Muxing {
                    id: None,
                    segment_length: SEGMENT_LENGTH,
                    outputs: vec![ctx.encoding_output(&path)],
                    streams: vec![MuxingStream::new(&stream_id)],
                },
            )
            .await?;
        outputs.video.push(MuxingRef {
            encoding_id: encoding_id.clone(),
            stream_id,
            muxing_id: common::resource_id(muxing.id, "fMP4 muxing")?,
            segment_path: path,
        });
    }

    poll::execute_encoding(&ctx.client, &encoding_id, None).await?;
    Ok(outputs)
}

async fn run_vp9_vorbis(ctx: &Ctx) -> Result<SegmentedOutputs> {
    let encoding = ctx
        .client
        .create_encoding(&Encoding::new(
            format!("{EXAMPLE_NAME} vp9-vorbis"),
            "VP9 and Vorbis renditions for DASH",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let mut outputs = SegmentedOutputs::default();
    for (height, bitrate) in RENDITIONS {
        let video_config = ctx
            .client
            .create_vp9_configuration(&Vp9VideoConfiguration {
                id: None,
                name: format!("VP9 {height}p"),
                height: Some(height),
                bitrate: Some(bitrate),
            })
            .await?;
        let stream = common::create_stream_from_input(
            &ctx.client,
            &encoding_id,
            &ctx.input_id,
            &ctx.input_path,
            &common::resource_id(video_config.id, "VP9 configuration")?,
        )
        .await?;
        let stream_id = common::resource_id(stream.id, "stream")?;

        let path = format!("video/vp9/{height}p");
        let muxing = ctx
            .client
            .create_webm_muxing(
                &encoding_id,
                &WebmMuxing {
                    id: None,
                    segment_length: SEGMENT_LENGTH,
                    outputs: vec![ctx.encoding_output(&path)],
                    streams: vec![MuxingStream::new(&stream_id)],
                },
            )
            .await?;
        outputs.video.push(MuxingRef {
            encoding_id: encoding_id.clone(),
            stream_id,
            muxing_id: common::resource_id(muxing.id, "WebM muxing")?,
            segment_path: path,
        });
    }

    let audio_config = ctx
        .client
        .create_vorbis_configuration(&VorbisAudioConfiguration {
            id: None,
            name: "Vorbis 128 kbit/s".to_string(),
            bitrate: 128_000,
        })
        .await?;
    let audio_stream = common::create_stream_from_input(
        &ctx.client,
        &encoding_id,
        &ctx.input_id,
        &ctx.input_path,
        &common::resource_id(audio_config.id, "Vorbis configuration")?,
    )
    .await?;
    let audio_stream_id = common::resource_id(audio_stream.id, "stream")?;
    let audio_path = "audio/vorbis".to_string();
    let audio_muxing = ctx
        .client
        .create_webm_muxing(
            &encoding_id,
            &WebmMuxing {
                id: None,
                segment_length: SEGMENT_LENGTH,
                outputs: vec![ctx.encoding_output(&audio_path)],
                streams: vec![MuxingStream::new(&audio_stream_id)],
            },
        )
        .await?;
    outputs.audio = Some(MuxingRef {
        encoding_id: encoding_id.clone(),
        stream_id: audio_stream_id,
        muxing_id: common::resource_id(audio_muxing.id, "WebM muxing")?,
        segment_path: audio_path,
    });

    poll::execute_encoding(&ctx.client, &encoding_id, None).await?;
    Ok(outputs)
}

async fn create_dash_manifest(
    ctx: &Ctx,
    h264: &H264Outputs,
    h265: &SegmentedOutputs,
    vp9: &SegmentedOutputs,
) -> Result<String> {
    let manifest = ctx
        .client
        .create_dash_manifest(&DashManifest {
            id: None,
            name: "Multi-codec DASH manifest".to_string(),
            manifest_name: "stream.mpd".to_string(),
            outputs: vec![ctx.encoding_output("")],
        })
        .await?;
    let manifest_id = common::resource_id(manifest.id, "DASH manifest")?;

    let period = ctx
        .client
        .create_dash_period(&manifest_id, &Period::default())
        .await?;
    let period_id = common::resource_id(period.id, "period")?;

    // One video adaptation set per codec family.
    for refs in [&h264.fmp4, &h265.video] {
        let set = ctx
            .client
            .create_dash_video_adaptation_set(
                &manifest_id,
                &period_id,
                &VideoAdaptationSet::default(),
            )
            .await?;
        let set_id = common::resource_id(set.id, "video adaptation set")?;
        for muxing in refs {
            ctx.client
                .create_dash_fmp4_representation(
                    &manifest_id,
                    &period_id,
                    &set_id,
                    &DashFmp4Representation::template(
                        &muxing.encoding_id,
                        &muxing.muxing_id,
                        &muxing.segment_path,
                    ),
                )
                .await?;
        }
    }

    let webm_set = ctx
        .client
        .create_dash_video_adaptation_set(&manifest_id, &period_id, &VideoAdaptationSet::default())
        .await?;
    let webm_set_id = common::resource_id(webm_set.id, "video adaptation set")?;
    for muxing in &vp9.video {
        ctx.client
            .create_dash_webm_representation(
                &manifest_id,
                &period_id,
                &webm_set_id,
                &DashWebmRepresentation::template(
                    &muxing.encoding_id,
                    &muxing.muxing_id,
                    &muxing.segment_path,
                ),
            )
            .await?;
    }

    if let Some(audio) = &h264.audio_fmp4 {
        let audio_set = ctx
            .client
            .create_dash_audio_adaptation_set(
                &manifest_id,
                &period_id,
                &AudioAdaptationSet {
                    id: None,
                    lang: Some("en".to_string()),
                },
            )
            .await?;
        ctx.client
            .create_dash_fmp4_representation(
                &manifest_id,
                &period_id,
                &common::resource_id(audio_set.id, "audio adaptation set")?,
                &DashFmp4Representation::template(
                    &audio.encoding_id,
                    &audio.muxing_id,
                    &audio.segment_path,
                ),
            )
            .await?;
    }

    if let Some(audio) = &vp9.audio {
        let vorbis_set = ctx
            .client
            .create_dash_audio_adaptation_set(
                &manifest_id,
                &period_id,
                &AudioAdaptationSet {
                    id: None,
                    lang: Some("en".to_string()),
                },
            )
            .await?;
        ctx.client
            .create_dash_webm_representation(
                &manifest_id,
                &period_id,
                &common::resource_id(vorbis_set.id, "audio adaptation set")?,
                &DashWebmRepresentation::template(
                    &audio.encoding_id,
                    &audio.muxing_id,
                    &audio.segment_path,
                ),
            )
            .await?;
    }

    Ok(manifest_id)
}

/// HLS carries the TS renditions of the H.264 encoding.
async fn create_hls_manifest(ctx: &Ctx, h264: &H264Outputs) -> Result<String> {
    let manifest = ctx
        .client
        .create_hls_manifest(&HlsManifest {
            id: None,
            name: "Multi-codec HLS manifest".to_string(),
            manifest_name: Some("master.m3u8".to_string()),
            outputs: vec![ctx.encoding_output("")],
        })
        .await?;
    let manifest_id = common::resource_id(manifest.id, "HLS manifest")?;

    for (index, muxing) in h264.ts.iter().enumerate() {
        ctx.client
            .create_hls_stream_info(
                &manifest_id,
                &StreamInfo {
                    id: None,
                    uri: format!("video_{index}.m3u8"),
                    encoding_id: muxing.encoding_id.clone(),
                    stream_id: muxing.stream_id.clone(),
                    muxing_id: muxing.muxing_id.clone(),
                    drm_id: None,
                    audio: Some("AUDIO".to_string()),
                    segment_path: muxing.segment_path.clone(),
                },
            )
            .await?;
    }

    if let Some(audio) = &h264.audio_ts {
        ctx.client
            .create_hls_audio_media_info(
                &manifest_id,
                &AudioMediaInfo {
                    id: None,
                    name: "HLS audio media".to_string(),
                    uri: "audio.m3u8".to_string(),
                    group_id: "AUDIO".to_string(),
                    encoding_id: audio.encoding_id.clone(),
                    stream_id: audio.stream_id.clone(),
                    muxing_id: audio.muxing_id.clone(),
                    drm_id: None,
                    language: "en".to_string(),
                    assoc_language: None,
                    autoselect: true,
                    is_default: true,
                    forced: false,
                    segment_path: audio.segment_path.clone(),
                },
            )
            .await?;
    }

    Ok(manifest_id)
}
