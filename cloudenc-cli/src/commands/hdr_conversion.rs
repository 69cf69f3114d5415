//! HDR conversion workflow: re-encode between Dolby Vision, HDR10, HLG and
//! SDR. HDR outputs additionally get an SDR down-conversion ladder so every
//! player has something to play.

use std::str::FromStr;

use cloudenc::models::{
    AudioAdaptationSet, CodecConfigType, DashFmp4Representation, DashManifest,
    DolbyVisionInputStream, Encoding, Fmp4Muxing, H265DynamicRangeFormat, H265VideoConfiguration,
    HlsManifest, MuxingStream, Period, PresetConfiguration, ProfileH265, StreamInfo,
    VideoAdaptationSet,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::{AppError, Result};

const EXAMPLE_NAME: &str = "hdr_conversion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HdrFormat {
    DolbyVision,
    Hdr10,
    Hlg,
    Sdr,
}

impl FromStr for HdrFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "DolbyVision" => Ok(Self::DolbyVision),
            "HDR10" => Ok(Self::Hdr10),
            "HLG" => Ok(Self::Hlg),
            "SDR" => Ok(Self::Sdr),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rendition {
    height: u32,
    bitrate: u64,
    profile: ProfileH265,
    dynamic_range_format: H265DynamicRangeFormat,
}

/// Allowed conversions and the rendition ladder they produce. HDR targets
/// use MAIN10 and carry an extra SDR ladder; SDR-to-SDR stays MAIN only.
fn plan_renditions(input: HdrFormat, output: HdrFormat) -> Option<Vec<Rendition>> {
    use H265DynamicRangeFormat as Range;
    use HdrFormat::*;

    let (dynamic_range_format, needs_sdr_ladder) = match (input, output) {
        (DolbyVision, DolbyVision) => (Range::DolbyVision, true),
        (DolbyVision, Hdr10) => (Range::Hdr10, true),
        (Hdr10, Hdr10) => (Range::Hdr10, true),
        (Hdr10, Hlg) => (Range::Hlg, true),
        (Hlg, Hlg) => (Range::Hlg, true),
        (Hlg, Hdr10) => (Range::Hdr10, true),
        (Sdr, Hdr10) => (Range::Hdr10, true),
        (Sdr, Hlg) => (Range::Hlg, true),
        (Sdr, Sdr) => (Range::Sdr, false),
        _ => return None,
    };
    let profile = if dynamic_range_format == Range::Sdr {
        ProfileH265::Main
    } else {
        ProfileH265::Main10
    };

    let mut renditions: Vec<Rendition> = [
        (360, 160_000),
        (540, 730_000),
        (720, 2_900_000),
        (1080, 5_400_000),
        (1440, 9_700_000),
        (2160, 13_900_000),
    ]
    .into_iter()
    .map(|(height, bitrate)| Rendition {
        height,
        bitrate,
        profile,
        dynamic_range_format,
    })
    .collect();

    if needs_sdr_ladder {
        renditions.extend(
            [
                (360, 145_000),
                (540, 600_000),
                (720, 2_400_000),
                (1080, 4_500_000),
            ]
            .into_iter()
            .map(|(height, bitrate)| Rendition {
                height,
                bitrate,
                profile: ProfileH265::Main,
                dynamic_range_format: H265DynamicRangeFormat::Sdr,
            }),
        );
    }

    Some(renditions)
}

fn is_hdr(format: H265DynamicRangeFormat) -> bool {
    !matches!(format, H265DynamicRangeFormat::Sdr)
}

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let input_format_raw = config.hdr_conversion_input_format()?;
    let output_format_raw = config.hdr_conversion_output_format()?;
    let unsupported = || AppError::UnsupportedHdrConversion {
        input: input_format_raw.clone(),
        output: output_format_raw.clone(),
    };
    let input_format = HdrFormat::from_str(&input_format_raw).map_err(|_| unsupported())?;
    let output_format = HdrFormat::from_str(&output_format_raw).map_err(|_| unsupported())?;
    let renditions = plan_renditions(input_format, output_format).ok_or_else(unsupported)?;

    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            format!("HDR conversion from {input_format_raw} to {output_format_raw}"),
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let input = common::create_http_input(client, config).await?;
    let input_id = common::resource_id(input.id, "HTTP input")?;
    let output = common::create_s3_output(client, config).await?;
    let output_id = common::resource_id(output.id, "S3 output")?;

    let video_input_path = config.http_input_file_path()?;
    let video_input_stream_id = if input_format == HdrFormat::DolbyVision {
        // A missing sidecar path means the metadata is embedded in the video.
        let metadata_path = config.http_dolby_vision_metadata_file_path().ok();
        let input_stream = client
            .create_dolby_vision_input_stream(
                &encoding_id,
                &DolbyVisionInputStream {
                    id: None,
                    input_id: input_id.clone(),
                    video_input_path,
                    metadata_input_path: metadata_path,
                },
            )
            .await?;
        common::resource_id(input_stream.id, "Dolby Vision input stream")?
    } else {
        let input_stream =
            common::create_ingest_input_stream(client, &encoding_id, &input_id, &video_input_path)
                .await?;
        common::resource_id(input_stream.id, "ingest input stream")?
    };

    let audio_input_stream = common::create_ingest_input_stream(
        client,
        &encoding_id,
        &input_id,
        &config.http_audio_file_path()?,
    )
    .await?;
    let audio_input_stream_id = common::resource_id(audio_input_stream.id, "ingest input stream")?;

    for rendition in &renditions {
        let video_config = client
            .create_h265_configuration(&H265VideoConfiguration {
                id: None,
                name: format!("H.265 {}p", rendition.height),
                preset_configuration: Some(PresetConfiguration::VodStandard),
                height: Some(rendition.height),
                bitrate: Some(rendition.bitrate),
                profile: Some(rendition.profile),
                dynamic_range_format: Some(rendition.dynamic_range_format),
            })
            .await?;

        let range = if is_hdr(rendition.dynamic_range_format) {
            "hdr"
        } else {
            "sdr"
        };
        let stream = common::create_stream_from_input_stream(
            client,
            &encoding_id,
            &format!("H265 {} stream {}p", range.to_uppercase(), rendition.height),
            &video_input_stream_id,
            &common::resource_id(video_config.id, "H265 configuration")?,
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
                        &format!(
                            "{EXAMPLE_NAME}/video/{range}/{}p_{}kbps",
                            rendition.height,
                            rendition.bitrate / 1000
                        ),
                    )?],
                    streams: vec![MuxingStream::new(common::resource_id(
                        stream.id, "stream",
                    )?)],
                },
            )
            .await?;
    }

    let aac_config = client
        .create_aac_configuration(&common::aac_config(128_000))
        .await?;
    let aac_stream = common::create_stream_from_input_stream(
        client,
        &encoding_id,
        "AAC stream 128kbps",
        &audio_input_stream_id,
        &common::resource_id(aac_config.id, "AAC configuration")?,
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
                    &format!("{EXAMPLE_NAME}/audio/128kbps"),
                )?],
                streams: vec![MuxingStream::new(common::resource_id(
                    aac_stream.id,
                    "stream",
                )?)],
            },
        )
        .await?;

    poll::execute_encoding(client, &encoding_id, None).await?;

    let dash_id = create_dash_manifest(client, config, &encoding_id, &output_id).await?;
    let hls_id = create_hls_manifest(client, config, &encoding_id, &output_id).await?;
    poll::execute_dash_manifest(client, &dash_id).await?;
    poll::execute_hls_manifest(client, &hls_id).await?;

    info!("HDR conversion encoding finished");
    Ok(())
}

/// HDR and SDR renditions go into separate adaptation sets so players can
/// pick a consistent dynamic range.
async fn create_dash_manifest(
    client: &CloudencClient,
    config: &ConfigProvider,
    encoding_id: &str,
    output_id: &str,
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
    let hdr_set = client
        .create_dash_video_adaptation_set(&manifest_id, &period_id, &VideoAdaptationSet::default())
        .await?;
    let hdr_set_id = common::resource_id(hdr_set.id, "video adaptation set")?;
    let sdr_set = client
        .create_dash_video_adaptation_set(&manifest_id, &period_id, &VideoAdaptationSet::default())
        .await?;
    let sdr_set_id = common::resource_id(sdr_set.id, "video adaptation set")?;
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

    let muxings = client.list_fmp4_muxings(encoding_id).await?;
    for muxing in muxings.items {
        let muxing_id = common::resource_id(muxing.id, "fMP4 muxing")?;
        let Some(muxing_stream) = muxing.streams.first() else {
            continue;
        };
        let stream = client.get_stream(encoding_id, &muxing_stream.stream_id).await?;
        let segment_path = segment_path_of(&muxing.outputs);
        let codec = client.get_configuration_type(&stream.codec_config_id).await?;

        let adaptation_set_id = match codec.config_type {
            CodecConfigType::H265 => {
                let h265 = client.get_h265_configuration(&stream.codec_config_id).await?;
                if h265.dynamic_range_format.is_some_and(is_hdr) {
                    &hdr_set_id
                } else {
                    &sdr_set_id
                }
            }
            CodecConfigType::Aac => &audio_set_id,
            _ => continue,
        };

        client
            .create_dash_fmp4_representation(
                &manifest_id,
                &period_id,
                adaptation_set_id,
                &DashFmp4Representation::template(encoding_id, &muxing_id, segment_path),
            )
            .await?;
    }

    Ok(manifest_id)
}

async fn create_hls_manifest(
    client: &CloudencClient,
    config: &ConfigProvider,
    encoding_id: &str,
    output_id: &str,
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

    let muxings = client.list_fmp4_muxings(encoding_id).await?;
    for muxing in muxings.items {
        let muxing_id = common::resource_id(muxing.id, "fMP4 muxing")?;
        let Some(muxing_stream) = muxing.streams.first() else {
            continue;
        };
        let stream = client.get_stream(encoding_id, &muxing_stream.stream_id).await?;
        let stream_id = common::resource_id(stream.id, "stream")?;
        let segment_path = segment_path_of(&muxing.outputs);
        let codec = client.get_configuration_type(&stream.codec_config_id).await?;

        match codec.config_type {
            CodecConfigType::H265 => {
                let h265 = client.get_h265_configuration(&stream.codec_config_id).await?;
                let range = if h265.dynamic_range_format.is_some_and(is_hdr) {
                    "hdr"
                } else {
                    "sdr"
                };
                let bitrate = h265.bitrate.unwrap_or_default();
                client
                    .create_hls_stream_info(
                        &manifest_id,
                        &StreamInfo {
                            id: None,
                            uri: format!("stream_{range}_{bitrate}.m3u8"),
                            encoding_id: encoding_id.to_string(),
                            stream_id,
                            muxing_id,
                            drm_id: None,
                            audio: Some("AUDIO".to_string()),
                            segment_path,
                        },
                    )
                    .await?;
            }
            CodecConfigType::Aac => {
                let aac = client.get_aac_configuration(&stream.codec_config_id).await?;
                client
                    .create_hls_audio_media_info(
                        &manifest_id,
                        &cloudenc::models::AudioMediaInfo {
                            id: None,
                            name: "HLS audio media".to_string(),
                            uri: format!("aac_{}.m3u8", aac.bitrate),
                            group_id: "AUDIO".to_string(),
                            encoding_id: encoding_id.to_string(),
                            stream_id,
                            muxing_id,
                            drm_id: None,
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
            _ => {}
        }
    }

    Ok(manifest_id)
}

/// Muxing output path relative to the manifest location.
fn segment_path_of(outputs: &[cloudenc::models::EncodingOutput]) -> String {
    outputs
        .first()
        .map(|o| {
            o.output_path
                .rsplit(&format!("{EXAMPLE_NAME}/"))
                .next()
                .unwrap_or(&o.output_path)
                .to_string()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(HdrFormat::DolbyVision, HdrFormat::DolbyVision, H265DynamicRangeFormat::DolbyVision)]
    #[case(HdrFormat::DolbyVision, HdrFormat::Hdr10, H265DynamicRangeFormat::Hdr10)]
    #[case(HdrFormat::Hdr10, HdrFormat::Hlg, H265DynamicRangeFormat::Hlg)]
    #[case(HdrFormat::Hlg, HdrFormat::Hdr10, H265DynamicRangeFormat::Hdr10)]
    #[case(HdrFormat::Sdr, HdrFormat::Hlg, H265DynamicRangeFormat::Hlg)]
    fn hdr_targets_use_main10_and_get_an_sdr_ladder(
        #[case] input: HdrFormat,
        #[case] output: HdrFormat,
        #[case] expected: H265DynamicRangeFormat,
    ) {
        let renditions = plan_renditions(input, output).unwrap();
        assert_eq!(renditions.len(), 10);
        assert!(
            renditions[..6]
                .iter()
                .all(|r| r.profile == ProfileH265::Main10 && r.dynamic_range_format == expected)
        );
        assert!(renditions[6..].iter().all(|r| {
            r.profile == ProfileH265::Main && r.dynamic_range_format == H265DynamicRangeFormat::Sdr
        }));
    }

    #[test]
    fn sdr_to_sdr_keeps_main_profile_and_no_extra_ladder() {
        let renditions = plan_renditions(HdrFormat::Sdr, HdrFormat::Sdr).unwrap();
        assert_eq!(renditions.len(), 6);
        assert!(renditions.iter().all(|r| {
            r.profile == ProfileH265::Main && r.dynamic_range_format == H265DynamicRangeFormat::Sdr
        }));
    }

    #[rstest]
    #[case(HdrFormat::DolbyVision, HdrFormat::Hlg)]
    #[case(HdrFormat::DolbyVision, HdrFormat::Sdr)]
    #[case(HdrFormat::Hdr10, HdrFormat::DolbyVision)]
    #[case(HdrFormat::Hlg, HdrFormat::Sdr)]
    #[case(HdrFormat::Sdr, HdrFormat::DolbyVision)]
    fn unsupported_conversions_are_rejected(#[case] input: HdrFormat, #[case] output: HdrFormat) {
        assert!(plan_renditions(input, output).is_none());
    }

    #[test]
    fn format_names_parse_like_the_config_values() {
        assert_eq!(HdrFormat::from_str("DolbyVision"), Ok(HdrFormat::DolbyVision));
        assert_eq!(HdrFormat::from_str("HDR10"), Ok(HdrFormat::Hdr10));
        assert!(HdrFormat::from_str("hdr10").is_err());
    }
}
