//! Channel-mixing workflow: a 5.1 source downmixed to stereo with
//! per-channel gains before encoding.

use cloudenc::models::{
    AudioMixChannelLayout, AudioMixChannelType, AudioMixInputStream, AudioMixInputStreamChannel,
    AudioMixInputStreamSourceChannel, AudioMixSourceChannelType, Encoding, Mp4Muxing, MuxingStream,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::Result;

const EXAMPLE_NAME: &str = "channel_mixing";

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            "Encoding with a 5.1 to stereo downmix",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let input = common::create_http_input(client, config).await?;
    let input_id = common::resource_id(input.id, "HTTP input")?;
    let output = common::create_s3_output(client, config).await?;
    let output_id = common::resource_id(output.id, "S3 output")?;
    let input_path = config.http_input_file_path_with_surround_sound()?;

    let source = common::create_ingest_input_stream(client, &encoding_id, &input_id, &input_path)
        .await?;
    let source_id = common::resource_id(source.id, "ingest input stream")?;

    let downmix = client
        .create_audio_mix_input_stream(
            &encoding_id,
            &AudioMixInputStream {
                id: None,
                name: Some("Stereo downmix".to_string()),
                channel_layout: Some(AudioMixChannelLayout::Stereo),
                audio_mix_channels: vec![
                    downmix_channel(
                        &source_id,
                        AudioMixChannelType::FrontLeft,
                        AudioMixSourceChannelType::FrontLeft,
                        AudioMixSourceChannelType::BackLeft,
                    ),
                    downmix_channel(
                        &source_id,
                        AudioMixChannelType::FrontRight,
                        AudioMixSourceChannelType::FrontRight,
                        AudioMixSourceChannelType::BackRight,
                    ),
                ],
            },
        )
        .await?;
    let downmix_id = common::resource_id(downmix.id, "audio mix input stream")?;

    let video_config = client
        .create_h264_configuration(&common::h264_config(1080, 4_000_000))
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
    let audio_stream = common::create_stream_from_input_stream(
        client,
        &encoding_id,
        "Downmixed audio",
        &downmix_id,
        &common::resource_id(audio_config.id, "AAC configuration")?,
    )
    .await?;

    client
        .create_mp4_muxing(
            &encoding_id,
            &Mp4Muxing {
                id: None,
                filename: "stereo.mp4".to_string(),
                outputs: vec![common::build_encoding_output(config, &output_id, EXAMPLE_NAME)?],
                streams: vec![
                    MuxingStream::new(common::resource_id(video_stream.id, "stream")?),
                    MuxingStream::new(common::resource_id(audio_stream.id, "stream")?),
                ],
            },
        )
        .await?;

    poll::execute_encoding(client, &encoding_id, None).await?;
    info!("downmixed encoding finished");
    Ok(())
}

/// One output channel mixed from its front channel at full gain, the
/// matching back channel at 0.8 and the center channel at 0.5.
fn downmix_channel(
    source_id: &str,
    output: AudioMixChannelType,
    front: AudioMixSourceChannelType,
    back: AudioMixSourceChannelType,
) -> AudioMixInputStreamChannel {
    AudioMixInputStreamChannel {
        input_stream_id: source_id.to_string(),
        output_channel_type: output,
        source_channels: vec![
            AudioMixInputStreamSourceChannel {
                channel_type: front,
                gain: 1.0,
            },
            AudioMixInputStreamSourceChannel {
                channel_type: back,
                gain: 0.8,
            },
            AudioMixInputStreamSourceChannel {
                channel_type: AudioMixSourceChannelType::Center,
                gain: 0.5,
            },
        ],
    }
}
