//! Concatenation workflow: a bumper, two trimmed parts of the main feature
//! and a promo clip glued into one output.

use cloudenc::models::{
    ConcatenationInputConfiguration, ConcatenationInputStream, Encoding, Mp4Muxing, MuxingStream,
    TimeBasedTrimmingInputStream,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::Result;

const EXAMPLE_NAME: &str = "concatenation";

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            "Encoding with a concatenation of a bumper, the main part and a promo",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let input = common::create_http_input(client, config).await?;
    let input_id = common::resource_id(input.id, "HTTP input")?;
    let output = common::create_s3_output(client, config).await?;
    let output_id = common::resource_id(output.id, "S3 output")?;

    let main = common::create_ingest_input_stream(
        client,
        &encoding_id,
        &input_id,
        &config.http_input_file_path()?,
    )
    .await?;
    let main_id = common::resource_id(main.id, "ingest input stream")?;
    let bumper = common::create_ingest_input_stream(
        client,
        &encoding_id,
        &input_id,
        &config.http_input_bumper_file_path()?,
    )
    .await?;
    let promo = common::create_ingest_input_stream(
        client,
        &encoding_id,
        &input_id,
        &config.http_input_promo_file_path()?,
    )
    .await?;

    let part1 = client
        .create_trimming_input_stream(
            &encoding_id,
            &TimeBasedTrimmingInputStream {
                id: None,
                input_stream_id: main_id.clone(),
                offset: 10.0,
                duration: 90.0,
            },
        )
        .await?;
    let part2 = client
        .create_trimming_input_stream(
            &encoding_id,
            &TimeBasedTrimmingInputStream {
                id: None,
                input_stream_id: main_id,
                offset: 109.0,
                duration: 60.0,
            },
        )
        .await?;

    let concatenation = client
        .create_concatenation_input_stream(
            &encoding_id,
            &ConcatenationInputStream {
                id: None,
                concatenation: vec![
                    ConcatenationInputConfiguration {
                        input_stream_id: common::resource_id(bumper.id, "ingest input stream")?,
                        is_main: false,
                        position: 0,
                    },
                    ConcatenationInputConfiguration {
                        input_stream_id: common::resource_id(part1.id, "trimming input stream")?,
                        is_main: true,
                        position: 1,
                    },
                    ConcatenationInputConfiguration {
                        input_stream_id: common::resource_id(promo.id, "ingest input stream")?,
                        is_main: false,
                        position: 2,
                    },
                    ConcatenationInputConfiguration {
                        input_stream_id: common::resource_id(part2.id, "trimming input stream")?,
                        is_main: false,
                        position: 3,
                    },
                ],
            },
        )
        .await?;
    let concatenation_id = common::resource_id(concatenation.id, "concatenation input stream")?;

    let video_config = client
        .create_h264_configuration(&common::h264_config(1080, 4_000_000))
        .await?;
    let video_stream = common::create_stream_from_input_stream(
        client,
        &encoding_id,
        "Concatenated video",
        &concatenation_id,
        &common::resource_id(video_config.id, "H264 configuration")?,
    )
    .await?;
    let audio_config = client
        .create_aac_configuration(&common::aac_config(128_000))
        .await?;
    let audio_stream = common::create_stream_from_input_stream(
        client,
        &encoding_id,
        "Concatenated audio",
        &concatenation_id,
        &common::resource_id(audio_config.id, "AAC configuration")?,
    )
    .await?;

    client
        .create_mp4_muxing(
            &encoding_id,
            &Mp4Muxing {
                id: None,
                filename: "concatenated.mp4".to_string(),
                outputs: vec![common::build_encoding_output(config, &output_id, EXAMPLE_NAME)?],
                streams: vec![
                    MuxingStream::new(common::resource_id(video_stream.id, "stream")?),
                    MuxingStream::new(common::resource_id(audio_stream.id, "stream")?),
                ],
            },
        )
        .await?;

    poll::execute_encoding(client, &encoding_id, None).await?;
    info!("concatenated encoding finished");
    Ok(())
}
