//! Filters workflow: watermark, text and deinterlace filters applied to the
//! video stream in a fixed order.

use cloudenc::models::{
    DeinterlaceFilter, Encoding, Mp4Muxing, MuxingStream, StreamFilter, TextFilter,
    WatermarkFilter,
};
use cloudenc::{CloudencClient, poll};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::Result;

const EXAMPLE_NAME: &str = "filters";

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let encoding = client
        .create_encoding(&Encoding::new(
            EXAMPLE_NAME,
            "Encoding with watermark, text and deinterlace filters",
        ))
        .await?;
    let encoding_id = common::resource_id(encoding.id, "encoding")?;

    let input = common::create_http_input(client, config).await?;
    let input_id = common::resource_id(input.id, "HTTP input")?;
    let output = common::create_s3_output(client, config).await?;
    let output_id = common::resource_id(output.id, "S3 output")?;
    let input_path = config.http_input_file_path()?;

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

    let watermark = client
        .create_watermark_filter(&WatermarkFilter {
            id: None,
            image: config.watermark_image_path()?,
            top: Some(10),
            left: None,
            bottom: None,
            right: Some(10),
        })
        .await?;
    let text = client
        .create_text_filter(&TextFilter {
            id: None,
            text: config.text_filter_text()?,
            x: "10".to_string(),
            y: "10".to_string(),
        })
        .await?;
    let deinterlace = client
        .create_deinterlace_filter(&DeinterlaceFilter { id: None })
        .await?;

    // Position defines the application order on the stream.
    let filters = [
        common::resource_id(deinterlace.id, "deinterlace filter")?,
        common::resource_id(watermark.id, "watermark filter")?,
        common::resource_id(text.id, "text filter")?,
    ]
    .into_iter()
    .enumerate()
    .map(|(position, id)| StreamFilter {
        id,
        position: position as u32,
    })
    .collect::<Vec<_>>();
    client
        .create_stream_filters(&encoding_id, &video_stream_id, &filters)
        .await?;

    client
        .create_mp4_muxing(
            &encoding_id,
            &Mp4Muxing {
                id: None,
                filename: "filtered.mp4".to_string(),
                outputs: vec![common::build_encoding_output(config, &output_id, EXAMPLE_NAME)?],
                streams: vec![
                    MuxingStream::new(&video_stream_id),
                    MuxingStream::new(common::resource_id(audio_stream.id, "stream")?),
                ],
            },
        )
        .await?;

    poll::execute_encoding(client, &encoding_id, None).await?;
    info!("filtered encoding finished");
    Ok(())
}
