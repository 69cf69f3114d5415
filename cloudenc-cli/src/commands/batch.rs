//! Batch workflow: run a fixed list of encodings while keeping the remote
//! queue at a bounded depth.

use async_trait::async_trait;
use cloudenc::models::{
    Encoding, EncodingListQueryParams, Fmp4Muxing, MuxingStream, TaskStatus,
};
use cloudenc::{ApiError, CloudencClient};
use cloudenc_batch::{
    BatchOptions, EncodingJob, InMemoryJobSource, JobDispatcher, JobPoll, JobRunner, QueueGauge,
    StartError,
};
use tracing::info;

use crate::commands::common;
use crate::config::ConfigProvider;
use crate::error::Result;

const EXAMPLE_NAME: &str = "batch";
const JOB_COUNT: usize = 6;

/// (height, bitrate) rendition ladder applied to every job.
const RENDITIONS: [(u32, u64); 3] = [(480, 800_000), (720, 1_200_000), (1080, 2_000_000)];

pub async fn run(client: &CloudencClient, config: &ConfigProvider) -> Result<()> {
    let input = common::create_http_input(client, config).await?;
    let output = common::create_s3_output(client, config).await?;
    let input_id = common::resource_id(input.id, "HTTP input")?;
    let output_id = common::resource_id(output.id, "S3 output")?;

    let mut video_config_ids = Vec::with_capacity(RENDITIONS.len());
    for (height, bitrate) in RENDITIONS {
        let created = client
            .create_h264_configuration(&common::h264_config(height, bitrate))
            .await?;
        video_config_ids.push((height, common::resource_id(created.id, "H264 configuration")?));
    }
    let audio = client
        .create_aac_configuration(&common::aac_config(128_000))
        .await?;
    let audio_config_id = common::resource_id(audio.id, "AAC configuration")?;

    let input_path = config.http_input_file_path()?;
    let jobs: Vec<EncodingJob> = (1..=JOB_COUNT)
        .map(|i| {
            EncodingJob::new(
                input_path.clone(),
                format!("{EXAMPLE_NAME}/encoding{i}"),
                format!("encoding{i}"),
            )
        })
        .collect();

    let runner = RemoteJobRunner {
        client: client.clone(),
        config: RunnerConfig {
            input_id,
            output_id,
            video_config_ids,
            audio_config_id,
            s3_base_path: config.s3_output_base_path()?,
        },
    };
    let gauge = RemoteQueueGauge {
        client: client.clone(),
    };

    let mut dispatcher = JobDispatcher::new(
        gauge,
        runner,
        InMemoryJobSource::new(jobs),
        BatchOptions::default(),
    );
    dispatcher.run().await?;

    let successful = dispatcher
        .jobs()
        .iter()
        .filter(|j| j.status == cloudenc_batch::JobStatus::Successful)
        .count();
    info!(successful, total = dispatcher.jobs().len(), "batch run complete");
    Ok(())
}

/// Queue depth read from the encoding list endpoint.
struct RemoteQueueGauge {
    client: CloudencClient,
}

#[async_trait]
impl QueueGauge for RemoteQueueGauge {
    async fn queued_count(&self) -> std::result::Result<usize, ApiError> {
        let page = self
            .client
            .list_encodings(&EncodingListQueryParams {
                status: Some(TaskStatus::Queued),
                limit: Some(100),
                offset: None,
            })
            .await?;
        Ok(page.total_count as usize)
    }
}

struct RunnerConfig {
    input_id: String,
    output_id: String,
    video_config_ids: Vec<(u32, String)>,
    audio_config_id: String,
    s3_base_path: String,
}

/// Creates the per-job remote resources and drives start/status calls.
struct RemoteJobRunner {
    client: CloudencClient,
    config: RunnerConfig,
}

impl RemoteJobRunner {
    async fn create_fmp4_muxing(
        &self,
        encoding_id: &str,
        stream_id: &str,
        output_path: &str,
    ) -> std::result::Result<(), ApiError> {
        self.client
            .create_fmp4_muxing(
                encoding_id,
                &Fmp4Muxing {
                    id: None,
                    segment_length: 4.0,
                    outputs: vec![cloudenc::models::EncodingOutput {
                        output_id: self.config.output_id.clone(),
                        output_path: output_path.to_string(),
                        acl: vec![cloudenc::models::AclEntry::public_read()],
                    }],
                    streams: vec![MuxingStream::new(stream_id)],
                },
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl JobRunner for RemoteJobRunner {
    async fn prepare(&self, job: &EncodingJob) -> std::result::Result<String, StartError> {
        let encoding = self
            .client
            .create_encoding(&Encoding::new(
                job.encoding_name.clone(),
                "Encoding submitted by the batch workflow",
            ))
            .await
            .map_err(StartError::from_api)?;
        let encoding_id = encoding
            .id
            .ok_or(StartError::Rejected("no encoding id assigned".to_string()))?;

        let base = format!(
            "{}{}",
            self.config.s3_base_path,
            job.output_path.trim_start_matches('/')
        );

        for (height, config_id) in &self.config.video_config_ids {
            let stream = common::create_stream_from_input(
                &self.client,
                &encoding_id,
                &self.config.input_id,
                &job.input_file_path,
                config_id,
            )
            .await
            .map_err(map_start)?;
            let stream_id = stream
                .id
                .ok_or(StartError::Rejected("no stream id assigned".to_string()))?;
            self.create_fmp4_muxing(&encoding_id, &stream_id, &format!("{base}/video/{height}"))
                .await
                .map_err(StartError::from_api)?;
        }

        let audio_stream = common::create_stream_from_input(
            &self.client,
            &encoding_id,
            &self.config.input_id,
            &job.input_file_path,
            &self.config.audio_config_id,
        )
        .await
        .map_err(map_start)?;
        let audio_stream_id = audio_stream
            .id
            .ok_or(StartError::Rejected("no stream id assigned".to_string()))?;
        self.create_fmp4_muxing(&encoding_id, &audio_stream_id, &format!("{base}/audio"))
            .await
            .map_err(StartError::from_api)?;

        Ok(encoding_id)
    }

    async fn start(&self, encoding_id: &str) -> std::result::Result<(), StartError> {
        self.client
            .start_encoding(encoding_id, None)
            .await
            .map_err(StartError::from_api)
    }

    async fn poll(&self, encoding_id: &str) -> std::result::Result<JobPoll, ApiError> {
        let task = self.client.encoding_status(encoding_id).await?;
        Ok(match task.status {
            TaskStatus::Finished => JobPoll::Finished,
            TaskStatus::Error => JobPoll::Errored {
                retryable: task.is_retryable_error(),
                messages: task.error_messages(),
            },
            TaskStatus::Canceled | TaskStatus::TransferError => JobPoll::Errored {
                retryable: false,
                messages: vec![format!("encoding ended in state {}", task.status)],
            },
            _ => JobPoll::InProgress,
        })
    }
}

fn map_start(err: crate::error::AppError) -> StartError {
    match err {
        crate::error::AppError::Api(api) => StartError::from_api(api),
        other => StartError::Rejected(other.to_string()),
    }
}
