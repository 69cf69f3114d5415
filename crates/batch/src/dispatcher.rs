//! The dispatch loop: keeps a bounded number of encodings queued remotely,
//! retries transient failures, and reports what could not be finished.

use std::time::Duration;

use cloudenc::ApiError;
use tracing::{debug, error, info, warn};

use crate::job::{EncodingJob, JobStatus};
use crate::runner::{JobPoll, JobRunner, QueueGauge, StartError};
use crate::source::JobSource;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// How many encodings may sit in the remote queue at once.
    pub target_queue_size: usize,
    /// Retry budget per job. A job failing `max_retries + 1` times is given up.
    pub max_retries: u32,
    /// Sleep between dispatch cycles.
    pub poll_interval: Duration,
    /// Pause between consecutive start calls within one cycle.
    pub start_pacing: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            target_queue_size: 3,
            max_retries: 2,
            poll_interval: Duration::from_secs(10),
            start_pacing: Duration::from_millis(300),
        }
    }
}

/// Works through a job list against the remote service.
///
/// Single cooperative loop; the job list is only ever touched between awaits,
/// so no synchronization is needed.
pub struct JobDispatcher<G, R> {
    gauge: G,
    runner: R,
    jobs: Vec<EncodingJob>,
    options: BatchOptions,
}

impl<G: QueueGauge, R: JobRunner> JobDispatcher<G, R> {
    pub fn new(gauge: G, runner: R, source: impl JobSource, options: BatchOptions) -> Self {
        Self {
            gauge,
            runner,
            jobs: source.jobs(),
            options,
        }
    }

    /// Run the batch to completion. Returns an error only on transport-level
    /// failures; per-job failures are recorded on the jobs themselves.
    pub async fn run(&mut self) -> Result<(), ApiError> {
        info!(total = self.jobs.len(), "starting batch run");

        while !self.all_jobs_finished() {
            self.start_waiting_jobs().await?;
            tokio::time::sleep(self.options.poll_interval).await;
            self.poll_started_jobs().await?;
        }

        self.log_failed_jobs();
        Ok(())
    }

    /// Jobs currently waiting, in original list order, capped at `limit`.
    pub fn get_jobs_to_start(&self, limit: usize) -> Vec<&EncodingJob> {
        self.jobs
            .iter()
            .filter(|j| j.status == JobStatus::Waiting)
            .take(limit)
            .collect()
    }

    pub fn get_started_jobs(&self) -> Vec<&EncodingJob> {
        self.jobs
            .iter()
            .filter(|j| j.status == JobStatus::Started)
            .collect()
    }

    /// True iff no job remains waiting or started.
    pub fn all_jobs_finished(&self) -> bool {
        self.jobs.iter().all(|j| j.status.is_terminal())
    }

    pub fn jobs(&self) -> &[EncodingJob] {
        &self.jobs
    }

    /// Fill the free remote queue slots with waiting jobs.
    async fn start_waiting_jobs(&mut self) -> Result<(), ApiError> {
        let queued = self.gauge.queued_count().await?;
        let free_slots = self.options.target_queue_size.saturating_sub(queued);
        if free_slots == 0 {
            debug!(queued, "remote queue full, not starting anything");
            return Ok(());
        }

        let to_start: Vec<usize> = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| j.status == JobStatus::Waiting)
            .map(|(i, _)| i)
            .take(free_slots)
            .collect();

        for idx in to_start {
            match self.start_job(idx).await {
                Ok(()) => {
                    self.jobs[idx].status = JobStatus::Started;
                    info!(encoding = %self.jobs[idx].encoding_name, "encoding started");
                }
                Err(StartError::QueueLimitExceeded) => {
                    // Never counted against the retry budget; the remaining
                    // slots are attempted again next cycle.
                    info!("platform queue limit reached, deferring remaining starts");
                    break;
                }
                Err(StartError::Rejected(message)) => {
                    let job = &mut self.jobs[idx];
                    job.retry_count += 1;
                    if job.retry_count > self.options.max_retries {
                        job.status = JobStatus::GivenUp;
                        job.error_messages.push(message.clone());
                        error!(
                            encoding = %job.encoding_name,
                            "giving up after {} failed attempts: {message}",
                            job.retry_count
                        );
                    } else {
                        warn!(
                            encoding = %job.encoding_name,
                            retry = job.retry_count,
                            "start rejected, will retry: {message}"
                        );
                    }
                }
                Err(StartError::Fatal(err)) => return Err(err),
            }
            tokio::time::sleep(self.options.start_pacing).await;
        }

        Ok(())
    }

    async fn start_job(&mut self, idx: usize) -> Result<(), StartError> {
        let encoding_id = match self.jobs[idx].encoding_id.clone() {
            Some(id) => id,
            None => {
                let id = self.runner.prepare(&self.jobs[idx]).await?;
                self.jobs[idx].encoding_id = Some(id.clone());
                id
            }
        };
        self.runner.start(&encoding_id).await
    }

    /// Check the remote status of every started job.
    async fn poll_started_jobs(&mut self) -> Result<(), ApiError> {
        let started: Vec<usize> = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| j.status == JobStatus::Started)
            .map(|(i, _)| i)
            .collect();

        for idx in started {
            // Started implies a remote id was assigned.
            let Some(encoding_id) = self.jobs[idx].encoding_id.clone() else {
                continue;
            };

            match self.runner.poll(&encoding_id).await? {
                JobPoll::InProgress => {}
                JobPoll::Finished => {
                    self.jobs[idx].status = JobStatus::Successful;
                    info!(encoding = %self.jobs[idx].encoding_name, "encoding finished");
                }
                JobPoll::Errored {
                    retryable,
                    messages,
                } => {
                    let max_retries = self.options.max_retries;
                    let job = &mut self.jobs[idx];
                    if retryable && job.retry_count < max_retries {
                        job.retry_count += 1;
                        job.status = JobStatus::Waiting;
                        warn!(
                            encoding = %job.encoding_name,
                            retry = job.retry_count,
                            "encoding failed, re-queueing"
                        );
                    } else {
                        job.status = JobStatus::GivenUp;
                        job.error_messages.extend(messages);
                        error!(encoding = %job.encoding_name, "encoding failed permanently");
                    }
                }
            }
        }

        Ok(())
    }

    fn log_failed_jobs(&self) {
        let failed: Vec<&EncodingJob> = self
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::GivenUp)
            .collect();

        if failed.is_empty() {
            info!("all encodings finished successfully");
            return;
        }

        for job in failed {
            error!(
                "encoding '{}' failed: {}",
                job.encoding_name,
                job.error_messages.join("; ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::*;
    use crate::runner::{MockJobRunner, MockQueueGauge};

    fn job(name: &str) -> EncodingJob {
        EncodingJob::new(
            format!("videos/{name}.mp4"),
            format!("out/{name}"),
            name.to_string(),
        )
    }

    fn jobs(count: usize) -> Vec<EncodingJob> {
        (1..=count).map(|i| job(&format!("encoding{i}"))).collect()
    }

    fn dispatcher(
        gauge: MockQueueGauge,
        runner: MockJobRunner,
        jobs: Vec<EncodingJob>,
        options: BatchOptions,
    ) -> JobDispatcher<MockQueueGauge, MockJobRunner> {
        JobDispatcher::new(gauge, runner, jobs, options)
    }

    fn fast_options() -> BatchOptions {
        BatchOptions {
            poll_interval: Duration::from_millis(1),
            start_pacing: Duration::ZERO,
            ..BatchOptions::default()
        }
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(10)]
    fn jobs_to_start_respects_limit_and_order(#[case] limit: usize) {
        let d = dispatcher(
            MockQueueGauge::new(),
            MockJobRunner::new(),
            jobs(5),
            BatchOptions::default(),
        );

        let picked = d.get_jobs_to_start(limit);
        assert_eq!(picked.len(), limit.min(5));
        let names: Vec<&str> = picked.iter().map(|j| j.encoding_name.as_str()).collect();
        let expected: Vec<String> = (1..=limit.min(5)).map(|i| format!("encoding{i}")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn jobs_to_start_skips_non_waiting_jobs() {
        let mut list = jobs(4);
        list[0].status = JobStatus::Started;
        list[2].status = JobStatus::Successful;
        let d = dispatcher(
            MockQueueGauge::new(),
            MockJobRunner::new(),
            list,
            BatchOptions::default(),
        );

        let names: Vec<&str> = d
            .get_jobs_to_start(10)
            .iter()
            .map(|j| j.encoding_name.as_str())
            .collect();
        assert_eq!(names, vec!["encoding2", "encoding4"]);
    }

    #[test]
    fn all_jobs_finished_iff_all_terminal() {
        let mut list = jobs(3);
        list[0].status = JobStatus::Successful;
        list[1].status = JobStatus::GivenUp;
        list[2].status = JobStatus::Started;
        let mut d = dispatcher(
            MockQueueGauge::new(),
            MockJobRunner::new(),
            list,
            BatchOptions::default(),
        );
        assert!(!d.all_jobs_finished());

        d.jobs[2].status = JobStatus::Successful;
        assert!(d.all_jobs_finished());
    }

    #[tokio::test]
    async fn start_batch_fills_free_slots_only() {
        let mut gauge = MockQueueGauge::new();
        gauge.expect_queued_count().times(1).returning(|| Ok(0));

        let mut runner = MockJobRunner::new();
        runner
            .expect_prepare()
            .times(3)
            .returning(|job| Ok(format!("id-{}", job.encoding_name)));
        runner.expect_start().times(3).returning(|_| Ok(()));

        let mut d = dispatcher(gauge, runner, jobs(7), fast_options());
        d.start_waiting_jobs().await.unwrap();

        assert_eq!(d.get_started_jobs().len(), 3);
        assert_eq!(d.get_jobs_to_start(10).len(), 4);
    }

    #[tokio::test]
    async fn no_starts_issued_when_remote_queue_is_full() {
        let mut gauge = MockQueueGauge::new();
        gauge.expect_queued_count().times(1).returning(|| Ok(3));

        // No prepare/start expectations: any call would fail the test.
        let runner = MockJobRunner::new();

        let mut d = dispatcher(gauge, runner, jobs(7), fast_options());
        d.start_waiting_jobs().await.unwrap();
        assert!(d.get_started_jobs().is_empty());
    }

    #[tokio::test]
    async fn queue_limit_aborts_batch_without_consuming_budget() {
        let mut gauge = MockQueueGauge::new();
        gauge.expect_queued_count().times(1).returning(|| Ok(0));

        let mut seq = Sequence::new();
        let mut runner = MockJobRunner::new();
        runner
            .expect_prepare()
            .times(2)
            .returning(|job| Ok(format!("id-{}", job.encoding_name)));
        runner
            .expect_start()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        runner
            .expect_start()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StartError::QueueLimitExceeded));

        let mut d = dispatcher(gauge, runner, jobs(3), fast_options());
        d.start_waiting_jobs().await.unwrap();

        assert_eq!(d.jobs[0].status, JobStatus::Started);
        // Rejected by the queue limit: untouched budget, still waiting.
        assert_eq!(d.jobs[1].status, JobStatus::Waiting);
        assert_eq!(d.jobs[1].retry_count, 0);
        // The third job was never attempted this cycle.
        assert_eq!(d.jobs[2].status, JobStatus::Waiting);
        assert!(d.jobs[2].encoding_id.is_none());
    }

    #[tokio::test]
    async fn rejected_starts_consume_budget_and_eventually_give_up() {
        let mut gauge = MockQueueGauge::new();
        gauge.expect_queued_count().times(3).returning(|| Ok(0));

        let mut runner = MockJobRunner::new();
        runner
            .expect_prepare()
            .times(1)
            .returning(|_| Ok("id-1".to_string()));
        runner
            .expect_start()
            .with(eq("id-1"))
            .times(3)
            .returning(|_| Err(StartError::Rejected("invalid input".to_string())));

        let mut d = dispatcher(gauge, runner, jobs(1), fast_options());

        d.start_waiting_jobs().await.unwrap();
        assert_eq!(d.jobs[0].status, JobStatus::Waiting);
        assert_eq!(d.jobs[0].retry_count, 1);

        d.start_waiting_jobs().await.unwrap();
        assert_eq!(d.jobs[0].status, JobStatus::Waiting);
        assert_eq!(d.jobs[0].retry_count, 2);

        d.start_waiting_jobs().await.unwrap();
        assert_eq!(d.jobs[0].status, JobStatus::GivenUp);
        assert_eq!(d.jobs[0].error_messages, vec!["invalid input".to_string()]);
        assert!(d.all_jobs_finished());
    }

    #[tokio::test]
    async fn retryable_poll_error_requeues_until_budget_is_spent() {
        let mut runner = MockJobRunner::new();
        runner.expect_poll().with(eq("id-1")).returning(|_| {
            Ok(JobPoll::Errored {
                retryable: true,
                messages: vec!["transient".to_string()],
            })
        });

        let mut list = jobs(1);
        list[0].status = JobStatus::Started;
        list[0].encoding_id = Some("id-1".to_string());

        let mut d = dispatcher(MockQueueGauge::new(), runner, list, fast_options());

        d.poll_started_jobs().await.unwrap();
        assert_eq!(d.jobs[0].status, JobStatus::Waiting);
        assert_eq!(d.jobs[0].retry_count, 1);

        d.jobs[0].status = JobStatus::Started;
        d.poll_started_jobs().await.unwrap();
        assert_eq!(d.jobs[0].status, JobStatus::Waiting);
        assert_eq!(d.jobs[0].retry_count, 2);

        // Third failure exceeds max_retries=2.
        d.jobs[0].status = JobStatus::Started;
        d.poll_started_jobs().await.unwrap();
        assert_eq!(d.jobs[0].status, JobStatus::GivenUp);
        assert_eq!(d.jobs[0].error_messages, vec!["transient".to_string()]);
    }

    #[tokio::test]
    async fn non_retryable_poll_error_gives_up_immediately() {
        let mut runner = MockJobRunner::new();
        runner.expect_poll().times(1).returning(|_| {
            Ok(JobPoll::Errored {
                retryable: false,
                messages: vec!["no video track".to_string()],
            })
        });

        let mut list = jobs(1);
        list[0].status = JobStatus::Started;
        list[0].encoding_id = Some("id-1".to_string());

        let mut d = dispatcher(MockQueueGauge::new(), runner, list, fast_options());
        d.poll_started_jobs().await.unwrap();

        assert_eq!(d.jobs[0].status, JobStatus::GivenUp);
        assert_eq!(d.jobs[0].retry_count, 0);
        assert_eq!(
            d.jobs[0].error_messages,
            vec!["no video track".to_string()]
        );
    }

    #[tokio::test]
    async fn poll_give_up_appends_to_previously_recorded_messages() {
        let mut runner = MockJobRunner::new();
        runner.expect_poll().times(1).returning(|_| {
            Ok(JobPoll::Errored {
                retryable: false,
                messages: vec!["no video track".to_string()],
            })
        });

        let mut list = jobs(1);
        list[0].status = JobStatus::Started;
        list[0].encoding_id = Some("id-1".to_string());
        list[0]
            .error_messages
            .push("start rejected once".to_string());

        let mut d = dispatcher(MockQueueGauge::new(), runner, list, fast_options());
        d.poll_started_jobs().await.unwrap();

        assert_eq!(d.jobs[0].status, JobStatus::GivenUp);
        assert_eq!(
            d.jobs[0].error_messages,
            vec![
                "start rejected once".to_string(),
                "no video track".to_string()
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_drives_all_jobs_to_success() {
        let mut gauge = MockQueueGauge::new();
        gauge.expect_queued_count().returning(|| Ok(0));

        let mut runner = MockJobRunner::new();
        runner
            .expect_prepare()
            .times(2)
            .returning(|job| Ok(format!("id-{}", job.encoding_name)));
        runner.expect_start().times(2).returning(|_| Ok(()));
        runner.expect_poll().returning(|_| Ok(JobPoll::Finished));

        let mut d = dispatcher(gauge, runner, jobs(2), BatchOptions::default());
        d.run().await.unwrap();

        assert!(d.all_jobs_finished());
        assert!(
            d.jobs()
                .iter()
                .all(|j| j.status == JobStatus::Successful)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_reports_given_up_jobs_and_still_terminates() {
        let mut gauge = MockQueueGauge::new();
        gauge.expect_queued_count().returning(|| Ok(0));

        let mut runner = MockJobRunner::new();
        runner
            .expect_prepare()
            .returning(|job| Ok(format!("id-{}", job.encoding_name)));
        runner.expect_start().returning(|_| Ok(()));
        runner
            .expect_poll()
            .with(eq("id-encoding1"))
            .returning(|_| Ok(JobPoll::Finished));
        runner.expect_poll().with(eq("id-encoding2")).returning(|_| {
            Ok(JobPoll::Errored {
                retryable: false,
                messages: vec!["broken".to_string()],
            })
        });

        let mut d = dispatcher(gauge, runner, jobs(2), BatchOptions::default());
        d.run().await.unwrap();

        assert_eq!(d.jobs()[0].status, JobStatus::Successful);
        assert_eq!(d.jobs()[1].status, JobStatus::GivenUp);
        assert_eq!(d.jobs()[1].error_messages, vec!["broken".to_string()]);
    }
}
