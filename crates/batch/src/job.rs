//! Batch job bookkeeping.

/// Lifecycle of one batch job.
///
/// `Waiting → Started → {Successful | GivenUp}`, with `Started → Waiting`
/// when a retryable failure sends the job back for re-submission. The two
/// terminal states never revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Waiting,
    Started,
    Successful,
    GivenUp,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Successful | Self::GivenUp)
    }
}

/// One encoding to be run by the dispatcher.
#[derive(Debug, Clone)]
pub struct EncodingJob {
    pub input_file_path: String,
    pub output_path: String,
    pub encoding_name: String,
    pub status: JobStatus,
    /// Remote resource id, assigned on the first start attempt and reused by
    /// every retry so the remote configuration is created only once.
    pub encoding_id: Option<String>,
    pub retry_count: u32,
    pub error_messages: Vec<String>,
}

impl EncodingJob {
    pub fn new(
        input_file_path: impl Into<String>,
        output_path: impl Into<String>,
        encoding_name: impl Into<String>,
    ) -> Self {
        Self {
            input_file_path: input_file_path.into(),
            output_path: output_path.into(),
            encoding_name: encoding_name.into(),
            status: JobStatus::Waiting,
            encoding_id: None,
            retry_count: 0,
            error_messages: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_successful_and_given_up_are_terminal() {
        assert!(!JobStatus::Waiting.is_terminal());
        assert!(!JobStatus::Started.is_terminal());
        assert!(JobStatus::Successful.is_terminal());
        assert!(JobStatus::GivenUp.is_terminal());
    }

    #[test]
    fn new_job_starts_waiting_with_empty_budget() {
        let job = EncodingJob::new("in.mp4", "out/1", "encoding1");
        assert_eq!(job.status, JobStatus::Waiting);
        assert_eq!(job.retry_count, 0);
        assert!(job.encoding_id.is_none());
        assert!(job.error_messages.is_empty());
    }
}
