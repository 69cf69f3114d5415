//! Seams between the dispatcher and the remote service.
//!
//! The dispatcher itself never talks HTTP; it drives these two traits. The
//! production implementations wrap a `CloudencClient`, tests mock them.

use async_trait::async_trait;
use cloudenc::ApiError;
use thiserror::Error;

use crate::job::EncodingJob;

/// Remote queue depth, used to compute how many jobs may be submitted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueGauge: Send + Sync {
    /// Number of encodings currently queued on the platform.
    async fn queued_count(&self) -> Result<usize, ApiError>;
}

/// Outcome of one status poll of a started job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPoll {
    Finished,
    InProgress,
    Errored {
        /// False when the platform flagged the failure as NO_RETRY.
        retryable: bool,
        messages: Vec<String>,
    },
}

/// Why a start attempt did not result in a running encoding.
#[derive(Debug, Error)]
pub enum StartError {
    /// The platform's queue is full. Never counted against the retry budget;
    /// the dispatcher backs off and tries again next cycle.
    #[error("platform queue limit exceeded")]
    QueueLimitExceeded,

    /// The platform rejected this job. Counts against its retry budget.
    #[error("start rejected: {0}")]
    Rejected(String),

    /// Transport-level failure; aborts the whole batch run.
    #[error(transparent)]
    Fatal(#[from] ApiError),
}

impl StartError {
    /// Classify an API error from a start call.
    pub fn from_api(err: ApiError) -> Self {
        if err.is_queue_limit_exceeded() {
            Self::QueueLimitExceeded
        } else if matches!(err, ApiError::Api { .. }) {
            Self::Rejected(err.to_string())
        } else {
            Self::Fatal(err)
        }
    }
}

/// Creates and starts remote encodings for jobs, and polls their status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Create the remote resources for a job (input, streams, muxings) and
    /// return the encoding id. Called once per job; retries reuse the id.
    async fn prepare(&self, job: &EncodingJob) -> Result<String, StartError>;

    /// Submit the start call for a prepared encoding.
    async fn start(&self, encoding_id: &str) -> Result<(), StartError>;

    /// Fetch the remote status of a started encoding.
    async fn poll(&self, encoding_id: &str) -> Result<JobPoll, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_limit_code_maps_to_queue_limit_exceeded() {
        let err = ApiError::api(cloudenc::QUEUE_LIMIT_EXCEEDED, "queue full");
        assert!(matches!(
            StartError::from_api(err),
            StartError::QueueLimitExceeded
        ));
    }

    #[test]
    fn other_api_errors_map_to_rejected() {
        let err = ApiError::api(1001, "invalid input");
        assert!(matches!(StartError::from_api(err), StartError::Rejected(_)));
    }

    #[test]
    fn non_api_errors_are_fatal() {
        let err = ApiError::MissingData {
            field: "data.result",
        };
        assert!(matches!(StartError::from_api(err), StartError::Fatal(_)));
    }
}
