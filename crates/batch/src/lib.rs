//! Batch dispatcher for remote encodings.
//!
//! Keeps a bounded number of encodings queued on the platform at once,
//! retries transient failures up to a per-job budget, and reports every job
//! it had to give up on. The remote service is reached through the
//! [`QueueGauge`] and [`JobRunner`] seams so the loop itself stays testable.

mod dispatcher;
mod job;
mod runner;
mod source;

pub use dispatcher::{BatchOptions, JobDispatcher};
pub use job::{EncodingJob, JobStatus};
pub use runner::{JobPoll, JobRunner, QueueGauge, StartError};
pub use source::{InMemoryJobSource, JobSource};
