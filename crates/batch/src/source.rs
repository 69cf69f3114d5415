//! Where the dispatcher gets its job list from.

use crate::job::EncodingJob;

/// Supplies the jobs a dispatcher run works through. The dispatch loop never
/// assumes a particular origin; a fixed in-memory list is the only
/// implementation shipped today.
pub trait JobSource {
    fn jobs(self) -> Vec<EncodingJob>;
}

/// A fixed list of jobs, consumed once at dispatcher construction.
#[derive(Debug, Default)]
pub struct InMemoryJobSource {
    jobs: Vec<EncodingJob>,
}

impl InMemoryJobSource {
    pub fn new(jobs: Vec<EncodingJob>) -> Self {
        Self { jobs }
    }
}

impl JobSource for InMemoryJobSource {
    fn jobs(self) -> Vec<EncodingJob> {
        self.jobs
    }
}

impl JobSource for Vec<EncodingJob> {
    fn jobs(self) -> Vec<EncodingJob> {
        self
    }
}
