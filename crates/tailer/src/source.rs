//! Collaborators the tailer depends on

use async_trait::async_trait;
use labconsole_common::{Attempt, LogChunk, Result};

/// Retrieves chunks of an attempt's log file
#[async_trait]
pub trait LogFetcher: Send + Sync {
    /// Fetch log content starting at `offset`, or from the beginning when absent.
    async fn fetch(
        &self,
        job_id: &str,
        attempt_id: &str,
        path: &str,
        offset: Option<u64>,
    ) -> Result<LogChunk>;
}

/// Supplies the current attempts of a job.
///
/// The tailer never calls this; its owner does, and pushes each snapshot
/// into the tailer.
#[async_trait]
pub trait AttemptSource: Send + Sync {
    async fn attempts(&self, job_id: &str) -> Result<Vec<Attempt>>;
}
