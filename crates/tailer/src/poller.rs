//! Polling task driving incremental fetches

use crate::buffer::BufferUpdate;
use crate::path::log_path;
use crate::source::LogFetcher;
use crate::tailer::{ConsoleEvent, SharedState};
use labconsole_common::ConsoleConfig;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Everything a polling task needs; cloned out of the owning tailer.
#[derive(Clone)]
pub(crate) struct PollContext {
    pub job_id: String,
    pub fetcher: Arc<dyn LogFetcher>,
    pub config: Arc<ConsoleConfig>,
    pub state: SharedState,
    pub events: broadcast::Sender<ConsoleEvent>,
}

/// Ownership of a running polling task.
///
/// `generation` must match the shared state's generation for the task's
/// results to be applied; retiring the generation and aborting the task
/// together make cancellation final.
pub(crate) struct PollingHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl PollingHandle {
    pub fn spawn(ctx: PollContext, generation: u64) -> Self {
        let task = tokio::spawn(run(ctx, generation));
        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn cancel(self) {
        self.task.abort();
    }
}

async fn run(ctx: PollContext, generation: u64) {
    let interval = ctx.config.poll_interval();
    debug!(job = %ctx.job_id, generation, "Polling started");

    poll_once(&ctx, generation).await;

    loop {
        tokio::time::sleep(interval).await;

        if !selection_executing(&ctx) {
            trace!(job = %ctx.job_id, "Selected attempt is final, skipping fetch");
            continue;
        }

        poll_once(&ctx, generation).await;
    }
}

fn selection_executing(ctx: &PollContext) -> bool {
    ctx.state
        .lock()
        .selected_attempt
        .as_ref()
        .map_or(false, |a| !a.is_final())
}

/// Fetch one chunk and apply it to the console.
async fn poll_once(ctx: &PollContext, generation: u64) {
    let (attempt_id, path, offset) = {
        let state = ctx.state.lock();
        if state.generation != generation || state.disabled {
            return;
        }
        let Some(attempt) = state.selected_attempt.as_ref() else {
            return;
        };
        let Some(path) = log_path(Some(attempt), state.selected_log_type.as_ref(), &ctx.config)
        else {
            return;
        };
        (attempt.attempt_id.clone(), path, state.buffer.offset())
    };

    debug!(
        job = %ctx.job_id,
        attempt = %attempt_id,
        path = %path,
        offset = ?offset,
        "Fetching log chunk"
    );
    let result = ctx
        .fetcher
        .fetch(&ctx.job_id, &attempt_id, &path, offset)
        .await;

    let mut state = ctx.state.lock();
    if state.generation != generation {
        debug!(attempt = %attempt_id, "Discarding chunk from retired polling task");
        return;
    }

    match result {
        Ok(chunk) => {
            state.scroll.before_update();
            let update = state.buffer.apply(&chunk);
            debug!(
                attempt = %attempt_id,
                new_lines = update.lines().len(),
                offset = ?state.buffer.offset(),
                "Applied log chunk"
            );
            let event = match update {
                BufferUpdate::Appended(lines) => ConsoleEvent::Appended(lines),
                BufferUpdate::Replaced(lines) => ConsoleEvent::Replaced(lines),
            };
            let _ = ctx.events.send(event);
        }
        Err(e) => {
            warn!(attempt = %attempt_id, path = %path, "Failed to fetch log output: {}", e);
            state.buffer.clear();
            let _ = ctx.events.send(ConsoleEvent::Cleared);
        }
    }
}
