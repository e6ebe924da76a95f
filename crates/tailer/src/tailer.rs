//! Log tailer: attempt selection and polling control

use crate::buffer::ConsoleBuffer;
use crate::path::{log_path, LogTypeCatalog};
use crate::poller::{PollContext, PollingHandle};
use crate::scroll::ScrollTracker;
use crate::source::LogFetcher;
use labconsole_common::{Attempt, ConsoleConfig, Error, LogType, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

const EVENT_CAPACITY: usize = 256;

/// Change notifications for renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// Lines added after the existing output.
    Appended(Vec<String>),
    /// Output replaced wholesale by these lines.
    Replaced(Vec<String>),
    /// Output emptied.
    Cleared,
    /// Polling restarted from the beginning of an attempt's log.
    Restarted {
        attempt_id: String,
        path: Option<String>,
    },
}

/// State shared between the tailer and its polling task.
pub(crate) struct ConsoleState {
    pub disabled: bool,
    pub selected_attempt: Option<Attempt>,
    pub selected_log_type: Option<LogType>,
    pub buffer: ConsoleBuffer,
    pub scroll: ScrollTracker,
    /// Polling task allowed to write; bumped on every stop.
    pub generation: u64,
}

pub(crate) type SharedState = Arc<Mutex<ConsoleState>>;

/// Streams the log of a job's selected attempt into a bounded console.
///
/// Must be used from within a Tokio runtime: polling runs as a spawned task.
pub struct LogTailer {
    ctx: PollContext,
    catalog: LogTypeCatalog,
    attempts: Vec<Attempt>,
    polling: Option<PollingHandle>,
}

impl LogTailer {
    /// Create an idle tailer for `job_id` with the configured default log type.
    pub fn new(
        job_id: impl Into<String>,
        fetcher: Arc<dyn LogFetcher>,
        config: ConsoleConfig,
    ) -> Result<Self> {
        config.validate()?;
        let catalog = LogTypeCatalog::from_config(&config);
        let log_type = catalog.resolve(&config.default_log_type)?.clone();

        let state = ConsoleState {
            disabled: false,
            selected_attempt: None,
            selected_log_type: Some(log_type),
            buffer: ConsoleBuffer::new(config.max_lines),
            scroll: ScrollTracker::new(),
            generation: 0,
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            ctx: PollContext {
                job_id: job_id.into(),
                fetcher,
                config: Arc::new(config),
                state: Arc::new(Mutex::new(state)),
                events,
            },
            catalog,
            attempts: Vec::new(),
            polling: None,
        })
    }

    pub fn job_id(&self) -> &str {
        &self.ctx.job_id
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.ctx.config
    }

    pub fn log_types(&self) -> &[LogType] {
        self.catalog.all()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.ctx.events.subscribe()
    }

    // Inputs

    /// Push a new attempt snapshot.
    pub fn set_attempts(&mut self, attempts: Vec<Attempt>) {
        self.attempts = attempts;
        self.on_inputs_changed(false);
    }

    /// Push a snapshot from an explicit reload; restarts polling even if the
    /// selected attempt is unchanged.
    pub fn reload(&mut self, attempts: Vec<Attempt>) {
        self.attempts = attempts;
        self.on_inputs_changed(true);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        let was_disabled = {
            let mut state = self.ctx.state.lock();
            std::mem::replace(&mut state.disabled, disabled)
        };
        self.on_inputs_changed(was_disabled && !disabled);
    }

    /// Pick an attempt by id and tail it from the start.
    pub fn select_attempt(&mut self, attempt_id: &str) -> Result<()> {
        let attempt = self
            .attempts
            .iter()
            .find(|a| a.attempt_id == attempt_id)
            .cloned()
            .ok_or_else(|| Error::attempt_not_found(attempt_id))?;

        {
            let mut state = self.ctx.state.lock();
            if state.disabled {
                debug!(attempt = %attempt_id, "Ignoring selection while disabled");
                return Ok(());
            }
            state.selected_attempt = Some(attempt);
        }
        info!(job = %self.ctx.job_id, attempt = %attempt_id, "Attempt selected");
        self.reset_polling();
        Ok(())
    }

    /// Switch log stream; a tailing console restarts from the new file's start.
    pub fn select_log_type(&mut self, name: &str) -> Result<()> {
        let log_type = self.catalog.resolve(name)?.clone();
        let tailing = {
            let mut state = self.ctx.state.lock();
            state.selected_log_type = Some(log_type);
            state.selected_attempt.is_some() && !state.disabled
        };
        info!(job = %self.ctx.job_id, log_type = %name, "Log type selected");
        if tailing {
            self.reset_polling();
        }
        Ok(())
    }

    fn on_inputs_changed(&mut self, force: bool) {
        let disabled = self.ctx.state.lock().disabled;
        if disabled || self.attempts.is_empty() {
            self.go_idle();
            return;
        }

        let pinned = {
            let mut state = self.ctx.state.lock();
            let refreshed = state.selected_attempt.as_ref().and_then(|selected| {
                self.attempts
                    .iter()
                    .find(|a| a.attempt_id == selected.attempt_id)
                    .cloned()
            });
            match refreshed {
                Some(attempt) => {
                    state.selected_attempt = Some(attempt);
                    true
                }
                None => {
                    state.selected_attempt = self.attempts.last().cloned();
                    false
                }
            }
        };

        if pinned && !force {
            return;
        }
        if !pinned {
            if let Some(attempt) = self.attempts.last() {
                info!(
                    job = %self.ctx.job_id,
                    attempt = %attempt.attempt_id,
                    state = %attempt.state,
                    "Tailing latest attempt"
                );
            }
        }
        self.reset_polling();
    }

    fn go_idle(&mut self) {
        self.stop_polling();
        let mut state = self.ctx.state.lock();
        let was_tailing = state.selected_attempt.take().is_some();
        if was_tailing {
            info!(job = %self.ctx.job_id, "Console idle");
        }
        let had_output = !state.buffer.is_empty() || state.buffer.offset().is_some();
        state.buffer.clear();
        state.scroll.reset();
        if was_tailing || had_output {
            let _ = self.ctx.events.send(ConsoleEvent::Cleared);
        }
    }

    // Polling control

    /// Begin a fresh polling loop; the first fetch happens immediately.
    pub fn start_polling(&mut self) {
        self.stop_polling();
        let generation = self.ctx.state.lock().generation;
        self.polling = Some(PollingHandle::spawn(self.ctx.clone(), generation));
    }

    /// Cancel the active polling loop, if any. A fetch still in flight is
    /// never applied.
    pub fn stop_polling(&mut self) {
        if let Some(handle) = self.polling.take() {
            {
                let mut state = self.ctx.state.lock();
                if state.generation == handle.generation() {
                    state.generation += 1;
                }
            }
            handle.cancel();
            debug!(job = %self.ctx.job_id, "Polling stopped");
        }
    }

    /// Stop, clear the console, and start again from the beginning.
    pub fn reset_polling(&mut self) {
        self.stop_polling();
        let restarted = {
            let mut state = self.ctx.state.lock();
            state.buffer.clear();
            let path = log_path(
                state.selected_attempt.as_ref(),
                state.selected_log_type.as_ref(),
                &self.ctx.config,
            );
            let attempt_id = state.selected_attempt.as_ref().map(|a| a.attempt_id.clone());
            attempt_id.map(|attempt_id| ConsoleEvent::Restarted { attempt_id, path })
        };
        let _ = self.ctx.events.send(ConsoleEvent::Cleared);
        if let Some(event) = restarted {
            let _ = self.ctx.events.send(event);
        }
        self.start_polling();
    }

    // Read access

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn output(&self) -> Vec<String> {
        self.ctx.state.lock().buffer.to_vec()
    }

    pub fn offset(&self) -> Option<u64> {
        self.ctx.state.lock().buffer.offset()
    }

    pub fn selected_attempt(&self) -> Option<Attempt> {
        self.ctx.state.lock().selected_attempt.clone()
    }

    pub fn selected_log_type(&self) -> Option<LogType> {
        self.ctx.state.lock().selected_log_type.clone()
    }

    pub fn is_disabled(&self) -> bool {
        self.ctx.state.lock().disabled
    }

    pub fn is_tailing(&self) -> bool {
        self.ctx.state.lock().selected_attempt.is_some()
    }

    pub fn is_polling(&self) -> bool {
        self.polling.as_ref().map_or(false, |h| h.is_active())
    }

    // Scroll bookkeeping

    pub fn report_viewport(&self, scroll_top: usize, viewport_height: usize, content_height: usize) {
        self.ctx
            .state
            .lock()
            .scroll
            .report_viewport(scroll_top, viewport_height, content_height);
    }

    /// True once per update that arrived while the view was at the bottom.
    pub fn take_scroll_request(&self) -> bool {
        self.ctx.state.lock().scroll.take_scroll_request()
    }
}

impl Drop for LogTailer {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
