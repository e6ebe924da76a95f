//! LabConsole log tailer
//!
//! Streams a job attempt's log output into a bounded console buffer.
//!
//! ```text
//! AttemptSource ──snapshots──▶ LogTailer ──fetch(job, attempt, path, offset)──▶ LogFetcher
//!                                 │
//!                                 ├── attempt selection (Idle / Tailing)
//!                                 ├── polling task (one fetch in flight)
//!                                 ├── ConsoleBuffer (bounded lines + resume offset)
//!                                 └── ScrollTracker (stick to bottom)
//! ```

pub mod buffer;
pub mod path;
pub mod scroll;
pub mod source;
pub mod tailer;

mod poller;

pub use buffer::{BufferUpdate, ConsoleBuffer};
pub use path::{log_path, LogTypeCatalog};
pub use scroll::ScrollTracker;
pub use source::{AttemptSource, LogFetcher};
pub use tailer::{ConsoleEvent, LogTailer};
