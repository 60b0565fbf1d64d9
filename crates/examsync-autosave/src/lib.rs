//! examsync-autosave — debounced, best-effort answer saving.
//!
//! The [`AutoSaveScheduler`] coalesces rapid answer changes per attempt and,
//! after a quiet period, hands a single [`AutosavePayload`] to a
//! [`SaveTransport`]. [`HttpTransport`] talks to the exam backend;
//! [`MockTransport`] records calls for tests.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod payload;
pub mod scheduler;
pub mod transport;

pub use config::{create_transport, load_config, AutosaveConfig, ExamsyncConfig, SessionConfig};
pub use error::SaveError;
pub use http::HttpTransport;
pub use mock::MockTransport;
pub use payload::{build_payload, wall_clock_revision, AnswerEntry, AutosavePayload};
pub use scheduler::{AutoSaveScheduler, DEFAULT_QUIET_PERIOD};
pub use transport::SaveTransport;
