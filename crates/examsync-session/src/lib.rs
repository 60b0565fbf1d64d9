//! examsync-session — in-progress attempts that survive reloads.
//!
//! An [`AttemptSessionStore`] keeps attempt records in memory and mirrors
//! each one into a [`SessionBackend`] under a namespaced key. Backends are
//! injectable: [`MemoryBackend`] for tests, [`FileBackend`] for a durable
//! store whose lifetime is bounded by a single session.

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, SessionBackend};
pub use error::SessionError;
pub use store::{AttemptSessionStore, DEFAULT_NAMESPACE};
