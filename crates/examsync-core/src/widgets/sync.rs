//! Controlled-value synchronization shared by all widgets.
//!
//! A widget owns an editable state derived from a single wire-format string
//! and a change callback. Two things feed it: external values (a saved
//! answer arriving, or the parent echoing back what the widget just emitted)
//! and user edits. The [`Synchronizer`] keeps those apart:
//!
//! - the first external value mounts the state without notifying;
//! - later external values re-hydrate only when they decode to something
//!   different from the current state, so echoes and duplicates never reset
//!   unsaved input;
//! - an edit notifies exactly once, and only when it changes the decoded form.

use std::fmt;

use tracing::debug;

/// Callback receiving the re-encoded wire value after a user edit.
pub type ChangeCallback = Box<dyn FnMut(String) + Send>;

/// An editable answer state with a wire encoding.
pub trait AnswerState: Sized {
    /// Prompt-derived data needed to decode and encode (options, steps, blank count).
    type Context;
    /// Structured form compared for equality; two states with equal
    /// canonical forms encode to equivalent answers.
    type Canonical: PartialEq + fmt::Debug;

    fn decode(value: &str, ctx: &Self::Context) -> Self;
    fn encode(&self, ctx: &Self::Context) -> String;
    fn canonical(&self, ctx: &Self::Context) -> Self::Canonical;
}

/// Where a widget is in its synchronization lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No external value has been received yet.
    Uninitialized,
    /// State mirrors the last external value.
    Synced,
    /// State holds user edits not yet confirmed by an external value.
    Editing,
}

pub struct Synchronizer<S: AnswerState> {
    ctx: S::Context,
    state: S,
    phase: SyncPhase,
    on_change: ChangeCallback,
}

impl<S: AnswerState> Synchronizer<S> {
    pub fn new(ctx: S::Context, on_change: ChangeCallback) -> Self {
        let state = S::decode("", &ctx);
        Self {
            ctx,
            state,
            phase: SyncPhase::Uninitialized,
            on_change,
        }
    }

    /// Create and mount with an initial value in one step.
    pub fn mounted(ctx: S::Context, value: &str, on_change: ChangeCallback) -> Self {
        let mut sync = Self::new(ctx, on_change);
        sync.receive(value);
        sync
    }

    /// Apply an externally supplied value.
    ///
    /// Returns `true` when the local state was replaced. Never notifies.
    pub fn receive(&mut self, value: &str) -> bool {
        let incoming = S::decode(value, &self.ctx);

        if self.phase != SyncPhase::Uninitialized
            && incoming.canonical(&self.ctx) == self.state.canonical(&self.ctx)
        {
            debug!(phase = ?self.phase, "external value matches local state; keeping edits");
            return false;
        }

        debug!(from = ?self.phase, "hydrating widget from external value");
        self.state = incoming;
        self.phase = SyncPhase::Synced;
        true
    }

    /// Apply a user edit.
    ///
    /// Returns `true` and notifies once when the edit changed the decoded answer.
    pub fn edit(&mut self, f: impl FnOnce(&mut S, &S::Context)) -> bool {
        let before = self.state.canonical(&self.ctx);
        f(&mut self.state, &self.ctx);
        if self.state.canonical(&self.ctx) == before {
            return false;
        }

        self.phase = SyncPhase::Editing;
        let encoded = self.state.encode(&self.ctx);
        (self.on_change)(encoded);
        true
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn context(&self) -> &S::Context {
        &self.ctx
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Current wire value.
    pub fn value(&self) -> String {
        self.state.encode(&self.ctx)
    }
}

impl<S: AnswerState + fmt::Debug> fmt::Debug for Synchronizer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synchronizer")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
