//! Core business logic.
//!
//! Repository discovery, worktree identity, provisioning and the small
//! collaborators around them (file copy, hooks). Nothing here prints; core
//! operations report progress through [`ProgressSink`] and return
//! structured results, so commands, tests and future front-ends can share
//! them.

pub mod base_dir;
pub mod copy;
pub mod hooks;
pub mod identity;
pub mod list;
mod progress;
pub mod provision;
pub mod repo;
pub mod status;

pub use progress::OutputSink;

// ─────────────────────────────────────────────────────────────────────────
// Progress reporting
// ─────────────────────────────────────────────────────────────────────────

/// Trait for core operations to report progress without depending on `Output`.
///
/// Commands create an adapter (`OutputSink`) that bridges this trait to the
/// actual output implementation. Tests can use `NullSink` to suppress all
/// output.
pub trait ProgressSink {
    /// Report an intermediate step (shown in verbose mode).
    fn on_step(&mut self, msg: &str);

    /// Report a warning (always shown).
    fn on_warning(&mut self, msg: &str);

    /// Report a debug message (shown in verbose mode).
    fn on_debug(&mut self, msg: &str);
}

/// A no-op sink that discards all progress messages.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_step(&mut self, _msg: &str) {}
    fn on_warning(&mut self, _msg: &str) {}
    fn on_debug(&mut self, _msg: &str) {}
}
