//! Error types for task tree operations.

use thiserror::Error;

use crate::timevalue::TimeValue;

/// Errors produced by the task tree and its persistence layer.
///
/// Every fallible operation either completes or leaves the tree exactly as
/// it was; no variant here implies a half-applied mutation.
#[derive(Debug, Error)]
pub enum Error {
    /// The input did not match the time quantity grammar.
    #[error("cannot read {input:?} as a time value (expected digits with an optional s/m/h suffix)")]
    Parse { input: String },

    /// A stop instant would land before the interval's start.
    ///
    /// Carries the most negative offset that would still be accepted, so
    /// the caller can tell the user how far back they may legally go.
    #[error("stop would land before the interval started; the offset can go back at most {max_backdate}")]
    StopBeforeStart { max_backdate: TimeValue },

    /// Closing an interval whose end is already recorded.
    #[error("the interval is already closed")]
    AlreadyClosed,

    /// Opening a second interval on a task that is still running.
    #[error("task {path} is already running")]
    AlreadyRunning { path: String },

    /// Stopping a task that has never been started.
    #[error("task {path} has no recorded intervals")]
    NoHistory { path: String },

    /// A path expression contained an empty segment.
    #[error("empty task name in path {expr:?}")]
    EmptyName { expr: String },

    /// A path expression walked above the root.
    #[error("path {expr:?} escapes the root task")]
    RootBoundary { expr: String },

    /// The root task cannot be removed.
    #[error("the root task cannot be removed")]
    CannotRemoveRoot,

    /// A structural invariant of the tree was broken.
    ///
    /// Signals a defect or a corrupt stored document rather than a user
    /// mistake; the in-flight operation is abandoned.
    #[error("task tree integrity violated: {detail}")]
    Integrity { detail: String },

    /// Reading or writing the store file failed.
    #[error("store file error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file did not hold a valid task document.
    #[error("store file is not a valid task document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
