//! Task nodes and the rules governing their interval lists.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::timevalue::TimeValue;

/// Identifies a task within the [`Store`](crate::Store) that issued it.
///
/// Ids index the store's arena and stay valid for the store's lifetime,
/// with one caveat: ids inside a removed subtree keep pointing at detached
/// husks. Slots are never reused, so a stale id can never alias a
/// different task; re-resolve the path after a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub(crate) usize);

/// A named node in the task hierarchy.
///
/// The tree shape (parent and child links) lives in the store's arena; the
/// task itself owns its name, path, description, and interval list. The
/// path is fixed at registration: the parent's path, the name, and the
/// separator.
#[derive(Debug, Clone)]
pub struct Task {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) description: String,
    pub(crate) parent: Option<TaskId>,
    pub(crate) children: Vec<TaskId>,
    pub(crate) intervals: Vec<Interval>,
}

impl Task {
    pub(crate) fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        parent: Option<TaskId>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: String::new(),
            parent,
            children: Vec::new(),
            intervals: Vec::new(),
        }
    }

    /// The task's own name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full path from the root, ending with the separator.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The free-form description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// The parent's id; absent only on the root.
    #[must_use]
    pub const fn parent(&self) -> Option<TaskId> {
        self.parent
    }

    /// Ids of this task's children, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[TaskId] {
        &self.children
    }

    /// The recorded intervals, oldest first.
    #[must_use]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Whether the most recent interval is still open.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.intervals.last().is_some_and(Interval::is_open)
    }

    /// Opens a new interval at `now` shifted by `offset`.
    ///
    /// Fails with [`Error::AlreadyRunning`] while the last interval is
    /// still open, so one task can never hold two open intervals.
    pub fn start_interval(&mut self, now: DateTime<Utc>, offset: TimeValue) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning {
                path: self.path.clone(),
            });
        }
        self.intervals.push(Interval::open_at(now, offset));
        Ok(())
    }

    /// Closes the most recent interval at `now` shifted by `offset`.
    ///
    /// Fails with [`Error::NoHistory`] when the task has never been
    /// started; otherwise delegates to [`Interval::close_at`] and surfaces
    /// its rejections unchanged.
    pub fn stop_interval(&mut self, now: DateTime<Utc>, offset: TimeValue) -> Result<()> {
        match self.intervals.last_mut() {
            None => Err(Error::NoHistory {
                path: self.path.clone(),
            }),
            Some(last) => last.close_at(now, offset),
        }
    }

    /// Time recorded directly on this task, excluding children.
    ///
    /// An open interval counts up to `now`.
    #[must_use]
    pub fn hours(&self, now: DateTime<Utc>) -> TimeValue {
        self.intervals
            .iter()
            .fold(TimeValue::ZERO, |total, interval| {
                total.add(interval.duration(now).seconds())
            })
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.description)
    }
}

/// Merges `source` onto the end of `dest`, keeping an open interval last.
///
/// If the destination currently ends with an open interval, that interval
/// is held aside and re-appended after the source elements, so "the open
/// interval is the last element of its list" survives the merge. The
/// relative order of everything else is preserved.
#[must_use]
pub fn merge_intervals(dest: Vec<Interval>, source: Vec<Interval>) -> Vec<Interval> {
    let mut merged = dest;
    let held_open = match merged.last() {
        Some(last) if last.is_open() => merged.pop(),
        _ => None,
    };
    merged.extend(source);
    if let Some(open) = held_open {
        merged.push(open);
    }
    merged
}
