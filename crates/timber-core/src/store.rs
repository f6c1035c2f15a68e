//! The task tree: arena, navigation, removal, and persistence.
//!
//! Nodes live in a flat arena indexed by [`TaskId`]; parents hold child ids
//! in insertion order and children keep a back index to their parent, so no
//! node owns another. A cursor (the "current" task) anchors relative path
//! expressions.
//!
//! # Removal
//!
//! Removing a task detaches its subtree and folds every recorded interval
//! upward, post-order: each node first absorbs its children's lists, then
//! hands its own (now complete) list to its parent, with
//! [`merge_intervals`] keeping an open interval last at every hop. The
//! intervals all survive; only the nodes go away. Arena slots are never
//! reused, so ids into a removed subtree dangle harmlessly.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::task::{Task, TaskId, merge_intervals};
use crate::timevalue::TimeValue;

/// Separator between task names in a path expression.
pub const SEPARATOR: char = '/';

/// What a removal accomplished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Removal {
    /// Number of tasks removed: the target plus all of its descendants.
    pub removed: usize,
    /// Time the removed tasks themselves had recorded, measured when the
    /// removal ran. Informational only: the intervals survive the move
    /// into the target's parent.
    pub reclaimed: TimeValue,
}

/// Stored form of one task, mirroring the on-disk document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    pub description: String,
    pub intervals: Vec<Interval>,
    pub childs: Vec<TaskRecord>,
}

/// The task hierarchy and the cursor into it.
#[derive(Debug, Clone)]
pub struct Store {
    tasks: Vec<Task>,
    root: TaskId,
    current: TaskId,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a tree holding only the root task, which is also current.
    #[must_use]
    pub fn new() -> Self {
        let root = TaskId(0);
        let separator = SEPARATOR.to_string();
        Self {
            tasks: vec![Task::new(separator.clone(), separator, None)],
            root,
            current: root,
        }
    }

    // ========== Access ==========

    /// The root task's id.
    #[must_use]
    pub const fn root(&self) -> TaskId {
        self.root
    }

    /// The current task's id, the base for relative path expressions.
    #[must_use]
    pub const fn current(&self) -> TaskId {
        self.current
    }

    /// Reads a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    /// Mutable access to a task's own data: intervals and description.
    pub fn task_mut(&mut self, id: TaskId) -> &mut Task {
        &mut self.tasks[id.0]
    }

    // ========== Children ==========

    fn lookup_child(&self, parent: TaskId, name: &str) -> Option<TaskId> {
        self.tasks[parent.0]
            .children
            .iter()
            .copied()
            .find(|&child| self.tasks[child.0].name == name)
    }

    fn attach_child(&mut self, parent: TaskId, name: &str) -> TaskId {
        let path = format!("{}{name}{SEPARATOR}", self.tasks[parent.0].path);
        let id = TaskId(self.tasks.len());
        self.tasks.push(Task::new(name, path, Some(parent)));
        self.tasks[parent.0].children.push(id);
        id
    }

    /// The child of `parent` named `name`, registered on first access.
    ///
    /// One name maps to one child for the parent's lifetime: asking again
    /// always returns the same id.
    pub fn child(&mut self, parent: TaskId, name: &str) -> TaskId {
        match self.lookup_child(parent, name) {
            Some(existing) => existing,
            None => self.attach_child(parent, name),
        }
    }

    /// Registration used while rebuilding from a stored document, where a
    /// second child under one name is corruption rather than a lookup.
    fn register_child(&mut self, parent: TaskId, name: &str) -> Result<TaskId> {
        if self.lookup_child(parent, name).is_some() {
            return Err(Error::Integrity {
                detail: format!(
                    "duplicate child {name:?} under {}",
                    self.tasks[parent.0].path
                ),
            });
        }
        Ok(self.attach_child(parent, name))
    }

    // ========== Queries ==========

    /// First running task in a pre-order walk from `id`: the task itself,
    /// then each child subtree in insertion order.
    #[must_use]
    pub fn find_running_in(&self, id: TaskId) -> Option<TaskId> {
        if self.tasks[id.0].is_running() {
            return Some(id);
        }
        self.tasks[id.0]
            .children
            .iter()
            .find_map(|&child| self.find_running_in(child))
    }

    /// First running task in the whole tree, if any.
    #[must_use]
    pub fn find_running(&self) -> Option<TaskId> {
        self.find_running_in(self.root)
    }

    /// Time recorded on `id` and all of its descendants.
    #[must_use]
    pub fn hours_all(&self, id: TaskId, now: DateTime<Utc>) -> TimeValue {
        let task = &self.tasks[id.0];
        task.children.iter().fold(task.hours(now), |total, &child| {
            total.add(self.hours_all(child, now).seconds())
        })
    }

    /// Number of intervals recorded on `id` and all of its descendants.
    #[must_use]
    pub fn interval_count_all(&self, id: TaskId) -> usize {
        let task = &self.tasks[id.0];
        task.children
            .iter()
            .fold(task.intervals.len(), |total, &child| {
                total + self.interval_count_all(child)
            })
    }

    fn subtree_size(&self, id: TaskId) -> usize {
        self.tasks[id.0]
            .children
            .iter()
            .fold(1, |total, &child| total + self.subtree_size(child))
    }

    fn contains(&self, ancestor: TaskId, id: TaskId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.tasks[node.0].parent;
        }
        false
    }

    // ========== Path Resolution ==========

    /// Resolves a path expression to a task id, creating missing tasks
    /// along the way.
    ///
    /// An empty expression names the current task. A leading separator
    /// rebases onto the root. A leading run of `..` components walks to
    /// successive parents, failing with [`Error::RootBoundary`] past the
    /// root. The remainder splits on the separator into trimmed segments,
    /// each resolved via [`Self::child`] with auto-vivification; an empty
    /// segment fails with [`Error::EmptyName`]. A `..` after the leading
    /// run is an ordinary name. Nothing is created until the whole
    /// expression has been validated.
    pub fn resolve(&mut self, expr: &str) -> Result<TaskId> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Ok(self.current);
        }

        let (mut cursor, mut rest) = match trimmed.strip_prefix(SEPARATOR) {
            Some(stripped) => (self.root, stripped),
            None => (self.current, trimmed),
        };

        loop {
            let stripped = if rest == ".." {
                ""
            } else if let Some(stripped) = rest.strip_prefix("../") {
                stripped
            } else {
                break;
            };
            cursor = self.tasks[cursor.0]
                .parent
                .ok_or_else(|| Error::RootBoundary {
                    expr: expr.to_string(),
                })?;
            rest = stripped;
        }

        if rest.is_empty() {
            return Ok(cursor);
        }

        let segments: Vec<&str> = rest.split(SEPARATOR).map(str::trim).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(Error::EmptyName {
                expr: expr.to_string(),
            });
        }

        for name in segments {
            cursor = self.child(cursor, name);
        }
        Ok(cursor)
    }

    /// Re-points the current task at the resolution of `expr`.
    pub fn change_current(&mut self, expr: &str) -> Result<TaskId> {
        self.current = self.resolve(expr)?;
        Ok(self.current)
    }

    // ========== Removal ==========

    /// Removes the task at `expr` with its whole subtree, folding every
    /// recorded interval up into the target's parent.
    ///
    /// Fails with [`Error::CannotRemoveRoot`] when `expr` names the root.
    /// If the current task sat inside the removed subtree, the cursor
    /// moves to the target's parent. One clock reading covers the whole
    /// operation.
    pub fn remove(&mut self, expr: &str, now: DateTime<Utc>) -> Result<Removal> {
        let target = self.resolve(expr)?;
        let Some(parent) = self.tasks[target.0].parent else {
            return Err(Error::CannotRemoveRoot);
        };

        // Captured before any interval moves, so each node still reports
        // only its own recorded time.
        let removed = self.subtree_size(target);
        let reclaimed = self.hours_all(target, now);

        if self.contains(target, self.current) {
            self.current = parent;
        }

        self.tasks[parent.0].children.retain(|&child| child != target);
        self.collapse(target);
        self.transfer_intervals(target, parent);

        Ok(Removal { removed, reclaimed })
    }

    /// Folds every descendant's intervals into `id`, children before the
    /// node that absorbs them.
    fn collapse(&mut self, id: TaskId) {
        let children = std::mem::take(&mut self.tasks[id.0].children);
        for child in children {
            self.collapse(child);
            self.transfer_intervals(child, id);
        }
    }

    /// Moves `source`'s interval list onto `dest`'s through
    /// [`merge_intervals`], leaving `source` empty.
    fn transfer_intervals(&mut self, source: TaskId, dest: TaskId) {
        let moved = std::mem::take(&mut self.tasks[source.0].intervals);
        let base = std::mem::take(&mut self.tasks[dest.0].intervals);
        self.tasks[dest.0].intervals = merge_intervals(base, moved);
    }

    // ========== Persistence ==========

    /// The whole tree as a storable document.
    #[must_use]
    pub fn snapshot(&self) -> TaskRecord {
        self.record(self.root)
    }

    fn record(&self, id: TaskId) -> TaskRecord {
        let task = &self.tasks[id.0];
        TaskRecord {
            name: task.name.clone(),
            description: task.description.clone(),
            intervals: task.intervals.clone(),
            childs: task
                .children
                .iter()
                .map(|&child| self.record(child))
                .collect(),
        }
    }

    /// Rebuilds a store from a stored document.
    ///
    /// Children register through the same path as live construction and
    /// keep their order, so a rebuilt tree obeys the same invariants as a
    /// freshly grown one. Interval contents are trusted as loaded; only
    /// structural corruption (a misnamed root, duplicate sibling names)
    /// fails the rebuild.
    pub fn restore(record: TaskRecord) -> Result<Self> {
        let separator = SEPARATOR.to_string();
        if record.name != separator {
            return Err(Error::Integrity {
                detail: format!(
                    "root record must be named {separator:?}, found {:?}",
                    record.name
                ),
            });
        }
        let mut store = Self::new();
        store.tasks[store.root.0].description = record.description;
        store.tasks[store.root.0].intervals = record.intervals;
        store.fill(store.root, record.childs)?;
        Ok(store)
    }

    fn fill(&mut self, parent: TaskId, records: Vec<TaskRecord>) -> Result<()> {
        for record in records {
            let id = self.register_child(parent, &record.name)?;
            self.tasks[id.0].description = record.description;
            self.tasks[id.0].intervals = record.intervals;
            self.fill(id, record.childs)?;
        }
        Ok(())
    }

    /// Writes the tree to `path` as pretty JSON.
    ///
    /// The document goes to a temporary file first and replaces the old
    /// one by rename, so a reader never sees a partial write.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Reads a store from `path`.
    ///
    /// A missing file or an unusable document yields a fresh tree holding
    /// only the root; the failure is logged, never returned. The cursor
    /// always starts at the root.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no store file, starting fresh");
            return Self::new();
        }
        match Self::try_load(path) {
            Ok(store) => store,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "store file unusable, starting with a fresh tree"
                );
                Self::new()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let record: TaskRecord = serde_json::from_str(&contents)?;
        Self::restore(record)
    }
}
