//! Store lifecycle and the start/stop protocol.
//!
//! A [`Session`] binds a loaded [`Store`] to its backing file. Mutating
//! operations write the store back before returning, so an interrupted
//! run never loses more than the in-flight command. The running task is
//! always derived from the tree, never cached, which lets a reloaded
//! store resume exactly where the previous process left off.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use timber_core::{Removal, Store, TaskId, TimeValue};

/// What a stop recorded.
#[derive(Debug, Clone, Copy)]
pub struct StopOutcome {
    /// The task whose interval was closed.
    pub task: TaskId,
    /// Length of the interval just closed.
    pub recorded: TimeValue,
}

/// What a start did.
#[derive(Debug, Clone, Copy)]
pub struct StartOutcome {
    /// The task that had to be stopped first, if one was running.
    pub stopped: Option<StopOutcome>,
    /// The task now running.
    pub started: TaskId,
}

/// A loaded store bound to its backing file.
pub struct Session {
    store: Store,
    path: PathBuf,
}

impl Session {
    /// Loads the store behind `path`, starting fresh if there is none.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = Store::load(&path);
        Self { store, path }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The file the store persists to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Resolves a path expression, creating missing tasks along the way.
    pub fn resolve(&mut self, expr: &str) -> Result<TaskId> {
        Ok(self.store.resolve(expr)?)
    }

    /// Starts tracking the task at `expr`, with `offset` shifting the
    /// start time.
    ///
    /// The target is resolved first, so a bad expression changes nothing.
    /// A task already running is then closed at the unshifted clock time
    /// and the new interval opens. The cursor stays where it was: only
    /// [`Self::change_current`] re-bases relative expressions, so
    /// consecutive relative starts name siblings.
    pub fn start(&mut self, expr: &str, offset: TimeValue) -> Result<StartOutcome> {
        let now = Utc::now();
        let target = self.store.resolve(expr)?;
        let stopped = self.close_running(now, TimeValue::ZERO)?;
        self.store.task_mut(target).start_interval(now, offset)?;
        self.save()?;
        Ok(StartOutcome {
            stopped,
            started: target,
        })
    }

    /// Stops the running task, with `offset` shifting the stop time.
    pub fn stop(&mut self, offset: TimeValue) -> Result<StopOutcome> {
        let now = Utc::now();
        let Some(outcome) = self.close_running(now, offset)? else {
            bail!("no task is running");
        };
        self.save()?;
        Ok(outcome)
    }

    /// Moves the current task to the resolution of `expr`.
    ///
    /// The cursor itself is not persisted, but resolution may have grown
    /// the tree, so the store is saved.
    pub fn change_current(&mut self, expr: &str) -> Result<TaskId> {
        let id = self.store.change_current(expr)?;
        self.save()?;
        Ok(id)
    }

    /// Removes the task at `expr`, returning its path and what the
    /// removal accomplished.
    pub fn remove(&mut self, expr: &str) -> Result<(String, Removal)> {
        let now = Utc::now();
        let target = self.store.resolve(expr)?;
        let path = self.store.task(target).path().to_string();
        let removal = self.store.remove(expr, now)?;
        self.save()?;
        Ok((path, removal))
    }

    /// Sets the description of the task at `expr`.
    pub fn describe(&mut self, expr: &str, text: &str) -> Result<TaskId> {
        let id = self.store.resolve(expr)?;
        self.store.task_mut(id).set_description(text);
        self.save()?;
        Ok(id)
    }

    fn close_running(
        &mut self,
        now: DateTime<Utc>,
        offset: TimeValue,
    ) -> Result<Option<StopOutcome>> {
        let Some(id) = self.store.find_running() else {
            return Ok(None);
        };
        self.store.task_mut(id).stop_interval(now, offset)?;
        let recorded = self
            .store
            .task(id)
            .intervals()
            .last()
            .map_or(TimeValue::ZERO, |interval| interval.duration(now));
        Ok(Some(StopOutcome { task: id, recorded }))
    }

    fn save(&self) -> Result<()> {
        self.store
            .save(&self.path)
            .with_context(|| format!("failed to save {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "store saved");
        Ok(())
    }
}
