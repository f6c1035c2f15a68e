//! Core domain logic for the timber task tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Time values: signed second counts parsed from and rendered in
//!   human units
//! - Intervals: start/stop pairs recorded against tasks
//! - The task tree: a slash-addressed hierarchy with auto-vivifying
//!   path resolution, subtree removal, and JSON persistence

mod error;
mod interval;
mod store;
mod task;
mod timevalue;

pub use error::{Error, Result};
pub use interval::Interval;
pub use store::{Removal, SEPARATOR, Store, TaskRecord};
pub use task::{Task, TaskId, merge_intervals};
pub use timevalue::TimeValue;
