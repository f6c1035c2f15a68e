//! Start command: begin tracking a task.

use std::io::Write;

use anyhow::Result;
use timber_core::TimeValue;

use crate::Session;

pub fn run<W: Write>(
    writer: &mut W,
    session: &mut Session,
    expr: &str,
    offset: TimeValue,
) -> Result<()> {
    let outcome = session.start(expr, offset)?;

    if let Some(stopped) = outcome.stopped {
        let task = session.store().task(stopped.task);
        writeln!(writer, "Stopped {} after {}", task.path(), stopped.recorded)?;
    }
    let task = session.store().task(outcome.started);
    writeln!(writer, "Started {}", task.path())?;

    Ok(())
}
