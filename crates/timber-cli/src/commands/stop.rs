//! Stop command: close the running interval.

use std::io::Write;

use anyhow::Result;
use timber_core::TimeValue;

use crate::Session;

pub fn run<W: Write>(writer: &mut W, session: &mut Session, offset: TimeValue) -> Result<()> {
    let outcome = session.stop(offset)?;
    let task = session.store().task(outcome.task);
    writeln!(writer, "Stopped {} after {}", task.path(), outcome.recorded)?;
    Ok(())
}
