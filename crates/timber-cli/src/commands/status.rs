//! Status command: show the running task and the recorded total.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use timber_core::TimeValue;

use crate::Session;

pub fn run<W: Write>(writer: &mut W, session: &Session) -> Result<()> {
    let store = session.store();
    let now = Utc::now();

    match store.find_running() {
        Some(id) => {
            let task = store.task(id);
            let open_for = task
                .intervals()
                .last()
                .map_or(TimeValue::ZERO, |interval| interval.duration(now));
            writeln!(writer, "Tracking {} for {}", task.path(), open_for)?;
        }
        None => writeln!(writer, "No task is running.")?,
    }

    writeln!(writer, "Current task: {}", store.task(store.current()).path())?;
    writeln!(
        writer,
        "Recorded total: {}",
        store.hours_all(store.root(), now)
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn status_of_an_empty_store_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(dir.path().join("tasks.json"));

        let mut output = Vec::new();
        run(&mut output, &session).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        No task is running.
        Current task: /
        Recorded total: 0.0s
        ");
    }

    #[test]
    fn status_names_the_running_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(dir.path().join("tasks.json"));
        session.start("work/report", TimeValue::ZERO).unwrap();

        let mut output = Vec::new();
        run(&mut output, &session).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Tracking /work/report/ for"), "got: {output}");
        // Starting did not move the cursor.
        assert!(output.contains("Current task: /\n"), "got: {output}");
    }
}
