//! Tree command: render a subtree with recorded durations.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use timber_core::{Store, TaskId};

use crate::Session;

pub fn run<W: Write>(writer: &mut W, session: &mut Session, expr: &str) -> Result<()> {
    let id = session.resolve(expr)?;
    render(writer, session.store(), id, Utc::now())
}

/// One line per task: name, description, own time, subtree total, and a
/// running marker. Children indent two spaces per level.
fn render<W: Write>(writer: &mut W, store: &Store, id: TaskId, now: DateTime<Utc>) -> Result<()> {
    render_level(writer, store, id, now, 0)
}

fn render_level<W: Write>(
    writer: &mut W,
    store: &Store,
    id: TaskId,
    now: DateTime<Utc>,
    depth: usize,
) -> Result<()> {
    let task = store.task(id);
    let marker = if task.is_running() { "  [running]" } else { "" };
    writeln!(
        writer,
        "{:indent$}{task}  {} own / {} total{marker}",
        "",
        task.hours(now),
        store.hours_all(id, now),
        indent = depth * 2,
    )?;
    for &child in task.children() {
        render_level(writer, store, child, now, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};
    use insta::assert_snapshot;
    use timber_core::TimeValue;

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::minutes(minutes)
    }

    #[test]
    fn renders_nested_tasks_with_durations() {
        let mut store = Store::new();
        let work = store.resolve("/work").unwrap();
        let report = store.resolve("/work/report").unwrap();
        store.task_mut(work).set_description("client projects");
        store
            .task_mut(report)
            .start_interval(ts(0), TimeValue::ZERO)
            .unwrap();
        store
            .task_mut(report)
            .stop_interval(ts(30), TimeValue::ZERO)
            .unwrap();

        let mut output = Vec::new();
        render(&mut output, &store, store.root(), ts(60)).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        / ()  0.0s own / 30.0m total
          work (client projects)  0.0s own / 30.0m total
            report ()  30.0m own / 30.0m total
        ");
    }

    #[test]
    fn marks_the_running_task() {
        let mut store = Store::new();
        let work = store.resolve("/work").unwrap();
        store
            .task_mut(work)
            .start_interval(ts(0), TimeValue::ZERO)
            .unwrap();

        let mut output = Vec::new();
        render(&mut output, &store, store.root(), ts(90)).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        / ()  0.0s own / 1.5h total
          work ()  1.5h own / 1.5h total  [running]
        ");
    }

    #[test]
    fn renders_only_the_requested_subtree() {
        let mut store = Store::new();
        store.resolve("/work/report").unwrap();
        store.resolve("/errands").unwrap();
        let work = store.resolve("/work").unwrap();

        let mut output = Vec::new();
        render(&mut output, &store, work, ts(0)).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("work"));
        assert!(output.contains("report"));
        assert!(!output.contains("errands"));
    }
}
