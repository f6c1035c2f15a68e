//! Remove command: delete a subtree, keeping its recorded time.

use std::io::Write;

use anyhow::Result;

use crate::Session;

pub fn run<W: Write>(writer: &mut W, session: &mut Session, expr: &str) -> Result<()> {
    let (path, removal) = session.remove(expr)?;
    let noun = if removal.removed == 1 { "task" } else { "tasks" };
    writeln!(
        writer,
        "Removed {path}: {} {noun}, {} folded into the parent",
        removal.removed, removal.reclaimed
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_reports_count_and_reclaimed_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(dir.path().join("tasks.json"));
        session.resolve("work/report/draft").unwrap();

        let mut output = Vec::new();
        run(&mut output, &mut session, "work/report").unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Removed /work/report/: 2 tasks, 0.0s folded into the parent\n"
        );
    }

    #[test]
    fn removing_the_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(dir.path().join("tasks.json"));

        let mut output = Vec::new();
        let err = run(&mut output, &mut session, "/").unwrap_err();
        assert!(err.to_string().contains("root task"));
    }

    #[test]
    fn a_singleton_removal_uses_the_singular_noun() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(dir.path().join("tasks.json"));
        session.resolve("errands").unwrap();

        let mut output = Vec::new();
        run(&mut output, &mut session, "errands").unwrap();

        assert!(String::from_utf8(output).unwrap().contains("1 task,"));
    }
}
