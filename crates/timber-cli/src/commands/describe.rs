//! Describe command: set a task's description.

use std::io::Write;

use anyhow::Result;

use crate::Session;

pub fn run<W: Write>(writer: &mut W, session: &mut Session, expr: &str, text: &str) -> Result<()> {
    let id = session.describe(expr, text)?;
    writeln!(writer, "Described {}", session.store().task(id))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_echoes_the_updated_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(dir.path().join("tasks.json"));

        let mut output = Vec::new();
        run(&mut output, &mut session, "work/report", "weekly status report").unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Described report (weekly status report)\n"
        );
    }

    #[test]
    fn describe_overwrites_an_earlier_description() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(dir.path().join("tasks.json"));
        run(&mut Vec::new(), &mut session, "errands", "first").unwrap();

        let mut output = Vec::new();
        run(&mut output, &mut session, "errands", "second").unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Described errands (second)\n"
        );
    }
}
