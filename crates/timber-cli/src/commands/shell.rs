//! The interactive shell.
//!
//! A static verb table maps each command name to its usage line, a
//! one-line summary, an argument arity, and a handler. Unknown verbs
//! print the table; a handler error aborts only the offending line.

use std::io::{BufRead, Write};

use anyhow::Result;
use timber_core::TimeValue;

use super::{describe, remove, start, status, stop, tree};
use crate::Session;

/// Whether the loop keeps reading after a verb.
enum Outcome {
    Continue,
    Exit,
}

type Handler = fn(&mut dyn Write, &mut Session, &[&str]) -> Result<Outcome>;

struct Verb {
    name: &'static str,
    usage: &'static str,
    summary: &'static str,
    /// Minimum and maximum argument counts.
    arity: (usize, usize),
    handler: Handler,
}

static VERBS: &[Verb] = &[
    Verb {
        name: "start",
        usage: "start [path] [offset]",
        summary: "Start a task, stopping the running one",
        arity: (0, 2),
        handler: verb_start,
    },
    Verb {
        name: "stop",
        usage: "stop [offset]",
        summary: "Stop the running task",
        arity: (0, 1),
        handler: verb_stop,
    },
    Verb {
        name: "status",
        usage: "status",
        summary: "Show the running task and totals",
        arity: (0, 0),
        handler: verb_status,
    },
    Verb {
        name: "cd",
        usage: "cd [path]",
        summary: "Change the current task",
        arity: (0, 1),
        handler: verb_cd,
    },
    Verb {
        name: "ls",
        usage: "ls [path]",
        summary: "List a task and its children",
        arity: (0, 1),
        handler: verb_ls,
    },
    Verb {
        name: "tree",
        usage: "tree [path]",
        summary: "Render a subtree with durations",
        arity: (0, 1),
        handler: verb_tree,
    },
    Verb {
        name: "rm",
        usage: "rm <path>",
        summary: "Remove a task, folding its time into the parent",
        arity: (1, 1),
        handler: verb_rm,
    },
    Verb {
        name: "describe",
        usage: "describe <path> <text...>",
        summary: "Set a task's description",
        arity: (2, usize::MAX),
        handler: verb_describe,
    },
    Verb {
        name: "help",
        usage: "help",
        summary: "Show this listing",
        arity: (0, 0),
        handler: verb_help,
    },
    Verb {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell",
        arity: (0, 0),
        handler: verb_exit,
    },
    Verb {
        name: "quit",
        usage: "quit",
        summary: "Leave the shell",
        arity: (0, 0),
        handler: verb_exit,
    },
];

/// Reads verbs from `reader` until `exit`, `quit`, or end of input.
pub fn run<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    session: &mut Session,
) -> Result<()> {
    loop {
        write!(writer, "> ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer, "Bye!")?;
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            continue;
        };

        match execute(writer, session, name, args) {
            Ok(Outcome::Exit) => break,
            Ok(Outcome::Continue) => {}
            Err(error) => writeln!(writer, "{error}")?,
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn execute<W: Write>(
    writer: &mut W,
    session: &mut Session,
    name: &str,
    args: &[&str],
) -> Result<Outcome> {
    let Some(verb) = VERBS.iter().find(|verb| verb.name == name) else {
        writeln!(writer, "{name} not found in this scope.")?;
        print_verbs(writer)?;
        return Ok(Outcome::Continue);
    };

    let (min, max) = verb.arity;
    if args.len() < min || args.len() > max {
        writeln!(writer, "usage: {}", verb.usage)?;
        return Ok(Outcome::Continue);
    }

    (verb.handler)(writer, session, args)
}

fn print_verbs(writer: &mut dyn Write) -> std::io::Result<()> {
    writeln!(writer, "Existing names:")?;
    for verb in VERBS {
        writeln!(writer, "  `{}`: {}", verb.usage, verb.summary)?;
    }
    Ok(())
}

/// The offset token at `index`, zero when absent.
fn offset_arg(args: &[&str], index: usize) -> Result<TimeValue> {
    match args.get(index) {
        Some(token) => Ok(token.parse()?),
        None => Ok(TimeValue::ZERO),
    }
}

// ========== Verb Handlers ==========

fn verb_start(mut writer: &mut dyn Write, session: &mut Session, args: &[&str]) -> Result<Outcome> {
    let expr = args.first().copied().unwrap_or("");
    let offset = offset_arg(args, 1)?;
    start::run(&mut writer, session, expr, offset)?;
    Ok(Outcome::Continue)
}

fn verb_stop(mut writer: &mut dyn Write, session: &mut Session, args: &[&str]) -> Result<Outcome> {
    let offset = offset_arg(args, 0)?;
    stop::run(&mut writer, session, offset)?;
    Ok(Outcome::Continue)
}

fn verb_status(
    mut writer: &mut dyn Write,
    session: &mut Session,
    _args: &[&str],
) -> Result<Outcome> {
    status::run(&mut writer, session)?;
    Ok(Outcome::Continue)
}

fn verb_cd(writer: &mut dyn Write, session: &mut Session, args: &[&str]) -> Result<Outcome> {
    let expr = args.first().copied().unwrap_or("/");
    let id = session.change_current(expr)?;
    writeln!(writer, "{}", session.store().task(id).path())?;
    Ok(Outcome::Continue)
}

fn verb_ls(writer: &mut dyn Write, session: &mut Session, args: &[&str]) -> Result<Outcome> {
    let expr = args.first().copied().unwrap_or("");
    let id = session.resolve(expr)?;
    let store = session.store();
    let task = store.task(id);
    writeln!(writer, "{task}")?;
    for &child in task.children() {
        writeln!(writer, "  {}", store.task(child))?;
    }
    Ok(Outcome::Continue)
}

fn verb_tree(mut writer: &mut dyn Write, session: &mut Session, args: &[&str]) -> Result<Outcome> {
    let expr = args.first().copied().unwrap_or("");
    tree::run(&mut writer, session, expr)?;
    Ok(Outcome::Continue)
}

fn verb_rm(mut writer: &mut dyn Write, session: &mut Session, args: &[&str]) -> Result<Outcome> {
    remove::run(&mut writer, session, args[0])?;
    Ok(Outcome::Continue)
}

fn verb_describe(
    mut writer: &mut dyn Write,
    session: &mut Session,
    args: &[&str],
) -> Result<Outcome> {
    let text = args[1..].join(" ");
    describe::run(&mut writer, session, args[0], &text)?;
    Ok(Outcome::Continue)
}

fn verb_help(writer: &mut dyn Write, _session: &mut Session, _args: &[&str]) -> Result<Outcome> {
    print_verbs(writer)?;
    Ok(Outcome::Continue)
}

fn verb_exit(writer: &mut dyn Write, _session: &mut Session, _args: &[&str]) -> Result<Outcome> {
    writeln!(writer, "Bye!")?;
    Ok(Outcome::Exit)
}
