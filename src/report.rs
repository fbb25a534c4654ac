//! Progress reporting.
//!
//! The orchestration code emits structured [`Event`]s through the
//! [`Reporter`] trait and never formats terminal output itself.
//! [`ConsoleReporter`] is the presentation layer: it echoes every action
//! before it runs (dimmed, shell-prompt style) and colors outcomes.

use std::ffi::OsString;
use std::fmt;

const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

/// Whether output should be colored.
///
/// `--no-color` always wins. Otherwise a non-empty `NO_COLOR` value turns
/// color off; an empty one is ignored.
pub fn color_enabled(no_color_flag: bool, no_color_env: Option<OsString>) -> bool {
    !no_color_flag && no_color_env.filter(|v| !v.is_empty()).is_none()
}

/// Something the operator should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The working tree is about to switch to `branch`.
    BranchSwitch { branch: String },
    /// `branch` differs from `reference` and is about to be reset to it.
    RebaseReset { branch: String, reference: String },
    /// An external command is about to run.
    CommandRun { program: String, args: Vec<String> },
    /// The watch tool is about to wait on `task_ids`.
    WatchRun { tool: String, task_ids: Vec<String> },
    Info(String),
    Warning(String),
    Error(String),
}

impl Event {
    pub fn command(program: &str, args: &[&str]) -> Self {
        Event::CommandRun {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn is_echo(&self) -> bool {
        matches!(
            self,
            Event::BranchSwitch { .. }
                | Event::RebaseReset { .. }
                | Event::CommandRun { .. }
                | Event::WatchRun { .. }
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::BranchSwitch { branch } => write!(f, "$ git checkout {}", branch),
            Event::RebaseReset { reference, .. } => write!(f, "$ git reset --hard {}", reference),
            Event::CommandRun { program, args } => {
                write!(f, "$ {}", program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Event::WatchRun { tool, task_ids } => {
                write!(f, "$ {} watch-task {}", tool, task_ids.join(" "))
            }
            Event::Info(message) | Event::Warning(message) | Event::Error(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

/// Sink for progress events.
pub trait Reporter {
    fn report(&self, event: Event);

    fn info(&self, message: &str) {
        self.report(Event::Info(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.report(Event::Warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.report(Event::Error(message.to_string()));
    }
}

/// Renders events to the terminal.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Format `event` the way it is printed.
    pub fn render(&self, event: &Event) -> String {
        let text = event.to_string();
        if !self.color {
            return text;
        }

        let color = match event {
            Event::Info(_) => GREEN,
            Event::Warning(_) => YELLOW,
            Event::Error(_) => RED,
            _ => DIM,
        };
        format!("{}{}{}", color, text, RESET)
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: Event) {
        let line = self.render(&event);
        if event.is_echo() || matches!(event, Event::Info(_)) {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }
}
