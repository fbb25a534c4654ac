//! External command execution for rebuilder.
//!
//! Every external program (git, the submission tool, the watch tool) is run
//! through the [`Runner`] trait so the orchestration logic can be exercised
//! against a scripted runner in tests. [`SystemRunner`] is the real
//! implementation.
//!
//! Spawn failures are reported as [`RebuildError::CommandError`]. A program
//! that runs and exits non-zero is not an error at this layer; callers decide
//! what a non-zero exit means. Captured commands run under a shell or the
//! `script` wrapper, so a missing captured program usually shows up as exit
//! status 127 rather than a spawn failure.

use crate::config::CaptureConfig;
use crate::error::{RebuildError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Result of a command run with captured stdout/stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output (trimmed).
    pub stdout: String,
    /// Standard error (trimmed).
    pub stderr: String,
    /// Exit code, or -1 when the process was killed by a signal.
    pub exit_code: i32,
}

impl CommandOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        }
    }

    /// Returns true if the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Combined console output of a command, split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedRun {
    pub lines: Vec<String>,
    pub exit_code: i32,
}

/// Capability to run external programs.
pub trait Runner {
    /// Run a program with stdout and stderr captured.
    fn output(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run a program attached to the terminal and return its exit code.
    fn status(&self, program: &str, args: &[&str]) -> Result<i32>;

    /// Run a program while recording its combined console output.
    ///
    /// The output is still shown to the operator; the returned lines are a
    /// copy of what was printed, with stdout and stderr interleaved in the
    /// order the program wrote them.
    fn capture(&self, program: &str, args: &[&str]) -> Result<CapturedRun>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cwd: PathBuf,
    capture: CaptureConfig,
}

impl SystemRunner {
    /// Create a runner that executes commands in `cwd`.
    pub fn new<P: AsRef<Path>>(cwd: P, capture: CaptureConfig) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            capture,
        }
    }

    fn command(&self, program: &str, args: &[&str]) -> Command {
        let mut command = Command::new(program);
        command.current_dir(&self.cwd).args(args);
        command
    }

    /// Run the command inside a pseudo-terminal via `script`, which writes
    /// everything the command prints into a scratch file.
    fn capture_with_pty(&self, program: &str, args: &[&str]) -> Result<CapturedRun> {
        let log_file = tempfile::NamedTempFile::new().map_err(|e| {
            RebuildError::CommandError(format!("failed to create capture file: {}", e))
        })?;

        let quoted = shell_command(program, args);
        let log_path = log_file.path().to_string_lossy().to_string();

        tracing::debug!(wrapper = %self.capture.wrapper, log = %log_path, command = %quoted, "capturing through pty");

        let status = self
            .command(&self.capture.wrapper, &["-q", "-e", &log_path, "-c", &quoted])
            .status()
            .map_err(|e| {
                RebuildError::CommandError(format!(
                    "failed to execute {} (needed to capture '{}'): {}",
                    self.capture.wrapper, program, e
                ))
            })?;

        let mut raw = Vec::new();
        log_file
            .reopen()
            .and_then(|mut file| file.read_to_end(&mut raw))
            .map_err(|e| {
                RebuildError::CommandError(format!(
                    "failed to read captured output of '{}': {}",
                    program, e
                ))
            })?;

        Ok(CapturedRun {
            lines: split_lines(&raw),
            exit_code: status.code().unwrap_or(-1),
        })
    }

    /// Run the command through `sh` with stderr redirected into stdout, so
    /// both streams share one pipe and keep their relative order.
    fn capture_piped(&self, program: &str, args: &[&str]) -> Result<CapturedRun> {
        let script = format!("{} 2>&1", shell_command(program, args));
        tracing::debug!(command = %script, "capturing through pipe");

        let output = self
            .command("sh", &["-c", &script])
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| spawn_error("sh", e))?;

        // Piped output never reaches the terminal on its own.
        print!("{}", String::from_utf8_lossy(&output.stdout));

        Ok(CapturedRun {
            lines: split_lines(&output.stdout),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

impl Runner for SystemRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self
            .command(program, args)
            .output()
            .map_err(|e| spawn_error(program, e))?;
        let output = CommandOutput::from_output(&output);
        tracing::debug!(program, ?args, exit_code = output.exit_code, "command finished");
        Ok(output)
    }

    fn status(&self, program: &str, args: &[&str]) -> Result<i32> {
        let status = self
            .command(program, args)
            .status()
            .map_err(|e| spawn_error(program, e))?;
        let exit_code = status.code().unwrap_or(-1);
        tracing::debug!(program, ?args, exit_code, "command finished");
        Ok(exit_code)
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<CapturedRun> {
        let captured = if self.capture.pty {
            self.capture_with_pty(program, args)?
        } else {
            self.capture_piped(program, args)?
        };
        tracing::debug!(
            program,
            lines = captured.lines.len(),
            exit_code = captured.exit_code,
            "captured command output"
        );
        Ok(captured)
    }
}

fn spawn_error(program: &str, e: std::io::Error) -> RebuildError {
    RebuildError::CommandError(format!(
        "failed to execute {}: {}\nFix: ensure the command is installed and in PATH.",
        program, e
    ))
}

/// Quote `program` and `args` into a single shell command line.
fn shell_command(program: &str, args: &[&str]) -> String {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(program);
    words.extend_from_slice(args);
    shell_words::join(words)
}

fn split_lines(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(|line| line.to_string())
        .collect()
}
