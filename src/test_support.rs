use crate::error::{RebuildError, Result};
use crate::process::{CapturedRun, CommandOutput, Runner};
use crate::report::{Event, Reporter};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

pub(crate) const FEDORA_URL: &str = "ssh://packager@pkgs.fedoraproject.org/rpms/rebuilder";

pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git_stdout(path, &["init"]);
    // Ensure the repo uses a deterministic default branch name across environments.
    // This sets HEAD to an unborn `main` branch before the first commit.
    git_stdout(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    // Configure git user for commits
    git_stdout(path, &["config", "user.email", "test@example.com"]);
    git_stdout(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    std::fs::write(path.join("package.spec"), "Version: 1\n").unwrap();
    git_stdout(path, &["add", "."]);
    git_stdout(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// Create a repo on `main` with `branches` created at the initial commit.
pub(crate) fn create_test_repo_with_branches(branches: &[&str]) -> TempDir {
    let temp_dir = create_test_repo();
    for branch in branches {
        git_stdout(temp_dir.path(), &["branch", branch]);
    }
    temp_dir
}

/// Run git in `repo_dir`, panicking on failure, and return trimmed stdout.
pub(crate) fn git_stdout(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[derive(Debug, Default)]
struct FakeState {
    current: String,
    contents: HashMap<String, String>,
    calls: Vec<String>,
}

/// Scripted stand-in for git and the build tools.
///
/// Simulates a working tree where each branch has a single content string,
/// so diffs and hard resets can be observed. Every invocation is recorded as
/// `"<program> <args...> @<current branch>"`.
#[derive(Debug)]
pub(crate) struct FakeRunner {
    state: RefCell<FakeState>,
    tracked_remote: String,
    remotes: HashMap<String, String>,
    untracked: HashSet<String>,
    checkout_failures: HashSet<String>,
    submissions: HashMap<String, Vec<String>>,
    submission_exits: HashMap<String, i32>,
    unrunnable_submissions: HashSet<String>,
    mock_exits: HashMap<String, i32>,
    watch_exit: i32,
    push_exit: i32,
}

impl FakeRunner {
    /// A repo with `current` checked out, tracking a Fedora dist-git remote.
    pub(crate) fn new(current: &str) -> Self {
        let state = FakeState {
            current: current.to_string(),
            contents: HashMap::from([(current.to_string(), "base".to_string())]),
            calls: Vec::new(),
        };
        Self {
            state: RefCell::new(state),
            tracked_remote: "origin".to_string(),
            remotes: HashMap::from([("origin".to_string(), FEDORA_URL.to_string())]),
            untracked: HashSet::new(),
            checkout_failures: HashSet::new(),
            submissions: HashMap::new(),
            submission_exits: HashMap::new(),
            unrunnable_submissions: HashSet::new(),
            mock_exits: HashMap::new(),
            watch_exit: 0,
            push_exit: 0,
        }
    }

    /// Make every branch track `name`, whose URL is `url`.
    pub(crate) fn with_remote(mut self, name: &str, url: &str) -> Self {
        self.remotes.insert(name.to_string(), url.to_string());
        self.tracked_remote = name.to_string();
        self
    }

    pub(crate) fn with_untracked(mut self, branch: &str) -> Self {
        self.untracked.insert(branch.to_string());
        self
    }

    pub(crate) fn with_branch(self, branch: &str, content: &str) -> Self {
        self.state
            .borrow_mut()
            .contents
            .insert(branch.to_string(), content.to_string());
        self
    }

    pub(crate) fn with_checkout_failure(mut self, branch: &str) -> Self {
        self.checkout_failures.insert(branch.to_string());
        self
    }

    /// Console output printed by a submission made from `branch`.
    pub(crate) fn with_submission(mut self, branch: &str, lines: &[&str]) -> Self {
        self.submissions.insert(
            branch.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    pub(crate) fn with_submission_exit(mut self, branch: &str, code: i32) -> Self {
        self.submission_exits.insert(branch.to_string(), code);
        self
    }

    /// Submissions from `branch` fail to start, as if the tool were missing.
    pub(crate) fn with_unrunnable_submission(mut self, branch: &str) -> Self {
        self.unrunnable_submissions.insert(branch.to_string());
        self
    }

    pub(crate) fn with_mock_exit(mut self, branch: &str, code: i32) -> Self {
        self.mock_exits.insert(branch.to_string(), code);
        self
    }

    pub(crate) fn with_watch_exit(mut self, code: i32) -> Self {
        self.watch_exit = code;
        self
    }

    pub(crate) fn with_push_exit(mut self, code: i32) -> Self {
        self.push_exit = code;
        self
    }

    pub(crate) fn current_branch(&self) -> String {
        self.state.borrow().current.clone()
    }

    pub(crate) fn content(&self, branch: &str) -> String {
        self.state.borrow().contents[branch].clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn reset_count(&self) -> usize {
        self.calls_starting_with("git reset --hard")
    }

    pub(crate) fn calls_starting_with(&self, prefix: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, program: &str, args: &[&str]) -> String {
        let mut state = self.state.borrow_mut();
        let mut call = program.to_string();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        call.push_str(" @");
        call.push_str(&state.current);
        state.calls.push(call);
        state.current.clone()
    }

    fn git(&self, args: &[&str]) -> CommandOutput {
        let mut state = self.state.borrow_mut();
        match args {
            ["rev-parse", "--abbrev-ref", "HEAD"] => ok(&state.current),
            ["checkout", branch] => {
                if self.checkout_failures.contains(*branch) {
                    failed(1, "error: Your local changes would be overwritten by checkout")
                } else if state.contents.contains_key(*branch) {
                    state.current = branch.to_string();
                    ok("")
                } else {
                    failed(
                        1,
                        &format!("error: pathspec '{}' did not match any file(s)", branch),
                    )
                }
            }
            ["diff", a, b] => {
                if state.contents.get(*a) == state.contents.get(*b) {
                    ok("")
                } else {
                    ok("diff --git a/package.spec b/package.spec")
                }
            }
            ["reset", "--hard", reference] => {
                let Some(content) = state.contents.get(*reference).cloned() else {
                    return failed(128, "fatal: ambiguous argument");
                };
                let current = state.current.clone();
                state.contents.insert(current, content);
                ok("")
            }
            ["config", "--get", key] => {
                let branch = key
                    .strip_prefix("branch.")
                    .and_then(|k| k.strip_suffix(".remote"))
                    .unwrap_or("");
                if self.untracked.contains(branch) || !state.contents.contains_key(branch) {
                    failed(1, "")
                } else {
                    ok(&self.tracked_remote)
                }
            }
            ["remote", "get-url", name] => match self.remotes.get(*name) {
                Some(url) => ok(url),
                None => failed(2, &format!("error: No such remote '{}'", name)),
            },
            _ => ok(""),
        }
    }
}

fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: 0,
    }
}

fn failed(exit_code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        stdout: String::new(),
        stderr: stderr.to_string(),
        exit_code,
    }
}

impl Runner for FakeRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        self.record(program, args);
        if program == "git" {
            Ok(self.git(args))
        } else {
            Ok(ok(""))
        }
    }

    fn status(&self, program: &str, args: &[&str]) -> Result<i32> {
        let current = self.record(program, args);
        let code = match (program, args.first().copied()) {
            ("git", Some("push")) => self.push_exit,
            (_, Some("mockbuild")) => self.mock_exits.get(&current).copied().unwrap_or(0),
            (_, Some("watch-task")) => self.watch_exit,
            _ => 0,
        };
        Ok(code)
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<CapturedRun> {
        let current = self.record(program, args);
        if self.unrunnable_submissions.contains(&current) {
            return Err(RebuildError::CommandError(format!(
                "failed to execute {}: No such file or directory (os error 2)",
                program
            )));
        }
        Ok(CapturedRun {
            lines: self.submissions.get(&current).cloned().unwrap_or_default(),
            exit_code: self.submission_exits.get(&current).copied().unwrap_or(0),
        })
    }
}

/// Reporter that keeps every event for inspection.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: RefCell<Vec<Event>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Rendered action echoes, in order.
    pub(crate) fn echoes(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.is_echo())
            .map(|e| e.to_string())
            .collect()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.collect(|e| matches!(e, Event::Error(_)))
    }

    pub(crate) fn warnings(&self) -> Vec<String> {
        self.collect(|e| matches!(e, Event::Warning(_)))
    }

    fn collect(&self, keep: impl Fn(&Event) -> bool) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|e| keep(e))
            .map(|e| e.to_string())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}
