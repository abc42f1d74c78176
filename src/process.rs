//! Command execution with merged environments and captured output.
//!
//! Processes are always spawned from discrete argv tokens; the rendered
//! command string exists only for log display.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use crate::command::CommandSpec;

/// Sink for incremental log text.
pub trait LogSink {
    fn append(&mut self, text: &str);
}

/// Writes log text straight to stdout.
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn append(&mut self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }
}

/// Buffers log text in memory. Used by tests and capture-minded callers.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub text: String,
}

impl LogSink for BufferSink {
    fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// Exit status and captured output of a finished process.
///
/// A nonzero exit code is not an error at this layer; the caller decides
/// whether it is fatal. `success()` looks at the exit code and nothing else.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    code: i32,
    stdout: Option<String>,
    stderr: Option<String>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Exit code, or -1 if the process was terminated by a signal.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Captured stdout, empty when the run streamed instead of capturing.
    pub fn stdout(&self) -> &str {
        self.stdout.as_deref().unwrap_or("")
    }

    /// Captured stderr, empty when nothing was captured.
    pub fn stderr(&self) -> &str {
        self.stderr.as_deref().unwrap_or("")
    }
}

/// The external process could not be started, or waiting on it failed.
///
/// Distinct from a process that ran and exited nonzero - that is a normal
/// `ExecutionResult`.
#[derive(Debug)]
pub struct LaunchError {
    command: String,
    source: io::Error,
}

impl LaunchError {
    fn new(command: String, source: io::Error) -> Self {
        Self { command, source }
    }

    /// The rendered command text that failed to launch.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to launch <{}>: {}", self.command, self.source)
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Runs command specs with a base environment plus per-run overrides.
///
/// The merged environment is computed once per invocation; override values
/// win on key collision. Children see only the merged map.
pub struct Executor {
    base_env: HashMap<String, String>,
    overrides: HashMap<String, String>,
    current_dir: Option<PathBuf>,
}

impl Executor {
    pub fn new(base_env: HashMap<String, String>) -> Self {
        Self {
            base_env,
            overrides: HashMap::new(),
            current_dir: None,
        }
    }

    /// Snapshot the host process environment as the base map.
    pub fn from_host_env() -> Self {
        Self::new(std::env::vars().collect())
    }

    /// Layer a per-run variable over the base environment.
    pub fn override_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(key.into(), value.into());
    }

    /// Set the working directory children are spawned in.
    pub fn set_dir(&mut self, dir: &Path) {
        self.current_dir = Some(dir.to_path_buf());
    }

    fn merged_env(&self) -> HashMap<String, String> {
        let mut env = self.base_env.clone();
        for (key, value) in &self.overrides {
            env.insert(key.clone(), value.clone());
        }
        env
    }

    fn prepare(&self, tokens: &[String]) -> Command {
        let mut cmd = match tokens.split_first() {
            Some((program, args)) => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            None => Command::new(""),
        };
        cmd.env_clear();
        cmd.envs(self.merged_env());
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Run a command spec, streaming child stdout into the sink as it
    /// arrives. Stderr is drained on a helper thread so neither pipe can
    /// fill up and stall the child, then appended to the sink after exit.
    pub fn run_streamed(
        &self,
        spec: &CommandSpec,
        sink: &mut dyn LogSink,
    ) -> Result<ExecutionResult, LaunchError> {
        self.stream(spec.tokens(), spec.render(), sink)
    }

    /// Run a command spec, buffering stdout and stderr fully.
    pub fn run_captured(&self, spec: &CommandSpec) -> Result<ExecutionResult, LaunchError> {
        let mut cmd = self.prepare(&spec.tokens());
        let output = cmd
            .output()
            .map_err(|e| LaunchError::new(spec.render(), e))?;

        Ok(ExecutionResult {
            code: output.status.code().unwrap_or(-1),
            stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
        })
    }

    /// Run a raw command line, split on whitespace, streaming output into
    /// the sink. No shell is involved: the first word is the program, the
    /// rest are literal arguments.
    pub fn run_line(
        &self,
        line: &str,
        sink: &mut dyn LogSink,
    ) -> Result<ExecutionResult, LaunchError> {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        self.stream(tokens, line.to_string(), sink)
    }

    fn stream(
        &self,
        tokens: Vec<String>,
        rendered: String,
        sink: &mut dyn LogSink,
    ) -> Result<ExecutionResult, LaunchError> {
        let mut cmd = self.prepare(&tokens);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| LaunchError::new(rendered.clone(), e))?;

        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = BufReader::new(stderr).read_to_string(&mut buf);
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line.map_err(|e| LaunchError::new(rendered.clone(), e))?;
                sink.append(&line);
                sink.append("\n");
            }
        }

        let status = child
            .wait()
            .map_err(|e| LaunchError::new(rendered.clone(), e))?;

        let stderr_text = stderr_thread
            .and_then(|t| t.join().ok())
            .unwrap_or_default();
        if !stderr_text.is_empty() {
            sink.append(&stderr_text);
        }

        Ok(ExecutionResult {
            code: status.code().unwrap_or(-1),
            stdout: None,
            stderr: Some(stderr_text),
        })
    }
}
