//! Shared test utilities for rpmforge tests.
//!
//! Builds run against fake spectool/mock executables: small shell scripts
//! that record their argv in a calls log, optionally drop artifacts into
//! the workspace, and exit with a chosen code.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use rpmforge::config::{BuildRequest, Settings};
use rpmforge::pipeline::{BuildPipeline, PipelineStatus};
use rpmforge::process::{BufferSink, Executor};
use rpmforge::workspace::Workspace;

/// Test environment with a temporary workspace and a call-recording log.
pub struct TestEnv {
    /// Temporary directory (kept alive for the lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Workspace the pipeline runs in
    pub workspace: PathBuf,
    /// File the fake tools append their invocations to
    pub calls_log: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path();

        let workspace = base.join("workspace");
        fs::create_dir_all(&workspace).expect("Failed to create workspace dir");
        let calls_log = base.join("calls.log");

        Self {
            _temp_dir: temp_dir,
            workspace,
            calls_log,
        }
    }

    /// Create a fake tool script that records `<name> <argv>` in the calls
    /// log, runs `extra` shell lines, and exits with `exit_code`.
    pub fn fake_tool(&self, name: &str, extra: &str, exit_code: i32) -> PathBuf {
        let bin_dir = self._temp_dir.path().join("bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");

        let path = bin_dir.join(name);
        let script = format!(
            "#!/bin/sh\nprintf '%s %s\\n' '{}' \"$*\" >> '{}'\n{}\nexit {}\n",
            name,
            self.calls_log.display(),
            extra,
            exit_code
        );
        fs::write(&path, script).expect("Failed to write fake tool");

        let mut perms = fs::metadata(&path)
            .expect("Failed to stat fake tool")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod fake tool");
        path
    }

    /// Fake spectool that only records its invocation.
    pub fn spectool(&self, exit_code: i32) -> PathBuf {
        self.fake_tool("spectool", "", exit_code)
    }

    /// Fake mock that drops the given file names into SRPMS/ on every run.
    pub fn mock_creating(&self, srpm_files: &[&str], exit_code: i32) -> PathBuf {
        let srpm_dir = self.workspace.join("SRPMS");
        let mut extra = format!("mkdir -p '{}'\n", srpm_dir.display());
        for file in srpm_files {
            extra.push_str(&format!("touch '{}'\n", srpm_dir.join(file).display()));
        }
        self.fake_tool("mock", &extra, exit_code)
    }

    /// Settings pointing at the given fake tools.
    pub fn settings(&self, mock: &Path, spectool: &Path) -> Settings {
        Settings {
            mock_cmd: mock.display().to_string(),
            spectool_cmd: spectool.display().to_string(),
        }
    }

    /// The recorded tool invocations, in call order.
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(&self.calls_log) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// A request for `pkg.spec` with the defaults tests start from.
    pub fn request(&self) -> BuildRequest {
        BuildRequest {
            spec_file: "pkg.spec".to_string(),
            profile: "test-profile".to_string(),
            ..Default::default()
        }
    }

    /// Run the pipeline against this workspace, returning the status and
    /// the text written to the log sink.
    pub fn run(&self, settings: &Settings, request: &BuildRequest) -> (PipelineStatus, String) {
        self.run_with_executor(settings, request, Executor::from_host_env())
    }

    /// Same as `run`, with a caller-configured executor.
    pub fn run_with_executor(
        &self,
        settings: &Settings,
        request: &BuildRequest,
        executor: Executor,
    ) -> (PipelineStatus, String) {
        let pipeline = BuildPipeline::new(
            settings,
            request,
            Workspace::new(&self.workspace),
            executor,
        );
        let mut sink = BufferSink::default();
        let status = pipeline.run(&mut sink);
        (status, sink.text)
    }
}
