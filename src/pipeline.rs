//! The build pipeline: download sources, build the source RPM, locate it,
//! rebuild the binary RPM.
//!
//! Steps run strictly in order and the first failure halts the pipeline.
//! Nothing is retried and partially built artifacts are left where the
//! tools put them; chroot cleanup is mock's business via its own flags.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::command::CommandSpec;
use crate::config::{sanitize_build_label, BuildRequest, RebuildStyle, Settings};
use crate::process::{Executor, LaunchError, LogSink};
use crate::tools::{MockCmd, SpectoolCmd};
use crate::workspace::Workspace;

/// Workspace subdirectory the downloaded sources land in.
pub const SOURCES_DIR: &str = "SOURCES";
/// Workspace subdirectory mock writes the source RPM to.
pub const SRPM_DIR: &str = "SRPMS";
/// Workspace subdirectory mock writes the binary RPMs to.
pub const RPM_DIR: &str = "RPMS";

/// Overall outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Success,
    Failure,
}

impl PipelineStatus {
    pub fn succeeded(self) -> bool {
        self == PipelineStatus::Success
    }
}

/// The pipeline steps, in execution order. Used in failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DownloadSources,
    BuildSrpm,
    LocateSrpm,
    RebuildRpm,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::DownloadSources => "source download",
            Step::BuildSrpm => "source RPM build",
            Step::LocateSrpm => "source RPM lookup",
            Step::RebuildRpm => "binary RPM rebuild",
        };
        write!(f, "{}", name)
    }
}

/// Why a pipeline step failed.
#[derive(Debug)]
pub enum StepError {
    /// The external tool could not be started or waited on.
    Launch { step: Step, source: LaunchError },
    /// The tool ran and exited nonzero.
    NonZeroExit { step: Step, code: i32 },
    /// No file in the result directory matched the source RPM pattern,
    /// or the directory is missing.
    ArtifactNotFound { dir: PathBuf, pattern: String },
    /// The request itself is unusable.
    Configuration { message: String },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Launch { step, source } => {
                write!(f, "{} failed: {}", step, source)
            }
            StepError::NonZeroExit { step, code } => {
                write!(f, "{} failed, exit code: {}", step, code)
            }
            StepError::ArtifactNotFound { dir, pattern } => {
                write!(
                    f,
                    "no source package found in {}, pattern used: {}",
                    dir.display(),
                    pattern
                )
            }
            StepError::Configuration { message } => {
                write!(f, "configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StepError::Launch { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One build, from spec file to binary RPMs.
pub struct BuildPipeline<'a> {
    settings: &'a Settings,
    request: &'a BuildRequest,
    workspace: Workspace,
    executor: Executor,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(
        settings: &'a Settings,
        request: &'a BuildRequest,
        workspace: Workspace,
        executor: Executor,
    ) -> Self {
        Self {
            settings,
            request,
            workspace,
            executor,
        }
    }

    /// Run every step in order. Step errors are caught here, written to
    /// the sink, and collapsed into the returned status; nothing
    /// propagates past this boundary.
    pub fn run(&self, sink: &mut dyn LogSink) -> PipelineStatus {
        match self.try_run(sink) {
            Ok(()) => {
                sink.append(&format!("Build finished, binary RPMs in {}/\n", RPM_DIR));
                PipelineStatus::Success
            }
            Err(e) => {
                sink.append(&format!("Build failed: {}\n", e));
                PipelineStatus::Failure
            }
        }
    }

    fn try_run(&self, sink: &mut dyn LogSink) -> Result<(), StepError> {
        let pattern = Regex::new(&self.request.srpm_pattern).map_err(|e| {
            StepError::Configuration {
                message: format!("invalid source RPM pattern: {}", e),
            }
        })?;

        let spec_file = self.workspace.join(&self.request.spec_file);
        let sources_dir = self.workspace.join(SOURCES_DIR);

        if self.request.download_sources {
            self.download_sources(&spec_file, &sources_dir, sink)?;
        }

        let srpm_dir = self.workspace.join(SRPM_DIR);
        self.build_srpm(&spec_file, &sources_dir, &srpm_dir, sink)?;

        let srpm = self.locate_srpm(&srpm_dir, &pattern)?;
        sink.append(&format!("Found source RPM: {}\n", srpm.display()));

        self.rebuild_rpm(&srpm, sink)
    }

    fn download_sources(
        &self,
        spec_file: &Path,
        sources_dir: &Path,
        sink: &mut dyn LogSink,
    ) -> Result<(), StepError> {
        // spectool refuses to download into a directory that is not there.
        self.workspace
            .ensure_dir(SOURCES_DIR)
            .map_err(|e| StepError::Configuration {
                message: format!("{:#}", e),
            })?;

        let mut tool = SpectoolCmd::source_downloader(
            &self.settings.spectool_cmd,
            &spec_file.display().to_string(),
            &sources_dir.display().to_string(),
        );
        if self.request.verbose {
            tool.set_verbose();
        }
        self.execute(Step::DownloadSources, tool.as_spec(), sink)
    }

    /// A fresh mock command for one phase, carrying the shared options.
    /// The unique chroot suffix is recomputed from the build label each
    /// time it is called.
    fn mock_cmd(&self) -> MockCmd {
        let mut mock = MockCmd::new(&self.settings.mock_cmd);
        if self.request.verbose {
            mock.set_verbose();
        }
        mock.set_profile(&self.request.profile);
        if let Some(ref dir) = self.request.config_dir {
            mock.set_config_dir(dir);
        }
        if self.request.unique_per_build {
            mock.set_unique_ext(&sanitize_build_label(&self.request.build_label));
        }
        if self.request.no_cleanup_after {
            mock.set_no_cleanup_after();
        }
        if self.request.no_clean {
            mock.set_no_clean();
        }
        mock
    }

    fn build_srpm(
        &self,
        spec_file: &Path,
        sources_dir: &Path,
        srpm_dir: &Path,
        sink: &mut dyn LogSink,
    ) -> Result<(), StepError> {
        let mut mock = self.mock_cmd();
        mock.setup_srpm_build(
            &srpm_dir.display().to_string(),
            &spec_file.display().to_string(),
            &sources_dir.display().to_string(),
        );
        self.execute(Step::BuildSrpm, mock.as_spec(), sink)
    }

    /// Find the built source RPM in the result directory.
    ///
    /// First file name matching the pattern wins; with more than one match
    /// the pick follows platform listing order, which is fine as long as
    /// the matches are equivalent.
    fn locate_srpm(&self, srpm_dir: &Path, pattern: &Regex) -> Result<PathBuf, StepError> {
        let not_found = || StepError::ArtifactNotFound {
            dir: srpm_dir.to_path_buf(),
            pattern: pattern.as_str().to_string(),
        };

        let files = self.workspace.list_files(SRPM_DIR).map_err(|_| not_found())?;
        for file in files {
            let matches = file
                .file_name()
                .map(|name| pattern.is_match(&name.to_string_lossy()))
                .unwrap_or(false);
            if matches {
                return Ok(file);
            }
        }
        Err(not_found())
    }

    fn rebuild_rpm(&self, srpm: &Path, sink: &mut dyn LogSink) -> Result<(), StepError> {
        let rpm_dir = self.workspace.join(RPM_DIR);
        let mut mock = self.mock_cmd();
        match self.request.rebuild_style {
            RebuildStyle::Equals => mock.setup_rebuild(
                &rpm_dir.display().to_string(),
                &srpm.display().to_string(),
            ),
            RebuildStyle::Positional => mock.setup_rebuild_positional(
                &rpm_dir.display().to_string(),
                &srpm.display().to_string(),
            ),
        }
        self.execute(Step::RebuildRpm, mock.as_spec(), sink)
    }

    fn execute(
        &self,
        step: Step,
        spec: &CommandSpec,
        sink: &mut dyn LogSink,
    ) -> Result<(), StepError> {
        sink.append(&format!("[{}] {}\n", step, spec.render()));
        let result = self
            .executor
            .run_streamed(spec, sink)
            .map_err(|source| StepError::Launch { step, source })?;
        if !result.success() {
            return Err(StepError::NonZeroExit {
                step,
                code: result.code(),
            });
        }
        Ok(())
    }
}
