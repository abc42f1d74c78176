//! Configuration: tool locations and per-build requests.
//!
//! Tool paths come from environment variables (with `.env` support in the
//! CLI); per-build inputs come from command-line flags or a JSON job file.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the mock executable.
pub const DEFAULT_MOCK_CMD: &str = "/usr/bin/mock";
/// Default location of the spectool executable.
pub const DEFAULT_SPECTOOL_CMD: &str = "/usr/bin/spectool";

/// Tool locations, resolved once at startup and passed into the pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path or command name of mock (env: `MOCK_CMD`).
    pub mock_cmd: String,
    /// Path or command name of spectool (env: `SPECTOOL_CMD`).
    pub spectool_cmd: String,
}

impl Settings {
    /// Load settings from environment variables, falling back to defaults.
    pub fn load() -> Self {
        Self {
            mock_cmd: env::var("MOCK_CMD").unwrap_or_else(|_| DEFAULT_MOCK_CMD.to_string()),
            spectool_cmd: env::var("SPECTOOL_CMD")
                .unwrap_or_else(|_| DEFAULT_SPECTOOL_CMD.to_string()),
        }
    }

    /// Verify both tools resolve to executable files.
    ///
    /// Runs before the pipeline starts so a bad tool path fails the build
    /// up front instead of at the first launch.
    pub fn validate(&self) -> Result<()> {
        require_executable(&self.mock_cmd)
            .with_context(|| format!("mock command '{}' is unusable", self.mock_cmd))?;
        require_executable(&self.spectool_cmd)
            .with_context(|| format!("spectool command '{}' is unusable", self.spectool_cmd))?;
        Ok(())
    }

    /// Print resolved settings for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  MOCK_CMD: {}", self.mock_cmd);
        println!("  SPECTOOL_CMD: {}", self.spectool_cmd);
    }
}

/// Resolve a command to an executable file.
///
/// Bare names are looked up on PATH; anything with a path separator is
/// checked directly. Errors when the file is missing, not a regular file,
/// or not executable.
pub fn require_executable(cmd: &str) -> Result<PathBuf> {
    let path = Path::new(cmd);
    let resolved = if path.components().count() > 1 {
        path.to_path_buf()
    } else {
        which::which(cmd).with_context(|| format!("'{}' not found on PATH", cmd))?
    };

    let metadata = fs::metadata(&resolved)
        .with_context(|| format!("'{}' does not exist", resolved.display()))?;
    if !metadata.is_file() {
        bail!("'{}' is not a regular file", resolved.display());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            bail!("'{}' is not executable", resolved.display());
        }
    }

    Ok(resolved)
}

/// Which calling convention the rebuild step uses.
///
/// mock accepts the srpm either as the value of `--rebuild` or as a
/// trailing positional after a bare `--rebuild`, depending on version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RebuildStyle {
    /// `--rebuild="<srpm>"`
    #[default]
    Equals,
    /// `--rebuild <srpm>`
    Positional,
}

/// Inputs for one pipeline run.
///
/// Assembled from CLI flags or deserialized from a JSON job file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildRequest {
    /// Spec file path, relative to the workspace.
    pub spec_file: String,
    /// Download remote sources with spectool before building.
    pub download_sources: bool,
    /// Verbose tool output.
    pub verbose: bool,
    /// mock chroot profile (`-r`).
    pub profile: String,
    /// Extra mock configuration search path (`--configdir`).
    pub config_dir: Option<String>,
    /// Regex matched against file names in `SRPMS/` to find the built
    /// source RPM.
    pub srpm_pattern: String,
    /// Give each build its own mock chroot (`--uniqueext`), derived from
    /// `build_label`.
    pub unique_per_build: bool,
    /// Human-readable build identifier the unique chroot suffix is
    /// sanitized from.
    pub build_label: String,
    /// Pass `--no-cleanup-after` to mock.
    pub no_cleanup_after: bool,
    /// Pass `--no-clean` to mock.
    pub no_clean: bool,
    /// Rebuild calling convention.
    pub rebuild_style: RebuildStyle,
    /// Environment variables layered over the host environment for every
    /// tool invocation.
    pub env: BTreeMap<String, String>,
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self {
            spec_file: String::new(),
            download_sources: false,
            verbose: false,
            profile: "default".to_string(),
            config_dir: None,
            srpm_pattern: r"\.src\.rpm$".to_string(),
            unique_per_build: false,
            build_label: String::new(),
            no_cleanup_after: false,
            no_clean: false,
            rebuild_style: RebuildStyle::Equals,
            env: BTreeMap::new(),
        }
    }
}

impl BuildRequest {
    /// Load a request from a JSON job file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        let request: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid job file {}", path.display()))?;
        if request.spec_file.is_empty() {
            bail!("Job file {} does not set spec_file", path.display());
        }
        Ok(request)
    }
}

/// Turn a human-readable build label into a chroot-suffix-safe token:
/// lower-case it, then replace every character outside `[a-z0-9_-]`
/// with `-`.
pub fn sanitize_build_label(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' => c,
            _ => '-',
        })
        .collect()
}
