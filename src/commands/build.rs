//! Build command - runs the full pipeline.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

use rpmforge::config::{BuildRequest, RebuildStyle, Settings};
use rpmforge::pipeline::BuildPipeline;
use rpmforge::process::{Executor, StdoutSink};
use rpmforge::workspace::Workspace;

/// Arguments for the build command.
#[derive(Args)]
pub struct BuildArgs {
    /// Spec file, relative to the workspace
    pub spec_file: Option<String>,

    /// Workspace directory (default: current directory)
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Load the build request from a JSON job file instead of flags
    #[arg(long, conflicts_with = "spec_file")]
    pub job: Option<PathBuf>,

    /// mock chroot profile to build in
    #[arg(short = 'r', long, default_value = "default")]
    pub profile: String,

    /// Extra mock configuration search path
    #[arg(long)]
    pub config_dir: Option<String>,

    /// Download remote sources with spectool before building
    #[arg(long)]
    pub download_sources: bool,

    /// Verbose tool output
    #[arg(short, long)]
    pub verbose: bool,

    /// Regex that identifies the built source RPM in SRPMS/
    #[arg(long, default_value = r"\.src\.rpm$")]
    pub srpm_pattern: String,

    /// Give this build its own mock chroot (--uniqueext)
    #[arg(long)]
    pub unique_per_build: bool,

    /// Build label the unique chroot suffix is derived from
    #[arg(long, default_value = "")]
    pub build_label: String,

    /// Pass --no-cleanup-after to mock
    #[arg(long)]
    pub no_cleanup_after: bool,

    /// Pass --no-clean to mock
    #[arg(long)]
    pub no_clean: bool,

    /// Pass the srpm to mock as a trailing positional instead of
    /// --rebuild="..."
    #[arg(long)]
    pub positional_rebuild: bool,

    /// Environment override for the tools, repeatable
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env_overrides: Vec<String>,
}

impl BuildArgs {
    fn to_request(&self) -> Result<BuildRequest> {
        let Some(ref spec_file) = self.spec_file else {
            bail!("either a spec file or --job <file> is required");
        };
        Ok(BuildRequest {
            spec_file: spec_file.clone(),
            download_sources: self.download_sources,
            verbose: self.verbose,
            profile: self.profile.clone(),
            config_dir: self.config_dir.clone(),
            srpm_pattern: self.srpm_pattern.clone(),
            unique_per_build: self.unique_per_build,
            build_label: self.build_label.clone(),
            no_cleanup_after: self.no_cleanup_after,
            no_clean: self.no_clean,
            rebuild_style: if self.positional_rebuild {
                RebuildStyle::Positional
            } else {
                RebuildStyle::Equals
            },
            env: Default::default(),
        })
    }
}

/// Execute the build command.
pub fn cmd_build(settings: &Settings, args: &BuildArgs) -> Result<()> {
    settings.validate()?;

    let workspace_root = match args.workspace {
        Some(ref path) => path.clone(),
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    let request = match args.job {
        Some(ref path) => BuildRequest::from_json_file(path)?,
        None => args.to_request()?,
    };

    let mut executor = Executor::from_host_env();
    executor.set_dir(&workspace_root);
    for (key, value) in &request.env {
        executor.override_var(key, value);
    }
    for pair in &args.env_overrides {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("--env expects KEY=VALUE, got '{}'", pair);
        };
        executor.override_var(key, value);
    }

    let pipeline = BuildPipeline::new(
        settings,
        &request,
        Workspace::new(workspace_root),
        executor,
    );

    let mut sink = StdoutSink;
    if pipeline.run(&mut sink).succeeded() {
        Ok(())
    } else {
        bail!("build failed")
    }
}
