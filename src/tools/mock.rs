//! mock invocations (source RPM build and binary RPM rebuild).

use crate::command::CommandSpec;
use crate::param::ParamKind;

/// Fluent wrapper that knows mock's flags.
///
/// A `MockCmd` is configured once for a single invocation: shared options
/// first (profile, verbosity, unique chroot suffix), then exactly one of
/// the build modes.
pub struct MockCmd {
    spec: CommandSpec,
}

impl MockCmd {
    pub fn new(program: &str) -> Self {
        Self {
            spec: CommandSpec::new(program),
        }
    }

    /// Chroot configuration profile to build in (`-r`).
    pub fn set_profile(&mut self, name: &str) {
        self.spec.add_value("r", name, ParamKind::ShortSpaced);
    }

    /// Extra directory searched for chroot configurations (`--configdir`).
    pub fn set_config_dir(&mut self, dir: &str) {
        self.spec.add_value("configdir", dir, ParamKind::LongEquals);
    }

    /// Verbose build output (`-v`).
    pub fn set_verbose(&mut self) {
        self.spec.add_flag("v", ParamKind::ShortFlag);
    }

    /// Suffix appended to the chroot name (`--uniqueext`) so concurrent
    /// builds do not share a root.
    pub fn set_unique_ext(&mut self, tag: &str) {
        self.spec.add_value("uniqueext", tag, ParamKind::LongEquals);
    }

    /// Leave the chroot in place after the build (`--no-cleanup-after`).
    pub fn set_no_cleanup_after(&mut self) {
        self.spec.add_flag("no-cleanup-after", ParamKind::LongFlag);
    }

    /// Reuse the existing chroot instead of purging it first (`--no-clean`).
    pub fn set_no_clean(&mut self) {
        self.spec.add_flag("no-clean", ParamKind::LongFlag);
    }

    fn set_result_dir(&mut self, dir: &str) {
        self.spec.add_value("resultdir", dir, ParamKind::LongEquals);
    }

    /// Configure a source RPM build from a spec file and sources directory.
    pub fn setup_srpm_build(&mut self, result_dir: &str, spec_file: &str, sources_dir: &str) {
        self.set_result_dir(result_dir);
        self.spec.add_flag("buildsrpm", ParamKind::LongFlag);
        self.spec.add_value("spec", spec_file, ParamKind::LongEquals);
        self.spec.add_value("sources", sources_dir, ParamKind::LongEquals);
    }

    /// Configure a binary rebuild from an existing source RPM, passing the
    /// srpm as the value of `--rebuild`.
    pub fn setup_rebuild(&mut self, result_dir: &str, srpm: &str) {
        self.set_result_dir(result_dir);
        self.spec.add_value("rebuild", srpm, ParamKind::LongEquals);
    }

    /// Configure a binary rebuild in the flag-plus-positional form some
    /// mock versions expect: `--rebuild <srpm>` with the srpm trailing.
    pub fn setup_rebuild_positional(&mut self, result_dir: &str, srpm: &str) {
        self.set_result_dir(result_dir);
        self.spec.add_flag("rebuild", ParamKind::LongFlag);
        self.spec.add_positional(srpm);
    }

    pub fn as_spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn into_spec(self) -> CommandSpec {
        self.spec
    }
}
