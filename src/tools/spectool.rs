//! spectool invocations (source download).

use crate::command::CommandSpec;
use crate::param::ParamKind;

/// Fluent wrapper that knows spectool's flags.
pub struct SpectoolCmd {
    spec: CommandSpec,
}

impl SpectoolCmd {
    pub fn new(program: &str) -> Self {
        Self {
            spec: CommandSpec::new(program),
        }
    }

    /// Configure a full source download: fetch every remote source the
    /// spec file references into the sources directory.
    pub fn source_downloader(program: &str, spec_file: &str, sources_dir: &str) -> Self {
        let mut cmd = Self::new(program);
        cmd.set_spec_file(spec_file);
        cmd.set_sources_dir(sources_dir);
        cmd.set_download_remote();
        cmd
    }

    /// Spec file to read source URLs from (`-g`).
    pub fn set_spec_file(&mut self, path: &str) {
        self.spec.add_value("g", path, ParamKind::ShortSpaced);
    }

    /// Directory downloaded sources land in (`-C`).
    pub fn set_sources_dir(&mut self, dir: &str) {
        self.spec.add_value("C", dir, ParamKind::ShortSpaced);
    }

    /// Fetch remote sources (`-R`).
    pub fn set_download_remote(&mut self) {
        self.spec.add_flag("R", ParamKind::ShortFlag);
    }

    /// Debug-level output (`-D`).
    pub fn set_verbose(&mut self) {
        self.spec.add_flag("D", ParamKind::ShortFlag);
    }

    pub fn as_spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn into_spec(self) -> CommandSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_downloader_render() {
        let tool = SpectoolCmd::source_downloader("spectool", "/ws/pkg.spec", "/ws/SOURCES");
        assert_eq!(
            tool.as_spec().render(),
            "spectool -R -C /ws/SOURCES -g /ws/pkg.spec"
        );
    }

    #[test]
    fn test_verbose_prepends_debug_flag() {
        let mut tool = SpectoolCmd::source_downloader("spectool", "pkg.spec", "SOURCES");
        tool.set_verbose();
        assert_eq!(tool.as_spec().render(), "spectool -D -R -C SOURCES -g pkg.spec");
    }

    #[test]
    fn test_spec_file_set_once() {
        let mut tool = SpectoolCmd::new("spectool");
        tool.set_spec_file("a.spec");
        tool.set_spec_file("b.spec");
        assert_eq!(tool.as_spec().render(), "spectool -g a.spec");
    }
}
