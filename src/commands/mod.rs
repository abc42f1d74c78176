//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - run the build pipeline
//! - `preflight` - check that the external tools are usable
//! - `show` - display resolved configuration

pub mod build;
mod preflight;
mod show;

pub use build::cmd_build;
pub use preflight::cmd_preflight;
pub use show::cmd_show;
