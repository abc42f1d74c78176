//! rpmforge library.
//!
//! The reusable core of the RPM build pipeline: typed command
//! construction, synchronous execution with captured output, and the
//! spectool/mock orchestration. The `rpmforge` binary is a thin CLI over
//! these modules.

pub mod command;
pub mod config;
pub mod param;
pub mod pipeline;
pub mod process;
pub mod tools;
pub mod workspace;
