//! Builders for the external tools the pipeline drives.
//!
//! - `spectool` - downloads the sources a spec file references
//! - `mock` - builds the source RPM and rebuilds the binary RPM in a chroot

pub mod mock;
pub mod spectool;

pub use mock::MockCmd;
pub use spectool::SpectoolCmd;
