//! Show command - displays resolved configuration.

use anyhow::Result;

use rpmforge::config::Settings;

/// Execute the show command.
pub fn cmd_show(settings: &Settings) -> Result<()> {
    settings.print();
    Ok(())
}
