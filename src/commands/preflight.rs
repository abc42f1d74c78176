//! Preflight command - checks that mock and spectool are usable.

use anyhow::{bail, Result};

use rpmforge::config::{require_executable, Settings};

/// Execute the preflight command.
pub fn cmd_preflight(settings: &Settings) -> Result<()> {
    let mut failures = 0;

    for (name, cmd) in [
        ("mock", &settings.mock_cmd),
        ("spectool", &settings.spectool_cmd),
    ] {
        match require_executable(cmd) {
            Ok(resolved) => println!("  [OK]   {} -> {}", name, resolved.display()),
            Err(e) => {
                println!("  [FAIL] {}: {:#}", name, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} preflight check(s) failed", failures);
    }
    println!("All preflight checks passed.");
    Ok(())
}
