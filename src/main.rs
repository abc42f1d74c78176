//! rpmforge - builds RPM packages from spec files.
//!
//! Drives two external tools in sequence:
//! - spectool downloads the sources a spec file references
//! - mock builds the source RPM, then rebuilds the binary RPMs in a chroot

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::build::BuildArgs;
use rpmforge::config::Settings;

#[derive(Parser)]
#[command(name = "rpmforge")]
#[command(about = "Builds RPM packages from spec files using spectool and mock")]
#[command(
    after_help = "QUICK START:\n  rpmforge preflight              Check mock and spectool\n  rpmforge build pkg.spec -r epel-9-x86_64\n                                  Build binary RPMs into RPMS/"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the build pipeline (download sources, build srpm, rebuild rpm)
    Build(BuildArgs),

    /// Check that mock and spectool are executable
    Preflight,

    /// Show resolved configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present; real environment variables win.
    dotenvy::dotenv().ok();
    let settings = Settings::load();

    match cli.command {
        Commands::Build(args) => commands::cmd_build(&settings, &args)?,
        Commands::Preflight => commands::cmd_preflight(&settings)?,
        Commands::Show => commands::cmd_show(&settings)?,
    }

    Ok(())
}
