use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sysroot::config::Config;
use sysroot::core::path::ensure_dir;
use sysroot::core::SysrootResult;
use sysroot::di::ServiceContainer;
use sysroot::distro::{Distro, Selection};
use sysroot::package::Installer;
use tracing_subscriber::EnvFilter;

// WARNING: packages are not checked against signatures or checksums.

#[derive(Parser)]
#[command(name = "sysroot")]
#[command(about = "Download and install distribution packages into a cross-compilation sysroot")]
struct Cli {
    /// Distribution to use
    #[arg(long, value_enum)]
    distro: Distro,

    /// Distribution version for raspbian/ubuntu/alpine (default: buster/bionic/3.12)
    #[arg(long)]
    version: Option<String>,

    /// Target to download for alarm or alpine (ex: armv6l-unknown-linux-gnueabihf)
    #[arg(long)]
    target: Option<String>,

    /// Sysroot folder
    #[arg(long)]
    sysroot: PathBuf,

    /// Discard the cached package database and download it again
    #[arg(long)]
    refresh_index: bool,

    /// Packages to install
    #[arg(required = true)]
    packages: Vec<String>,
}

async fn run(cli: Cli) -> SysrootResult<()> {
    let config = Config::load()?;

    // Validate before creating anything or touching the network
    let selection = Selection::new(
        cli.distro,
        cli.version.as_deref(),
        cli.target.as_deref(),
        &config,
    )?;

    ensure_dir(&cli.sysroot)?;
    let services = ServiceContainer::new(&cli.sysroot);
    let installer = Installer::new(&cli.sysroot, selection, services);
    if cli.refresh_index {
        installer.refresh_index()?;
    }

    let report = installer.install(&cli.packages).await?;

    tracing::info!(
        "{} packages resolved, {} fetched, {} already present, {} symlinks fixed",
        report.resolved,
        report.fetched.len(),
        report.skipped.len(),
        report.symlinks_fixed
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    }
}
