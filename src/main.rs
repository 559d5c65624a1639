//! bcastwatch - broadcast traffic monitor
//!
//! Counts broadcast frames on a network interface over fixed windows.

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bcastwatch::capture::InterfaceDescriptor;
use bcastwatch::{
    selector, shutdown, CaptureLoop, Config, ConfigArgs, ConfigError, ConsoleReporter,
    InterfaceDirectory, PnetDirectory, StopReason,
};

#[derive(Parser)]
#[command(name = "bcastwatch")]
#[command(version)]
#[command(about = "Counts broadcast frames on a network interface over fixed windows")]
struct Args {
    /// Interface to monitor: index from --list, name (e.g., eth0) or description
    #[arg(short, long)]
    interface: Option<String>,

    /// Window length in seconds [default: 5]
    #[arg(short, long, value_name = "SECS")]
    window: Option<u64>,

    /// Capture filter: "broadcast" or "all" [default: broadcast]
    #[arg(short, long, value_name = "EXPR")]
    filter: Option<String>,

    /// List available interfaces and exit
    #[arg(short, long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config_args(&self) -> ConfigArgs {
        ConfigArgs {
            interface: self.interface.clone(),
            window_secs: self.window,
            filter: self.filter.clone(),
            verbose: self.verbose,
        }
    }
}

/// What the process was asked to do.
#[derive(Debug)]
enum Mode {
    List,
    Monitor(Config),
}

/// Decide the mode. Listing needs no monitoring settings, so it never
/// fails on them.
fn mode<F>(args: &Args, env: F) -> Result<Mode, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if args.list {
        return Ok(Mode::List);
    }
    Config::resolve(args.config_args(), env).map(Mode::Monitor)
}

fn init_tracing(args: &ConfigArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.tracing_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn list_interfaces<D: InterfaceDirectory, W: Write>(directory: &D, out: &mut W) -> Result<()> {
    let interfaces = directory
        .list()
        .context("Failed to enumerate network interfaces")?;
    selector::write_listing(out, &interfaces)?;
    Ok(())
}

fn choose_interface<'a>(
    config: &Config,
    interfaces: &'a [InterfaceDescriptor],
) -> Result<&'a InterfaceDescriptor> {
    let chosen = match config.interface.as_deref() {
        Some(selector) => selector::resolve(interfaces, selector)?,
        None if io::stdin().is_terminal() => {
            selector::prompt(interfaces, &mut io::stdin().lock(), &mut io::stdout().lock())?
        }
        None => selector::default_interface(interfaces)?,
    };
    Ok(chosen)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.config_args());

    let directory = PnetDirectory::new();
    let mode = mode(&args, |var| std::env::var(var).ok())
        .context("Invalid configuration")?;
    let config = match mode {
        Mode::List => return list_interfaces(&directory, &mut io::stdout().lock()),
        Mode::Monitor(config) => config,
    };
    let filter = config.capture_filter().context("Invalid capture filter")?;

    let interfaces = directory
        .list()
        .context("Failed to enumerate network interfaces")?;
    let interface = choose_interface(&config, &interfaces).context("Failed to select interface")?;
    info!("Selected interface {}", interface);

    let source = directory
        .open(interface, filter)
        .with_context(|| format!("Failed to open capture on {}", interface.name))?;

    let (signal, mut listener) = shutdown::channel();
    signal
        .install_os_handler()
        .context("Failed to install signal handler")?;

    let reporter = ConsoleReporter::new().with_verbose(config.verbose);
    let mut capture = CaptureLoop::new(config.window, reporter);

    match capture.run(source, &mut listener).await {
        StopReason::Shutdown => info!("Stopped on request"),
        StopReason::CaptureFailed(e) => warn!("Stopped after capture failure: {}", e),
        StopReason::SourceClosed => warn!("Stopped because the capture source closed"),
    }

    Ok(())
}
