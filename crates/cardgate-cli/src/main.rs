//! cardgate - run an access controller on a bench.
//!
//! Card UIDs are read from stdin as hex, one per line. The modem is driven
//! over `--serial` when built with `hardware-serial`; without a port the
//! controller runs offline.

mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardgate_controller::{
    AccessController, Authenticator, ControllerConfig, Peripherals, SerialConfig,
    TimeoutDirectory,
};
use cardgate_core::Error;
use cardgate_hardware::AnySerialLink;
use cardgate_hardware::mock::{MockRfid, MockSerialLink};
use cardgate_modem::{ConnectivityMonitor, ModemTransport, NotificationDispatcher};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::console::{ConsoleBuzzer, ConsoleDisplay, ConsoleRelay};

/// RFID access controller
#[derive(Parser, Debug)]
#[command(name = "cardgate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter; `RUST_LOG` takes precedence when set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Modem serial port, overrides `serial.port`
    #[arg(short, long)]
    serial: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = match &cli.config {
        Some(path) => ControllerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ControllerConfig::default(),
    };
    if let Some(port) = cli.serial {
        config.serial.port = Some(port);
    }

    let link = open_link(&config.serial)?;
    let monitor = if !config.reporting.enabled {
        info!("Reporting disabled");
        ConnectivityMonitor::detached()
    } else {
        match link {
            Some(link) => {
                let monitor = ConnectivityMonitor::new(ModemTransport::new(link).into_shared());
                monitor.attach(&config.wifi).await;
                monitor
            }
            None => {
                let (silent, _modem) = MockSerialLink::new();
                let monitor = ConnectivityMonitor::new(
                    ModemTransport::new(AnySerialLink::Mock(silent)).into_shared(),
                );
                monitor.probe().await;
                monitor
            }
        }
    };
    info!(state = %monitor.state(), "Connectivity");

    let dispatcher = NotificationDispatcher::new(monitor.clone(), config.reporting.clone());
    let directory =
        TimeoutDirectory::new(config.static_directory(), config.timing.directory_timeout());
    let authenticator = Authenticator::new(directory);

    let (reader, cards) = MockRfid::with_name("console".to_string());
    let _feeder = console::spawn_stdin_feeder(cards);
    let peripherals = Peripherals {
        reader,
        display: ConsoleDisplay::new(),
        relay: ConsoleRelay::new(),
        buzzer: ConsoleBuzzer,
    };

    let mut controller =
        AccessController::new(peripherals, authenticator, monitor, dispatcher, config.timing);

    match controller.start().await {
        Ok(()) => {}
        Err(e @ Error::DisplayInit(_)) => {
            error!(error = %e, "Halted");
            std::future::pending::<()>().await;
        }
        Err(e) => return Err(e).context("Failed to start controller"),
    }

    info!(directory_entries = config.directory.len(), "Ready for cards");
    tokio::select! {
        () = controller.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for ctrl-c")?;
            info!("Shutting down");
        }
    }

    Ok(())
}

#[cfg(feature = "hardware-serial")]
fn open_link(serial: &SerialConfig) -> Result<Option<AnySerialLink>> {
    use cardgate_hardware::SerialPortLink;

    let Some(port) = &serial.port else {
        return Ok(None);
    };
    let link = SerialPortLink::open(port, serial.baud_rate)
        .with_context(|| format!("Failed to open modem port {port}"))?;
    info!(port = %port, baud_rate = serial.baud_rate, "Modem port open");
    Ok(Some(AnySerialLink::Port(link)))
}

#[cfg(not(feature = "hardware-serial"))]
fn open_link(serial: &SerialConfig) -> Result<Option<AnySerialLink>> {
    if let Some(port) = &serial.port {
        tracing::warn!(port = %port, "Built without hardware-serial, ignoring modem port");
    }
    Ok(None)
}
