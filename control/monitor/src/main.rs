//! Control Monitor
//!
//! Connects to the daemon's control channel with the `Status` command and
//! prints every telemetry sample it pushes.
//!
//! # Usage
//!
//! ```bash
//! # Default socket ($XDG_RUNTIME_DIR/control/command.sock), 1s interval
//! control-monitor
//!
//! # Custom base path, 5s interval, JSON lines
//! control-monitor --base-path /run/box --interval 5 --json
//!
//! # Loopback-only platform
//! control-monitor --loopback-only --port 8964
//!
//! # With verbose logging
//! RUST_LOG=debug control-monitor
//! ```
//!
//! Exits on Ctrl-C, or when the daemon closes the connection.

mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use control_core::transport::Platform;
use control_core::{load_config, ChannelHandler, ConfigOverrides, ControlClient, ControlEvent};

use output::{render, OutputFormat};

/// Stream status telemetry from the local daemon
#[derive(Debug, Parser)]
#[command(name = "control-monitor", version, about)]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/control/config.toml)
    #[arg(long, env = "CONTROL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the daemon's command.sock
    #[arg(long, env = "CONTROL_BASE_PATH")]
    base_path: Option<PathBuf>,

    /// Use loopback TCP instead of a Unix socket
    #[arg(long)]
    loopback_only: bool,

    /// Loopback TCP port
    #[arg(long, env = "CONTROL_PORT")]
    port: Option<u16>,

    /// Telemetry push interval in seconds
    #[arg(long, short = 'i', value_parser = clap::value_parser!(i64).range(1..))]
    interval: Option<i64>,

    /// Print samples as JSON lines
    #[arg(long)]
    json: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_path: self.base_path.clone(),
            platform: self.loopback_only.then_some(Platform::LoopbackOnly),
            port: self.port,
            status_interval_secs: self.interval,
            // The monitor exits when the stream ends, so it always needs to hear about it
            notify_disconnect: Some(true),
        }
    }

    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("control_monitor=info".parse()?)
                .add_directive("control_core=info".parse()?),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (mut file_config, source) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    args.overrides().apply(&mut file_config);
    file_config
        .validate()
        .context("Invalid configuration after applying command-line options")?;
    info!(source = ?source, "Configuration loaded");

    let (client_config, transport_config) = file_config.into_parts();
    let endpoint = transport_config.endpoint();

    let (handler, mut events) = ChannelHandler::new();
    let mut client = ControlClient::from_transport_config(&transport_config, client_config, handler)
        .context("Failed to set up transport")?;

    client
        .connect()
        .await
        .with_context(|| format!("Failed to connect to daemon at {endpoint}"))?;

    let format = args.format();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ControlEvent::Connected) => info!(%endpoint, "Streaming status"),
                Some(ControlEvent::Sample(sample)) => println!("{}", render(&sample, format)?),
                Some(ControlEvent::Disconnected { message, .. }) => {
                    info!(reason = %message, "Daemon closed the status stream");
                    break;
                }
                None => break,
            },
            result = signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                info!("Interrupted");
                break;
            }
        }
    }

    client.disconnect().await?;
    Ok(())
}
