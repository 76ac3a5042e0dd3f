//! # SUMD Bridge
//!
//! Fly a drone from the keyboard by emulating a Graupner SUMD receiver on
//! the flight controller's serial port.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Set up logging with tracing subscriber
//!    - Load configuration (first argument, `config/default.toml`, or defaults)
//!    - Open the serial port; failure here is fatal before anything is sent
//!
//! 2. **Running**
//!    - Sender task transmits the current channel values every 50 ms
//!    - Input thread turns key presses into channel updates
//!
//! 3. **Shutdown** (exit key, end of input, or Ctrl+C)
//!    - Close the input gate so no key press lands after the disarm
//!    - Disarm
//!    - Keep sending for the exit grace period so the disarm is received
//!    - Stop the sender and log totals
//!
//! ```text
//! INFO sumd_bridge: SUMD Bridge v0.1.0 starting...
//! INFO sumd_bridge::serial: Opened SUMD serial port at /dev/ttyAMA0 (115200 baud, 8E1)
//! INFO sumd_bridge::sender: Sending SUMD frames to /dev/ttyAMA0 every 50ms
//! ```

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use sumd_bridge::channels::ChannelStore;
use sumd_bridge::config::Config;
use sumd_bridge::input::keyboard::EvdevKeyboard;
use sumd_bridge::input::stdin::LineKeys;
use sumd_bridge::input::terminal::{RawKeys, RawModeGuard};
use sumd_bridge::input::{run_input_loop, InputGate, KeySource};
use sumd_bridge::sender::run_sender;
use sumd_bridge::serial::SumdSerial;

/// Configuration file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("SUMD Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(std::env::args().nth(1))?;

    let serial = if config.auto_detect_port() {
        SumdSerial::open_auto(config.serial.baud_rate)
    } else {
        SumdSerial::open(&config.serial.port, config.serial.baud_rate)
    };
    let serial = serial
        .context("Failed to open serial port")?
        .with_write_timeout(config.write_timeout());

    let (mut keys, raw_mode) = open_key_source(&config.keyboard.device_path)?;

    let store = ChannelStore::new();
    let (stop_tx, stop_rx) = watch::channel(false);
    let sender = tokio::spawn(run_sender(
        store.clone(),
        serial,
        config.sender_settings(),
        stop_rx,
    ));

    info!("Keys: v arm, b disarm, n flight mode, w/s pitch, a/d roll, j/l yaw, i/k throttle, x exit");

    let gate = InputGate::new();
    let input_gate = gate.clone();
    let input_store = store.clone();
    let steps = config.key_steps();
    let input = tokio::task::spawn_blocking(move || {
        run_input_loop(keys.as_mut(), &input_store, &steps, &input_gate)
    });

    tokio::select! {
        result = input => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Input stopped: {}", e),
                Err(e) => warn!("Input thread failed: {}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    // The input thread may still be blocked on a read; whatever it returns is dropped
    gate.close();
    store.disarm();
    // Delivery is not acknowledged, so repeat the disarm for a while
    info!("Holding disarm for {:?}", config.exit_grace());
    tokio::time::sleep(config.exit_grace()).await;

    let _ = stop_tx.send(true);
    let stats = sender.await.context("Sender task failed")?;
    info!(
        "Total frames sent: {} ({} write errors, {} write timeouts)",
        stats.frames_sent, stats.write_errors, stats.write_timeouts
    );

    // process::exit skips destructors
    drop(raw_mode);

    // A blocked stdin read would otherwise keep the runtime alive
    std::process::exit(0)
}

/// Load the configuration named on the command line, else the default file if present
fn load_config(path: Option<String>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load(&path).with_context(|| format!("Failed to load {}", path))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
            Config::load(DEFAULT_CONFIG_PATH)
                .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_PATH))
        }
        None => {
            info!("No configuration file, using defaults");
            Ok(Config::default())
        }
    }
}

/// evdev keyboard if a device is configured, else stdin
///
/// An interactive stdin is switched to raw mode; the returned guard restores it.
/// Piped stdin is read line by line.
fn open_key_source(device_path: &str) -> Result<(Box<dyn KeySource>, Option<RawModeGuard>)> {
    if !device_path.is_empty() {
        let keyboard = EvdevKeyboard::open(device_path).context("Failed to open keyboard")?;
        return Ok((Box::new(keyboard), None));
    }

    if std::io::stdin().is_terminal() {
        let guard = RawModeGuard::enable().context("Failed to set up terminal")?;
        info!("Reading single keystrokes from the terminal (Ctrl+C to quit)");
        return Ok((Box::new(RawKeys::stdin()), Some(guard)));
    }

    info!("Reading keys from piped stdin");
    Ok((Box::new(LineKeys::stdin()), None))
}
