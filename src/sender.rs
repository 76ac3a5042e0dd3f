//! # Periodic Sender
//!
//! Re-transmits the current channel values at a fixed cadence so the flight
//! controller never drops into fail-safe.
//!
//! The task owns the serial port. It stops cooperatively: the stop signal is
//! only observed between frames, never in the middle of a write.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::channels::ChannelStore;
use crate::error::SumdBridgeError;
use crate::serial::port_trait::SerialPortIO;
use crate::serial::SumdSerial;

/// Default time between frames (20 Hz)
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_millis(50);

/// Default number of frames between status log messages
pub const DEFAULT_LOG_INTERVAL_FRAMES: u64 = 200;

/// Timing for the sender task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderSettings {
    /// Time between frames
    pub send_interval: Duration,
    /// Frames between status log lines
    pub log_interval_frames: u64,
}

impl Default for SenderSettings {
    fn default() -> Self {
        Self {
            send_interval: DEFAULT_SEND_INTERVAL,
            log_interval_frames: DEFAULT_LOG_INTERVAL_FRAMES,
        }
    }
}

/// Totals reported when the sender stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenderStats {
    /// Frames that reached the port
    pub frames_sent: u64,
    /// Frames dropped because the write failed
    pub write_errors: u64,
    /// Frames cut off by the write timeout, possibly partly transmitted
    pub write_timeouts: u64,
}

/// Run the send loop until `stop` turns `true` or its sender is dropped
///
/// Each tick snapshots `store`, encodes a frame and writes it. Write
/// failures and timeouts are logged and counted apart, never retried.
///
/// # Examples
///
/// ```no_run
/// use sumd_bridge::channels::ChannelStore;
/// use sumd_bridge::sender::{run_sender, SenderSettings};
/// use sumd_bridge::serial::{SumdSerial, SUMD_BAUD_RATE};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let store = ChannelStore::new();
///     let serial = SumdSerial::open("/dev/ttyAMA0", SUMD_BAUD_RATE)?;
///     let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
///
///     let task = tokio::spawn(run_sender(store.clone(), serial, SenderSettings::default(), stop_rx));
///     store.arm();
///     // ...
///     stop_tx.send(true)?;
///     let stats = task.await?;
///     println!("sent {} frames", stats.frames_sent);
///     Ok(())
/// }
/// ```
pub async fn run_sender<P: SerialPortIO>(
    store: ChannelStore,
    mut serial: SumdSerial<P>,
    settings: SenderSettings,
    mut stop: watch::Receiver<bool>,
) -> SenderStats {
    let mut ticker = interval(settings.send_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stats = SenderStats::default();
    let mut last_log_count: u64 = 0;

    info!(
        "Sending SUMD frames to {} every {:?}",
        serial.device_path(),
        settings.send_interval
    );

    loop {
        let stopped = *stop.borrow();
        if stopped {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {
                let frame = store.snapshot_and_encode();

                match serial.send_frame(&frame).await {
                    Ok(()) => {}
                    Err(e @ SumdBridgeError::WriteTimeout(_)) => {
                        stats.write_timeouts += 1;
                        debug!("Dropped SUMD frame: {}", e);
                        continue;
                    }
                    Err(e) => {
                        stats.write_errors += 1;
                        debug!("Dropped SUMD frame: {}", e);
                        continue;
                    }
                }

                stats.frames_sent += 1;

                if stats.frames_sent - last_log_count >= settings.log_interval_frames {
                    info!(
                        "Sent {} frames ({} write errors, {} timeouts), current values {:?}",
                        stats.frames_sent,
                        stats.write_errors,
                        stats.write_timeouts,
                        store.snapshot()
                    );
                    last_log_count = stats.frames_sent;
                }
            }

            changed = stop.changed() => {
                if changed.is_err() {
                    debug!("Stop handle dropped, ending send loop");
                    break;
                }
            }
        }
    }

    info!(
        "SUMD sender stopped: {} frames sent, {} write errors, {} write timeouts",
        stats.frames_sent, stats.write_errors, stats.write_timeouts
    );
    stats
}
