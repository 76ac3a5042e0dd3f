//! # Serial Communication Module
//!
//! Handles the serial link to the flight controller's SUMD receiver input.
//!
//! This module handles:
//! - Opening the serial port at 115200 baud, 8E1, no flow control
//! - Writing SUMD frames without ever stalling the send cadence

pub mod port_trait;

use std::time::Duration;

use crate::error::{Result, SumdBridgeError};
use port_trait::{SerialPortIO, TokioSerialPort};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

/// SUMD baud rate (115,200 baud)
pub const SUMD_BAUD_RATE: u32 = 115_200;

/// Default bound on a single frame write
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(10);

/// Default serial device paths to try (in order of preference)
pub const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/serial0", // Raspberry Pi primary UART alias
    "/dev/ttyAMA0", // Raspberry Pi PL011 UART
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// SUMD Serial Port Handler
///
/// Owns the port exclusively; only the sender task writes to it.
pub struct SumdSerial<P: SerialPortIO = TokioSerialPort> {
    /// Serial port handle
    port: P,
    /// Device path (e.g., /dev/ttyAMA0)
    device_path: String,
    /// Upper bound on write + flush of one frame
    write_timeout: Duration,
}

impl<P: SerialPortIO> std::fmt::Debug for SumdSerial<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SumdSerial")
            .field("device_path", &self.device_path)
            .field("write_timeout", &self.write_timeout)
            .finish_non_exhaustive()
    }
}

impl SumdSerial<TokioSerialPort> {
    /// Open a specific serial device
    ///
    /// # Errors
    ///
    /// Returns `PortUnavailable` if the device cannot be opened or configured
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sumd_bridge::serial::{SumdSerial, SUMD_BAUD_RATE};
    ///
    /// fn main() -> anyhow::Result<()> {
    ///     let serial = SumdSerial::open("/dev/ttyAMA0", SUMD_BAUD_RATE)?;
    ///     Ok(())
    /// }
    /// ```
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        Self::open_with_paths(&[path], baud_rate)
    }

    /// Auto-detect the device by trying [`DEFAULT_DEVICE_PATHS`]
    pub fn open_auto(baud_rate: u32) -> Result<Self> {
        Self::open_with_paths(DEFAULT_DEVICE_PATHS, baud_rate)
    }

    /// Open the first device that works out of `paths`
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyAMA0"])
    /// * `baud_rate` - Line speed, normally [`SUMD_BAUD_RATE`]
    ///
    /// # Returns
    ///
    /// * `Result<SumdSerial>` - Connected serial port or error
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Opened SUMD serial port at {} ({} baud, 8E1)", path, baud_rate);
                    return Ok(Self::with_port(TokioSerialPort::new(port), path));
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(SumdBridgeError::PortUnavailable(paths.join(", ")))
    }

    /// Open a specific serial port with SUMD line settings
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::Even)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(Duration::ZERO)
            .open_native_async()
            .map_err(|e| SumdBridgeError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }
}

impl<P: SerialPortIO> SumdSerial<P> {
    /// Wrap an already opened port
    pub fn with_port(port: P, device_path: &str) -> Self {
        Self {
            port,
            device_path: device_path.to_string(),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    /// Replace the per-frame write bound
    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    /// Send one SUMD frame
    ///
    /// Write and flush together are bounded by the write timeout. A frame
    /// that does not make it is reported and not retried; the next cycle
    /// sends fresh values anyway.
    ///
    /// The timeout can cancel `write_all` after some bytes were accepted, so
    /// a truncated frame may precede the next one on the line. It fails the
    /// receiver's CRC check and the following header resyncs it.
    ///
    /// # Errors
    ///
    /// Returns `Write` if the port rejects the data and `WriteTimeout` if the
    /// timeout expires
    pub async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        let port = &mut self.port;
        let write = async {
            port.write_all(frame).await?;
            port.flush().await
        };

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(Ok(())) => {
                debug!("Sent SUMD frame ({} bytes)", frame.len());
                Ok(())
            }
            Ok(Err(e)) => Err(SumdBridgeError::Write(format!("Failed to write frame: {}", e))),
            Err(_) => Err(SumdBridgeError::WriteTimeout(self.write_timeout)),
        }
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}
