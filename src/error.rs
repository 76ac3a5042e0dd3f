//! # Error Types
//!
//! Custom error types for SUMD Bridge using `thiserror`.

use std::time::Duration;

use thiserror::Error;

/// Main error type for SUMD Bridge
#[derive(Debug, Error)]
pub enum SumdBridgeError {
    /// None of the candidate serial ports could be opened
    #[error("No usable serial port, tried: {0}")]
    PortUnavailable(String),

    /// Serial port configuration errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// A single frame failed to reach the transport
    #[error("Serial write error: {0}")]
    Write(String),

    /// A frame write did not finish in time
    ///
    /// Part of the frame may already be on the wire. The receiver drops the
    /// truncated frame on its CRC and resyncs on the next 0xA8 header.
    #[error("Serial write timed out after {0:?}")]
    WriteTimeout(Duration),

    /// Input source errors (keyboard device, stdin)
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SUMD Bridge
pub type Result<T> = std::result::Result<T, SumdBridgeError>;
