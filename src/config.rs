//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SumdBridgeError};
use crate::input::KeySteps;
use crate::sender::SenderSettings;

/// Port value that probes the default device list instead of one path
pub const AUTO_DETECT_PORT: &str = "auto";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub sumd: SumdConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

/// SUMD transmission configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SumdConfig {
    #[serde(default = "default_send_interval_ms")]
    pub send_interval_ms: u64,

    #[serde(default = "default_exit_grace_ms")]
    pub exit_grace_ms: u64,

    #[serde(default = "default_log_interval_frames")]
    pub log_interval_frames: u64,
}

/// Keyboard input configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct KeyboardConfig {
    /// evdev keyboard device; empty reads keys from stdin
    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_pitch_step")]
    pub pitch_step: u16,

    #[serde(default = "default_roll_step")]
    pub roll_step: u16,

    #[serde(default = "default_yaw_step")]
    pub yaw_step: u16,

    #[serde(default = "default_throttle_step")]
    pub throttle_step: u16,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyAMA0".to_string() }
fn default_baud_rate() -> u32 { 115200 }
fn default_write_timeout_ms() -> u64 { 10 }

fn default_send_interval_ms() -> u64 { 50 }
fn default_exit_grace_ms() -> u64 { 500 }
fn default_log_interval_frames() -> u64 { 200 }

fn default_pitch_step() -> u16 { 10 }
fn default_roll_step() -> u16 { 10 }
fn default_yaw_step() -> u16 { 10 }
fn default_throttle_step() -> u16 { 20 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            write_timeout_ms: default_write_timeout_ms(),
        }
    }
}

impl Default for SumdConfig {
    fn default() -> Self {
        Self {
            send_interval_ms: default_send_interval_ms(),
            exit_grace_ms: default_exit_grace_ms(),
            log_interval_frames: default_log_interval_frames(),
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            device_path: String::new(),
            pitch_step: default_pitch_step(),
            roll_step: default_roll_step(),
            yaw_step: default_yaw_step(),
            throttle_step: default_throttle_step(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sumd_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// True if the serial port should be auto-detected
    pub fn auto_detect_port(&self) -> bool {
        self.serial.port == AUTO_DETECT_PORT
    }

    /// Bound on a single frame write
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.serial.write_timeout_ms)
    }

    /// How long to keep sending after the final disarm
    pub fn exit_grace(&self) -> Duration {
        Duration::from_millis(self.sumd.exit_grace_ms)
    }

    /// Sender timing derived from the `[sumd]` section
    pub fn sender_settings(&self) -> SenderSettings {
        SenderSettings {
            send_interval: Duration::from_millis(self.sumd.send_interval_ms),
            log_interval_frames: self.sumd.log_interval_frames,
        }
    }

    /// Per-key channel increments from the `[keyboard]` section
    pub fn key_steps(&self) -> KeySteps {
        KeySteps {
            pitch: self.keyboard.pitch_step,
            roll: self.keyboard.roll_step,
            yaw: self.keyboard.yaw_step,
            throttle: self.keyboard.throttle_step,
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.serial.port.is_empty() {
            return Err(invalid("serial port cannot be empty"));
        }

        if ![9600, 19200, 38400, 57600, 100000, 115200].contains(&self.serial.baud_rate) {
            return Err(invalid(
                "baud_rate must be one of: 9600, 19200, 38400, 57600, 100000, 115200",
            ));
        }

        if self.serial.write_timeout_ms == 0 || self.serial.write_timeout_ms > 1000 {
            return Err(invalid("write_timeout_ms must be between 1 and 1000"));
        }

        // Receivers fail-safe below 4 frames per second
        if self.sumd.send_interval_ms == 0 || self.sumd.send_interval_ms > 250 {
            return Err(invalid("send_interval_ms must be between 1 and 250"));
        }

        if self.sumd.exit_grace_ms > 10000 {
            return Err(invalid("exit_grace_ms must be at most 10000"));
        }

        if self.sumd.log_interval_frames == 0 {
            return Err(invalid("log_interval_frames must be greater than 0"));
        }

        for (name, value) in [
            ("pitch_step", self.keyboard.pitch_step),
            ("roll_step", self.keyboard.roll_step),
            ("yaw_step", self.keyboard.yaw_step),
            ("throttle_step", self.keyboard.throttle_step),
        ] {
            if value == 0 || value > 500 {
                return Err(invalid(&format!("{} must be between 1 and 500", name)));
            }
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> SumdBridgeError {
    SumdBridgeError::Config(toml::de::Error::custom(msg))
}
