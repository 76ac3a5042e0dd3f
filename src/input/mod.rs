//! # Input Module
//!
//! Turns discrete key presses into channel updates.
//!
//! This module handles:
//! - Reading keys from a raw terminal, piped stdin or an evdev keyboard
//! - Mapping keys to commands (arm, disarm, stick nudges, exit)
//! - Applying commands to the shared [`ChannelStore`] until shutdown

pub mod commands;
pub mod keyboard;
pub mod stdin;
pub mod terminal;

pub use commands::{apply_command, Command};

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::channels::ChannelStore;
use crate::error::Result;

/// A blocking source of key presses
#[cfg_attr(test, mockall::automock)]
pub trait KeySource: Send {
    /// Block until the next key is available
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_key(&mut self) -> Result<Option<char>>;
}

/// How far one key press moves each stick channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySteps {
    pub pitch: u16,
    pub roll: u16,
    pub yaw: u16,
    pub throttle: u16,
}

impl Default for KeySteps {
    fn default() -> Self {
        Self {
            pitch: 10,
            roll: 10,
            yaw: 10,
            throttle: 20,
        }
    }
}

/// Shutdown latch shared between the input thread and the main task
///
/// Commands run under the read lock and [`InputGate::close`] takes the write
/// lock, so once `close` returns no command is in flight and none will
/// start. A disarm issued after that is final.
#[derive(Debug, Clone, Default)]
pub struct InputGate {
    closed: Arc<RwLock<bool>>,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop accepting commands, waiting for one that is being applied
    pub fn close(&self) {
        let mut closed = self.closed.write().unwrap_or_else(PoisonError::into_inner);
        *closed = true;
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` unless the gate is closed
    fn run<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let closed = self.closed.read().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            return None;
        }
        Some(f())
    }
}

/// Feed keys from `source` into `store` until exit, end of input or `gate` closes
///
/// Both an exit command and the end of input leave the store disarmed.
/// Errors from the source are returned as-is; the store is left untouched.
/// A key read after the gate closed is dropped.
pub fn run_input_loop<S: KeySource + ?Sized>(
    source: &mut S,
    store: &ChannelStore,
    steps: &KeySteps,
    gate: &InputGate,
) -> Result<()> {
    loop {
        if gate.is_closed() {
            debug!("Input gate closed, no more commands");
            return Ok(());
        }

        let key = match source.next_key()? {
            Some(key) => key,
            None => {
                info!("Input closed, disarming");
                store.disarm();
                return Ok(());
            }
        };

        let Some(command) = Command::from_key(key) else {
            debug!("Ignoring unmapped key {:?}", key);
            continue;
        };

        match gate.run(|| apply_command(store, command, steps)) {
            Some(true) => {}
            Some(false) => return Ok(()),
            None => {
                debug!("Shutting down, dropped {:?}", command);
                return Ok(());
            }
        }
    }
}
