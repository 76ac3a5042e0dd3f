//! # Channels Module
//!
//! The five control channels and the lock-protected store shared between
//! the input path and the periodic sender.
//!
//! This module handles:
//! - Channel values and their power-on defaults
//! - Partial, atomic updates of any subset of channels
//! - Consistent snapshots for frame encoding
//! - Arming via the aux1 channel

pub mod arming;
pub mod store;

pub use arming::ArmingState;
pub use store::ChannelStore;

use crate::sumd::protocol::{SumdChannels, CHANNEL_VALUE_CENTER, THROTTLE_ARMING_DEFAULT};

/// A single named control axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Roll,
    Pitch,
    Yaw,
    Throttle,
    Aux1,
}

impl Channel {
    /// All channels in their natural order
    pub const ALL: [Channel; 5] = [
        Channel::Roll,
        Channel::Pitch,
        Channel::Yaw,
        Channel::Throttle,
        Channel::Aux1,
    ];
}

/// Current value of every channel
///
/// Values use the flight controller convention (nominally 1000-2000) and are
/// not range checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSet {
    pub roll: u16,
    pub pitch: u16,
    pub yaw: u16,
    pub throttle: u16,
    pub aux1: u16,
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self {
            roll: CHANNEL_VALUE_CENTER,
            pitch: CHANNEL_VALUE_CENTER,
            yaw: CHANNEL_VALUE_CENTER,
            throttle: THROTTLE_ARMING_DEFAULT,
            aux1: arming::AUX1_DISARMED,
        }
    }
}

impl ChannelSet {
    /// Read one channel
    pub fn get(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Roll => self.roll,
            Channel::Pitch => self.pitch,
            Channel::Yaw => self.yaw,
            Channel::Throttle => self.throttle,
            Channel::Aux1 => self.aux1,
        }
    }

    /// Write one channel
    pub fn set(&mut self, channel: Channel, value: u16) {
        match channel {
            Channel::Roll => self.roll = value,
            Channel::Pitch => self.pitch = value,
            Channel::Yaw => self.yaw = value,
            Channel::Throttle => self.throttle = value,
            Channel::Aux1 => self.aux1 = value,
        }
    }

    /// Values in SUMD wire order: `[roll, pitch, throttle, yaw, aux1]`
    ///
    /// Note throttle and yaw swap places relative to the natural order.
    pub fn to_wire_order(&self) -> SumdChannels {
        [self.roll, self.pitch, self.throttle, self.yaw, self.aux1]
    }
}

/// A partial update: `None` leaves the channel unchanged
///
/// # Examples
///
/// ```
/// use sumd_bridge::channels::ChannelUpdate;
///
/// let update = ChannelUpdate::new().pitch(1600).throttle(1200);
/// assert_eq!(update.pitch, Some(1600));
/// assert_eq!(update.roll, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelUpdate {
    pub roll: Option<u16>,
    pub pitch: Option<u16>,
    pub yaw: Option<u16>,
    pub throttle: Option<u16>,
    pub aux1: Option<u16>,
}

impl ChannelUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roll(mut self, value: u16) -> Self {
        self.roll = Some(value);
        self
    }

    pub fn pitch(mut self, value: u16) -> Self {
        self.pitch = Some(value);
        self
    }

    pub fn yaw(mut self, value: u16) -> Self {
        self.yaw = Some(value);
        self
    }

    pub fn throttle(mut self, value: u16) -> Self {
        self.throttle = Some(value);
        self
    }

    pub fn aux1(mut self, value: u16) -> Self {
        self.aux1 = Some(value);
        self
    }

    /// Apply every provided field to `set`
    pub fn apply_to(&self, set: &mut ChannelSet) {
        for channel in Channel::ALL {
            if let Some(value) = self.value_for(channel) {
                set.set(channel, value);
            }
        }
    }

    fn value_for(&self, channel: Channel) -> Option<u16> {
        match channel {
            Channel::Roll => self.roll,
            Channel::Pitch => self.pitch,
            Channel::Yaw => self.yaw,
            Channel::Throttle => self.throttle,
            Channel::Aux1 => self.aux1,
        }
    }
}
