//! # SUMD Protocol Constants and Types
//!
//! Core protocol definitions for SUMD frames.
//!
//! ```text
//! +------+------+-----+----------------------+---------+
//! | 0xA8 | 0x01 |  N  | N x u16 (big-endian) | CRC u16 |
//! +------+------+-----+----------------------+---------+
//! ```

/// SUMD frame start marker (always 0xA8)
pub const SUMD_HEADER_ID: u8 = 0xA8;

/// Format byte for SUMD frames (0x00 would be the legacy SUMH variant)
pub const SUMD_ID_SUMD: u8 = 0x01;

/// Number of channels transmitted: roll, pitch, throttle, yaw, aux1
pub const SUMD_NUM_CHANNELS: usize = 5;

/// Header size: start marker + format byte + channel count
pub const SUMD_HEADER_SIZE: usize = 3;

/// Trailing CRC size
pub const SUMD_CRC_SIZE: usize = 2;

/// Payload size (2 bytes per channel)
pub const SUMD_PAYLOAD_SIZE: usize = 2 * SUMD_NUM_CHANNELS;

/// Complete frame size (15 bytes for 5 channels)
pub const SUMD_FRAME_SIZE: usize = SUMD_HEADER_SIZE + SUMD_PAYLOAD_SIZE + SUMD_CRC_SIZE;

/// Multiplier from the flight controller range (1000-2000) to the wire range (8000-16000)
pub const SUMD_SCALE: u16 = 8;

/// Nominal raw channel range
pub const CHANNEL_VALUE_MIN: u16 = 1000;
pub const CHANNEL_VALUE_MAX: u16 = 2000;
pub const CHANNEL_VALUE_CENTER: u16 = 1500;

/// Low throttle used at power-on; many flight controllers refuse to arm above it
pub const THROTTLE_ARMING_DEFAULT: u16 = 1040;

/// Channel values in wire order: `[roll, pitch, throttle, yaw, aux1]`
pub type SumdChannels = [u16; SUMD_NUM_CHANNELS];

/// Scale a raw channel value into the SUMD wire range
///
/// Values are not range checked. Anything above 8191 saturates at
/// `u16::MAX` since it no longer fits the 16-bit field.
///
/// # Examples
///
/// ```
/// use sumd_bridge::sumd::protocol::scale_to_wire;
///
/// assert_eq!(scale_to_wire(1000), 8000);
/// assert_eq!(scale_to_wire(2000), 16000);
/// ```
pub fn scale_to_wire(value: u16) -> u16 {
    value.saturating_mul(SUMD_SCALE)
}
