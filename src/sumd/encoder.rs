//! # SUMD Frame Encoder
//!
//! Encodes channel values into SUMD frames.

use bytes::{BufMut, BytesMut};

use super::crc::crc16_ccitt;
use super::protocol::*;

/// Encode channel values into a complete SUMD frame
///
/// # Arguments
///
/// * `channels` - Raw channel values in wire order `[roll, pitch, throttle, yaw, aux1]`
///
/// # Returns
///
/// * `Vec<u8>` - Complete SUMD frame (15 bytes: header(3) + payload(10) + crc(2))
///
/// # Examples
///
/// ```
/// use sumd_bridge::sumd::encoder::encode_sumd_frame;
///
/// let frame = encode_sumd_frame(&[1500, 1500, 1040, 1500, 1500]);
/// assert_eq!(frame.len(), 15);
/// assert_eq!(&frame[..3], &[0xA8, 0x01, 0x05]);
/// ```
pub fn encode_sumd_frame(channels: &SumdChannels) -> Vec<u8> {
    let mut frame = BytesMut::with_capacity(SUMD_FRAME_SIZE);

    // Header + payload is exactly what the CRC covers
    frame.put_u8(SUMD_HEADER_ID);
    frame.put_u8(SUMD_ID_SUMD);
    frame.put_u8(SUMD_NUM_CHANNELS as u8);
    frame.extend_from_slice(&encode_sumd_payload(channels));

    let crc = crc16_ccitt(&frame);
    frame.put_u16(crc);

    frame.to_vec()
}

/// Encode channel values into payload (10 bytes)
///
/// Each value is scaled by [`SUMD_SCALE`] and written as a big-endian u16.
pub fn encode_sumd_payload(channels: &SumdChannels) -> Vec<u8> {
    let mut payload = BytesMut::with_capacity(SUMD_PAYLOAD_SIZE);

    for &value in channels.iter() {
        payload.put_u16(scale_to_wire(value));
    }

    payload.to_vec()
}
