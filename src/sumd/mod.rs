//! # SUMD Protocol Module
//!
//! Implementation of the Graupner SUMD serial receiver protocol.
//!
//! This module handles:
//! - SUMD frame encoding (header, 16-bit big-endian channels, CRC)
//! - Scaling from the 1000-2000 flight controller range to the wire range
//! - CRC-16/CCITT checksum calculation

pub mod protocol;
pub mod encoder;
pub mod crc;
