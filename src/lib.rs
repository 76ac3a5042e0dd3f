//! # SUMD Bridge Library
//!
//! Drive a flight controller from a keyboard by emulating a Graupner SUMD
//! receiver on a serial port.
//!
//! The core is the [`channels::ChannelStore`], a lock-protected set of five
//! channel values shared between an input path and a periodic sender, and the
//! [`sumd`] encoder that turns a snapshot of it into a CRC-protected frame.

pub mod channels;
pub mod config;
pub mod error;
pub mod input;
pub mod sender;
pub mod serial;
pub mod sumd;
