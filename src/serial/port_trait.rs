//! # Port Abstraction
//!
//! The sender only ever pushes bytes and drains them, so that is all a port
//! has to offer. Tests plug in [`mocks::MockSerialPort`] instead of a UART.

use std::io;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio_serial::SerialStream;

/// Byte sink that SUMD frames are written to
#[async_trait]
pub trait SerialPortIO: Send {
    /// Queue all of `data`; a caller-side timeout may cancel this part way
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Wait until queued bytes have left for the UART
    async fn flush(&mut self) -> io::Result<()>;
}

/// An opened tokio-serial stream
pub struct TokioSerialPort(SerialStream);

impl TokioSerialPort {
    pub fn new(stream: SerialStream) -> Self {
        Self(stream)
    }
}

#[async_trait]
impl SerialPortIO for TokioSerialPort {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        AsyncWriteExt::write_all(&mut self.0, data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        AsyncWriteExt::flush(&mut self.0).await
    }
}
