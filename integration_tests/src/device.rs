//! Host end of the node's serial link.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use serialport::SerialPort;

/// Byte sent back to the node after each slot
pub const ACK_BYTE: u8 = 0x06;

/// Client reading the sample stream and answering with acks.
pub struct LinkClient {
    port: Box<dyn SerialPort>,
}

impl LinkClient {
    /// Open the link port.
    pub fn new(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(50))
            .open()?;

        Ok(Self { port })
    }

    /// Discard everything received so far.
    pub fn drain(&mut self) -> Result<()> {
        self.port.clear(serialport::ClearBuffer::All)?;

        let mut buf = [0u8; 256];
        loop {
            match self.port.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Send one ack byte.
    pub fn ack(&mut self) -> Result<()> {
        self.port.write_all(&[ACK_BYTE])?;
        self.port.flush()?;
        Ok(())
    }

    /// Read exactly `len` bytes, or fail after `timeout`.
    pub fn read_exact_within(&mut self, len: usize, timeout: Duration) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(len);
        let mut buf = [0u8; 64];
        let start = Instant::now();

        while data.len() < len {
            if start.elapsed() >= timeout {
                anyhow::bail!(
                    "Timeout waiting for {} bytes, got {}: {:02x?}",
                    len,
                    data.len(),
                    data
                );
            }
            let want = (len - data.len()).min(buf.len());
            match self.port.read(&mut buf[..want]) {
                Ok(n) => data.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(data)
    }

    /// Count bytes received during `window`, sending nothing.
    pub fn count_for(&mut self, window: Duration) -> Result<usize> {
        let mut total = 0;
        let mut buf = [0u8; 256];
        let start = Instant::now();

        while start.elapsed() < window {
            match self.port.read(&mut buf) {
                Ok(n) => total += n,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(total)
    }
}
