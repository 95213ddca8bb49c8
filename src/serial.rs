use crate::error::{Result, SessionError};
use crate::line_reader::LineReader;
use crate::timing::Timing;
use crate::transport::Transport;
use async_trait::async_trait;
use serialport::SerialPort;
use std::io::{self, Write};
use std::time::Duration;

/// How often the reader thread wakes up to notice a closed session.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A console on a local serial device, 8N1 without flow control.
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    lines: LineReader,
}

impl SerialTransport {
    /// Open `path` at `baud`. Buffered reads follow `timing.read_timeout`
    /// and `timing.collect_limit`.
    pub fn open(path: &str, baud: u32, timing: &Timing) -> Result<Self> {
        let open_err = |source| SessionError::Open {
            port: path.to_string(),
            source,
        };

        let port = serialport::new(path, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(POLL_INTERVAL)
            .open()
            .map_err(open_err)?;
        let reader = port.try_clone().map_err(open_err)?;

        tracing::debug!(port = path, baud, "opened serial console");

        Ok(Self {
            port: Some(port),
            lines: LineReader::spawn(reader, timing.read_timeout, timing.collect_limit),
        })
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn read_line(&mut self, timeout: Duration) -> io::Result<Vec<u8>> {
        self.lines.read_line(timeout).await
    }

    async fn read_all_buffered(&mut self) -> io::Result<Vec<Vec<u8>>> {
        self.lines.read_lines().await
    }

    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port closed"))?;
        port.write_all(data)?;
        port.flush()?;
        tracing::trace!(bytes = data.len(), "wrote to serial port");
        Ok(())
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            tracing::debug!("closed serial console");
        }
        self.lines.close();
    }
}
