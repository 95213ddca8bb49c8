use crate::error::{Result, SessionError};
use crate::line_reader::LineReader;
use crate::timing::Timing;
use crate::transport::Transport;
use async_trait::async_trait;
use portable_pty::{Child, CommandBuilder, MasterPty, PtySize};
use std::io::{self, Write};
use std::time::Duration;

/// A console reached through a program running inside a PTY, such as
/// `virsh console`, `qemu-system-* -nographic` or `picocom`.
pub struct PtyTransport {
    #[allow(dead_code)]
    master: Box<dyn MasterPty + Send>,
    child: Option<Box<dyn Child + Send + Sync>>,
    writer: Option<Box<dyn Write + Send>>,
    lines: LineReader,
}

impl PtyTransport {
    /// Spawn `command` in a PTY. Buffered reads follow `timing.read_timeout`
    /// and `timing.collect_limit`.
    pub fn spawn(command: &str, args: &[String], timing: &Timing) -> Result<Self> {
        let spawn_err = |reason: String| SessionError::Spawn {
            command: command.to_string(),
            reason,
        };

        let pty_system = portable_pty::native_pty_system();

        // Serial consoles assume a classic 80x24 terminal.
        let pty_size = PtySize {
            rows: 24,
            cols: 80,
            pixel_width: 0,
            pixel_height: 0,
        };

        let pair = pty_system
            .openpty(pty_size)
            .map_err(|e| spawn_err(format!("failed to open PTY: {e}")))?;

        let mut cmd = CommandBuilder::new(command);
        for arg in args {
            cmd.arg(arg);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| spawn_err(e.to_string()))?;

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| spawn_err(format!("failed to get PTY writer: {e}")))?;

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| spawn_err(format!("failed to get PTY reader: {e}")))?;

        tracing::debug!(command, ?args, "spawned console command");

        Ok(PtyTransport {
            master: pair.master,
            child: Some(child),
            writer: Some(writer),
            lines: LineReader::spawn(reader, timing.read_timeout, timing.collect_limit),
        })
    }

    /// Check if the console program is still running
    pub fn is_running(&mut self) -> bool {
        self.child
            .as_mut()
            .is_some_and(|child| child.try_wait().ok().flatten().is_none())
    }
}

#[async_trait]
impl Transport for PtyTransport {
    async fn read_line(&mut self, timeout: Duration) -> io::Result<Vec<u8>> {
        self.lines.read_line(timeout).await
    }

    async fn read_all_buffered(&mut self) -> io::Result<Vec<Vec<u8>>> {
        self.lines.read_lines().await
    }

    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "PTY closed"))?;
        writer.write_all(data)?;
        writer.flush()?;
        tracing::trace!(bytes = data.len(), "wrote to PTY");
        Ok(())
    }

    fn close(&mut self) {
        self.writer = None;
        self.lines.close();
        let running = self.is_running();
        if let Some(mut child) = self.child.take() {
            if running {
                if let Err(e) = child.kill() {
                    tracing::debug!(error = %e, "failed to stop console command");
                }
            }
            let _ = child.wait();
        }
    }
}
