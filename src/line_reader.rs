use std::io::{self, ErrorKind, Read};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{Instant, timeout_at};

/// Splits a raw console byte stream into lines.
///
/// A background thread pumps bytes from the device into a channel; reads
/// on this side are bounded by tokio timers so the async caller never blocks
/// past its deadline.
pub(crate) struct LineReader {
    rx: UnboundedReceiver<Vec<u8>>,
    pending: Vec<u8>,
    quiet: Duration,
    collect_limit: Duration,
    eof: bool,
}

impl LineReader {
    /// Spawn a thread reading from `reader`. `quiet` is how long the console
    /// must stay silent before [`read_lines`](Self::read_lines) returns;
    /// `collect_limit` caps that call for consoles that never go quiet.
    pub fn spawn<R: Read + Send + 'static>(
        mut reader: R,
        quiet: Duration,
        collect_limit: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        thread::spawn(move || {
            let mut buffer = [0u8; 4096];
            loop {
                match reader.read(&mut buffer) {
                    Ok(0) => break, // EOF
                    Ok(n) => {
                        if tx.send(buffer[..n].to_vec()).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    // Serial ports surface their poll interval as a timeout error.
                    Err(e)
                        if matches!(
                            e.kind(),
                            ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                        ) =>
                    {
                        if tx.is_closed() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "console reader stopped");
                        break;
                    }
                }
            }
        });

        Self::from_receiver(rx, quiet, collect_limit)
    }

    pub fn from_receiver(
        rx: UnboundedReceiver<Vec<u8>>,
        quiet: Duration,
        collect_limit: Duration,
    ) -> Self {
        Self {
            rx,
            pending: Vec::new(),
            quiet,
            collect_limit,
            eof: false,
        }
    }

    /// Read one `\n`-terminated line, or whatever arrived before `limit`.
    pub async fn read_line(&mut self, limit: Duration) -> io::Result<Vec<u8>> {
        let deadline = Instant::now() + limit;
        loop {
            if let Some(line) = self.take_line() {
                return Ok(line);
            }
            if self.eof {
                return self.take_rest();
            }
            match timeout_at(deadline, self.rx.recv()).await {
                Ok(Some(chunk)) => self.pending.extend_from_slice(&chunk),
                Ok(None) => self.eof = true,
                Err(_) => return Ok(std::mem::take(&mut self.pending)),
            }
        }
    }

    /// Collect output until the console has been quiet for the quiet period
    /// or the collect limit has passed, then return every line, including a
    /// trailing partial one.
    pub async fn read_lines(&mut self) -> io::Result<Vec<Vec<u8>>> {
        let deadline = Instant::now() + self.collect_limit;
        while !self.eof {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match timeout_at((now + self.quiet).min(deadline), self.rx.recv()).await {
                Ok(Some(chunk)) => self.pending.extend_from_slice(&chunk),
                Ok(None) => self.eof = true,
                Err(_) => break,
            }
        }

        if self.eof && self.pending.is_empty() {
            return Err(closed());
        }

        let mut lines = Vec::new();
        while let Some(line) = self.take_line() {
            lines.push(line);
        }
        if !self.pending.is_empty() {
            lines.push(std::mem::take(&mut self.pending));
        }
        Ok(lines)
    }

    /// Stop accepting data; the reader thread exits on its next poll.
    pub fn close(&mut self) {
        self.rx.close();
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let end = self.pending.iter().position(|b| *b == b'\n')?;
        Some(self.pending.drain(..=end).collect())
    }

    fn take_rest(&mut self) -> io::Result<Vec<u8>> {
        if self.pending.is_empty() {
            Err(closed())
        } else {
            Ok(std::mem::take(&mut self.pending))
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, "console stream closed")
}
