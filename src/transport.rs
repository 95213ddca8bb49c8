//! The line-oriented byte channel a [`Session`](crate::Session) talks through.

use async_trait::async_trait;
use std::io;
use std::time::Duration;

/// A character console: serial line, PTY, or anything else that yields
/// unframed text.
///
/// Implementations are used by one session at a time and need not be
/// reentrant.
#[async_trait]
pub trait Transport: Send {
    /// Read one line, waiting at most `timeout`.
    ///
    /// Returns the bytes up to and including `\n`, the partial line collected
    /// when the timeout expires, or an empty vector if nothing arrived.
    async fn read_line(&mut self, timeout: Duration) -> io::Result<Vec<u8>>;

    /// Read every line the console emits until it goes quiet.
    ///
    /// Must return within a bounded time even when the console never stops
    /// printing; whatever was collected by then is returned.
    ///
    /// A trailing line without `\n` (such as `login: `) is included. The
    /// result may be empty.
    async fn read_all_buffered(&mut self) -> io::Result<Vec<Vec<u8>>>;

    /// Write raw bytes to the console.
    async fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Release the underlying device. Calling it twice is harmless.
    fn close(&mut self);
}
