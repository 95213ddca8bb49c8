//! [`Session`]: exclusive ownership of one console transport.

use crate::error::{LoginOutcome, RebootOutcome, Result, SessionError};
use crate::event::{Progress, ProgressHandler, log_progress};
use crate::login::{self, Credentials};
use crate::pty::PtyTransport;
use crate::reboot;
use crate::serial::SerialTransport;
use crate::timing::Timing;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// A console session.
///
/// The transport is released by [`close`](Self::close) or when the session
/// is dropped. Every operation on a closed session fails with
/// [`SessionError::Closed`].
pub struct Session {
    transport: Option<Box<dyn Transport>>,
    timing: Timing,
    progress: ProgressHandler,
}

impl Session {
    /// Wrap an already opened transport.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Some(Box::new(transport)),
            timing: Timing::default(),
            progress: log_progress(),
        }
    }

    /// Open a serial console at `baud`.
    pub fn open_serial(port: &str, baud: u32, timing: Timing) -> Result<Self> {
        let transport = SerialTransport::open(port, baud, &timing)?;
        Ok(Self::new(transport).with_timing(timing))
    }

    /// Run `command` inside a PTY and treat its terminal as the console.
    pub fn spawn(command: &str, args: &[String], timing: Timing) -> Result<Self> {
        let transport = PtyTransport::spawn(command, args, &timing)?;
        Ok(Self::new(transport).with_timing(timing))
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Route [`Progress`] events to `handler` instead of `tracing`.
    pub fn with_progress_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.progress = Arc::new(handler);
        self
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    fn transport(&mut self) -> Result<&mut Box<dyn Transport>> {
        self.transport.as_mut().ok_or(SessionError::Closed)
    }

    /// Read one line, waiting at most one read timeout.
    pub async fn read_line(&mut self) -> Result<Vec<u8>> {
        let timeout = self.timing.read_timeout;
        Ok(self.transport()?.read_line(timeout).await?)
    }

    /// Read one line, waiting at most `limit` or one read timeout, whichever
    /// is shorter.
    pub async fn read_line_within(&mut self, limit: Duration) -> Result<Vec<u8>> {
        let timeout = self.timing.read_timeout.min(limit);
        Ok(self.transport()?.read_line(timeout).await?)
    }

    /// Read every line the console emits until it goes quiet, or until the
    /// transport's collect limit passes.
    pub async fn read_lines(&mut self) -> Result<Vec<Vec<u8>>> {
        Ok(self.transport()?.read_all_buffered().await?)
    }

    /// Write raw bytes.
    pub async fn write(&mut self, data: &[u8]) -> Result<()> {
        Ok(self.transport()?.write(data).await?)
    }

    /// Write `text` followed by a newline.
    pub async fn send_line(&mut self, text: &str) -> Result<()> {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(b'\n');
        self.write(&bytes).await
    }

    /// Wait the settle delay so the console can answer the last write.
    pub async fn settle(&self) {
        sleep(self.timing.settle).await;
    }

    pub async fn pause(&self, duration: Duration) {
        sleep(duration).await;
    }

    /// Hand an event to the progress handler.
    pub fn emit(&self, event: Progress) {
        (self.progress)(&event);
    }

    /// Run the login handshake and report the detailed outcome.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<LoginOutcome> {
        login::attempt_login(self, credentials).await
    }

    /// Run the login handshake. `Ok(false)` means the device refused or
    /// never reached a shell.
    pub async fn try_login(&mut self, user: &str, password: Option<&str>) -> Result<bool> {
        let credentials = Credentials::new(user, password);
        Ok(self.login(&credentials).await?.succeeded())
    }

    /// Issue `reboot` and watch for the login prompt to return.
    pub async fn reboot(&mut self) -> Result<RebootOutcome> {
        reboot::monitor_reboot(self).await
    }

    /// Issue `reboot`. `Ok(true)` means a login prompt was seen again.
    pub async fn try_reboot(&mut self) -> Result<bool> {
        Ok(self.reboot().await?.succeeded())
    }

    /// Release the transport. Later calls are no-ops.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
