//! Error and outcome types.
//!
//! Device behaviour that the state machines expect to see (a rejected
//! password, a console that stays silent) is reported as a [`Failure`]
//! value inside an outcome. [`SessionError`] is reserved for faults: misuse
//! of a closed session, or a transport that can no longer be read or written.

use std::fmt;
use std::io;
use thiserror::Error;

/// Faults raised by a [`Session`](crate::Session) or its transport.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session was closed and cannot be used any more.
    #[error("session is already closed")]
    Closed,

    /// A login was requested without a user name.
    #[error("user name must not be empty")]
    EmptyUser,

    /// Reading from or writing to the console failed.
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),

    /// The serial device could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// The console command could not be started inside a PTY.
    #[error("failed to spawn console command {command}: {reason}")]
    Spawn { command: String, reason: String },
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;

/// Why a login or reboot flow gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Nothing came back when a response was required.
    NoResponse,
    /// The device printed `login incorrect`.
    CredentialsRejected,
    /// `whoami` did not report the expected user.
    IdentityMismatch,
    /// The hang budget ran out before a recognised state appeared.
    ObservationTimeout,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Failure::NoResponse => "no response from console",
            Failure::CredentialsRejected => "credentials rejected",
            Failure::IdentityMismatch => "unexpected response from OS",
            Failure::ObservationTimeout => "timed out waiting for console",
        };
        f.write_str(text)
    }
}

/// Result of a login handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    Failed(Failure),
}

impl LoginOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated)
    }
}

/// Result of a supervised reboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootOutcome {
    /// A login prompt was seen and confirmed while polling.
    PromptReappeared,
    /// The budget ran out but the final buffer scan found a prompt.
    PromptRecovered,
    /// No prompt was observed at all.
    TimedOut,
}

impl RebootOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, RebootOutcome::TimedOut)
    }

    /// The failure reason, if the reboot was not confirmed.
    pub fn failure(&self) -> Option<Failure> {
        match self {
            RebootOutcome::TimedOut => Some(Failure::ObservationTimeout),
            _ => None,
        }
    }
}
