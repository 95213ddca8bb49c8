//! The login handshake.
//!
//! The console is primed with a newline, the last line it prints is
//! classified, and a state-specific preamble clears the way for the
//! credentials. The handshake then waits for the `<user>@` shell marker and
//! confirms the identity with `whoami`.

use crate::classify::{
    LoginState, classify_confirmation, classify_prompt, identity_matches, shell_marker,
};
use crate::error::{Failure, LoginOutcome, Result, SessionError};
use crate::event::Progress;
use crate::session::Session;
use crate::timing::{HangCounter, Timing};
use std::time::Duration;

/// Ctrl+C followed by a newline; abandons a half-finished login.
const INTERRUPT: &[u8] = b"\x03\n";
const LOGOUT: &[u8] = b"logout\n";

/// A user name and password. A missing password is sent as an empty line.
///
/// The user name must be non-empty; [`attempt_login`] refuses an empty one
/// because its shell marker would be a bare `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: Option<&str>) -> Self {
        Self {
            user: user.into(),
            password: password.unwrap_or_default().to_string(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// What must be written, and how long to wait afterwards, before the
/// credentials can be typed from `state`.
fn preamble(state: LoginState, timing: &Timing) -> Option<(&'static [u8], Duration)> {
    match state {
        LoginState::StalePasswordPrompt => Some((INTERRUPT, timing.interrupt_reset)),
        LoginState::AssumedLoggedIn => Some((LOGOUT, timing.logout_wait)),
        _ => None,
    }
}

/// Log `credentials.user()` in on the console behind `session`.
///
/// Expected device behaviour is reported in the returned [`LoginOutcome`];
/// `Err` is returned for an empty user name, a closed session or a failing
/// transport.
pub async fn attempt_login(session: &mut Session, credentials: &Credentials) -> Result<LoginOutcome> {
    let user = credentials.user();
    if user.is_empty() {
        return Err(SessionError::EmptyUser);
    }

    session.write(b"\n").await?;
    session.emit(Progress::PrimerSent);
    session.settle().await;
    let snapshot = session.read_lines().await?;

    let Some(last) = snapshot.last() else {
        return Ok(failed(session, user, Failure::NoResponse));
    };

    let state = classify_prompt(last);
    session.emit(Progress::PromptClassified(state));

    if let Some((bytes, wait)) = preamble(state, session.timing()) {
        session.write(bytes).await?;
        session.pause(wait).await;
    }
    send_credentials(session, credentials).await?;

    match await_shell(session, user).await? {
        LoginState::AuthenticationConfirmed => {}
        LoginState::AuthenticationFailed => {
            return Ok(failed(session, user, Failure::CredentialsRejected));
        }
        _ => return Ok(failed(session, user, Failure::ObservationTimeout)),
    }

    session.send_line("whoami").await?;
    session.emit(Progress::VerifyingIdentity {
        user: user.to_string(),
    });
    session.settle().await;
    let snapshot = session.read_lines().await?;

    if identity_matches(&snapshot, user) {
        session.emit(Progress::LoginSucceeded {
            user: user.to_string(),
        });
        Ok(LoginOutcome::Authenticated)
    } else {
        Ok(failed(session, user, Failure::IdentityMismatch))
    }
}

async fn send_credentials(session: &mut Session, credentials: &Credentials) -> Result<()> {
    session.emit(Progress::CredentialsSent {
        user: credentials.user().to_string(),
    });
    session.send_line(credentials.user()).await?;
    session.settle().await;
    session.send_line(credentials.password()).await
}

/// Read lines until the shell marker or a rejection shows up.
///
/// Returns [`LoginState::AuthenticationUnknown`] once the hang budget of
/// consecutive empty reads is spent.
async fn await_shell(session: &mut Session, user: &str) -> Result<LoginState> {
    let marker = shell_marker(user);
    let mut hang = HangCounter::new(session.timing().hang_budget);

    loop {
        let line = session.read_line().await?;
        let state = classify_confirmation(&line, &marker);
        if state != LoginState::AuthenticationUnknown {
            return Ok(state);
        }

        hang.observe(&line);
        if hang.exhausted() {
            return Ok(LoginState::AuthenticationUnknown);
        }
    }
}

fn failed(session: &Session, user: &str, reason: Failure) -> LoginOutcome {
    session.emit(Progress::LoginFailed {
        user: user.to_string(),
        reason,
    });
    LoginOutcome::Failed(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_password_is_empty() {
        let credentials = Credentials::new("root", None);
        assert_eq!(credentials.password(), "");
    }

    #[test]
    fn test_preamble_table() {
        let timing = Timing::default();
        assert_eq!(preamble(LoginState::FreshLoginPrompt, &timing), None);
        assert_eq!(
            preamble(LoginState::StalePasswordPrompt, &timing),
            Some((INTERRUPT, Duration::from_secs(5)))
        );
        assert_eq!(
            preamble(LoginState::AssumedLoggedIn, &timing),
            Some((LOGOUT, Duration::from_secs(2)))
        );
    }
}
