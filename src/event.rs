use crate::classify::LoginState;
use crate::error::Failure;
use std::fmt;
use std::sync::Arc;

/// Progress notifications emitted by the login and reboot flows.
///
/// These carry no control-flow meaning; they exist so callers can narrate
/// what the console is doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A bare newline was written to refresh the prompt.
    PrimerSent,

    /// The refreshed prompt was classified.
    PromptClassified(LoginState),

    /// User name and password were written.
    CredentialsSent { user: String },

    /// `whoami` was written to check the logged-in user.
    VerifyingIdentity { user: String },

    /// The handshake confirmed a shell for `user`.
    LoginSucceeded { user: String },

    /// The handshake gave up.
    LoginFailed { user: String, reason: Failure },

    /// `reboot` was written.
    RebootIssued,

    /// The console has been quiet long enough that boot output is expected.
    ReceivingBootOutput,

    /// The console has been silent for `elapsed` of `budget` cycles.
    Silence { elapsed: u32, budget: u32 },

    /// A login prompt was confirmed after the reboot.
    PromptReappeared,

    /// The hang budget ran out; scanning whatever is buffered.
    FinalCheck,

    /// The final scan found a prompt that the polling loop missed.
    PromptRecovered,

    /// No prompt appeared within the budget.
    RebootTimedOut,

    /// Free-form text from a console script.
    Note(String),
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::PrimerSent => write!(f, "Refreshing console prompt"),
            Progress::PromptClassified(LoginState::FreshLoginPrompt) => {
                write!(f, "Caught login prompt")
            }
            Progress::PromptClassified(LoginState::StalePasswordPrompt) => {
                write!(f, "Missed login prompt, retrying login")
            }
            Progress::PromptClassified(LoginState::AssumedLoggedIn) => {
                write!(f, "No login prompt, assuming an active session")
            }
            Progress::PromptClassified(state) => write!(f, "Console state: {state:?}"),
            Progress::CredentialsSent { user } => write!(f, "Attempting credentials for {user}"),
            Progress::VerifyingIdentity { user } => write!(f, "Sanity checking user is {user}"),
            Progress::LoginSucceeded { user } => write!(f, "Successful login for {user}"),
            Progress::LoginFailed { user, reason } => write!(f, "Login failed for {user}: {reason}"),
            Progress::RebootIssued => write!(f, "System rebooting..."),
            Progress::ReceivingBootOutput => write!(f, "Receiving platform boot output..."),
            Progress::Silence { elapsed, budget } => {
                write!(f, "No response after {elapsed} cycles ({elapsed}/{budget})")
            }
            Progress::PromptReappeared => write!(f, "Caught login prompt"),
            Progress::FinalCheck => write!(f, "Timeout response from system, final state check"),
            Progress::PromptRecovered => write!(f, "Caught login prompt (prompt missed)"),
            Progress::RebootTimedOut => write!(f, "No login prompt after reboot"),
            Progress::Note(text) => f.write_str(text),
        }
    }
}

/// Receives [`Progress`] events from a session.
pub type ProgressHandler = Arc<dyn Fn(&Progress) + Send + Sync>;

/// The handler used when none is supplied: forwards events to `tracing`.
pub fn log_progress() -> ProgressHandler {
    Arc::new(|event: &Progress| tracing::info!("{event}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_display() {
        let event = Progress::Silence {
            elapsed: 35,
            budget: 60,
        };
        assert_eq!(event.to_string(), "No response after 35 cycles (35/60)");
    }

    #[test]
    fn test_login_failed_display() {
        let event = Progress::LoginFailed {
            user: "root".into(),
            reason: Failure::CredentialsRejected,
        };
        assert_eq!(event.to_string(), "Login failed for root: credentials rejected");
    }

    #[test]
    fn test_note_display_is_verbatim() {
        let event = Progress::Note("flashing done: 100%".into());
        assert_eq!(event.to_string(), "flashing done: 100%");
    }
}
