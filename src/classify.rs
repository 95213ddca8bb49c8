//! Raw-byte pattern classification of console output.
//!
//! Nothing here waits or writes: each function maps captured bytes to a
//! state tag, and the login and reboot flows decide what to do with it.
//! Matching is case-sensitive substring containment on the undecoded bytes.

/// Printed by `getty` when it wants a user name.
pub const LOGIN_PROMPT: &[u8] = b"login:";
/// Printed when the console is waiting for a password.
pub const PASSWORD_PROMPT: &[u8] = b"password:";
/// Printed by `login` after a bad user name or password.
pub const LOGIN_INCORRECT: &[u8] = b"login incorrect";

/// Where the login handshake thinks the console is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    FreshLoginPrompt,
    StalePasswordPrompt,
    AssumedLoggedIn,
    AuthenticationFailed,
    AuthenticationConfirmed,
    AuthenticationUnknown,
}

/// Where the reboot monitor thinks the console is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootState {
    Booting,
    Unresponsive,
    LoginPromptReappeared,
    TimedOut,
}

/// Whether `needle` occurs anywhere in `haystack`.
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// The shell prompt marker for `user`, e.g. `root@`.
pub fn shell_marker(user: &str) -> Vec<u8> {
    format!("{user}@").into_bytes()
}

/// Whether a line asks for a user name or a password.
pub fn is_prompt(line: &[u8]) -> bool {
    contains(line, LOGIN_PROMPT) || contains(line, PASSWORD_PROMPT)
}

/// Classify the console from the last line printed after the primer newline.
///
/// Only one of [`LoginState::FreshLoginPrompt`],
/// [`LoginState::StalePasswordPrompt`] or [`LoginState::AssumedLoggedIn`]
/// is returned.
pub fn classify_prompt(last_line: &[u8]) -> LoginState {
    if contains(last_line, LOGIN_PROMPT) {
        LoginState::FreshLoginPrompt
    } else if contains(last_line, PASSWORD_PROMPT) {
        LoginState::StalePasswordPrompt
    } else {
        LoginState::AssumedLoggedIn
    }
}

/// Classify one line read while waiting for the shell after credentials.
///
/// A rejection wins over the shell marker when both appear on one line.
pub fn classify_confirmation(line: &[u8], marker: &[u8]) -> LoginState {
    if contains(line, LOGIN_INCORRECT) {
        LoginState::AuthenticationFailed
    } else if contains(line, marker) {
        LoginState::AuthenticationConfirmed
    } else {
        LoginState::AuthenticationUnknown
    }
}

/// Classify one line read while a reboot is in progress.
pub fn classify_boot_line(line: &[u8]) -> RebootState {
    if line.is_empty() {
        RebootState::Unresponsive
    } else if contains(line, LOGIN_PROMPT) {
        RebootState::LoginPromptReappeared
    } else {
        RebootState::Booting
    }
}

/// Whether `whoami` output names `user`.
///
/// The console echoes the command, prints the answer and then a fresh
/// prompt, so the answer is the second-to-last captured line.
pub fn identity_matches(snapshot: &[Vec<u8>], user: &str) -> bool {
    snapshot
        .len()
        .checked_sub(2)
        .and_then(|idx| snapshot.get(idx))
        .is_some_and(|line| contains(line, user.as_bytes()))
}
