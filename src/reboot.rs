//! The reboot monitor.
//!
//! Boot logs arrive in bursts separated by long silences, so the monitor
//! only gives up after a run of consecutive empty reads. When the budget is
//! spent it scans one last buffer in full, since the prompt may have been
//! printed in the same burst as other boot output.

use crate::classify::{RebootState, classify_boot_line, is_prompt};
use crate::error::{RebootOutcome, Result};
use crate::event::Progress;
use crate::session::Session;
use crate::timing::HangCounter;

/// Write `reboot` and wait for a login prompt to come back.
pub async fn monitor_reboot(session: &mut Session) -> Result<RebootOutcome> {
    session.send_line("reboot").await?;
    session.emit(Progress::RebootIssued);

    let timing = session.timing().clone();
    let mut hang = HangCounter::new(timing.hang_budget);

    while !hang.exhausted() {
        let line = session.read_line().await?;
        match classify_boot_line(&line) {
            RebootState::LoginPromptReappeared => {
                hang.reset();
                if confirm_prompt(session).await? {
                    session.emit(Progress::PromptReappeared);
                    return Ok(RebootOutcome::PromptReappeared);
                }
            }
            RebootState::Booting => hang.reset(),
            RebootState::Unresponsive | RebootState::TimedOut => {
                let silent = hang.tick();
                if silent == timing.boot_notice_at {
                    session.emit(Progress::ReceivingBootOutput);
                } else if timing.is_silence_milestone(silent) {
                    session.emit(Progress::Silence {
                        elapsed: silent,
                        budget: hang.budget(),
                    });
                }
            }
        }
    }

    final_check(session).await
}

/// Nudge the console and check whether the last line it prints is a prompt.
async fn confirm_prompt(session: &mut Session) -> Result<bool> {
    session.write(b"\n").await?;
    session.settle().await;
    let snapshot = session.read_lines().await?;
    Ok(snapshot.last().is_some_and(|line| is_prompt(line)))
}

/// Scan every buffered line, not only the last, for a prompt.
async fn final_check(session: &mut Session) -> Result<RebootOutcome> {
    session.emit(Progress::FinalCheck);
    session.write(b"\n").await?;
    session.settle().await;
    let lines = session.read_lines().await?;

    if lines.iter().any(|line| is_prompt(line)) {
        session.emit(Progress::PromptRecovered);
        Ok(RebootOutcome::PromptRecovered)
    } else {
        session.emit(Progress::RebootTimedOut);
        Ok(RebootOutcome::TimedOut)
    }
}
