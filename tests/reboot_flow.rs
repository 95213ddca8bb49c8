mod common;

use common::{ScriptedConsole, session, writes};
use serial_console::{Progress, RebootOutcome};

#[tokio::test(start_paused = true)]
async fn test_prompt_after_short_silence() {
    let console = ScriptedConsole::new()
        .silence(4)
        .line(b"buildbox login: ")
        .snapshot(&[b"\r\n", b"password: "]);
    let (mut session, events) = session(&console);

    let outcome = session.reboot().await.unwrap();

    assert_eq!(outcome, RebootOutcome::PromptReappeared);
    assert_eq!(console.line_reads(), 5);
    assert_eq!(console.writes(), writes(&[b"reboot\n", b"\n"]));
    let events = events.lock().unwrap();
    assert_eq!(events.first(), Some(&Progress::RebootIssued));
    assert_eq!(events.last(), Some(&Progress::PromptReappeared));
    assert!(!events.contains(&Progress::FinalCheck));
}

#[tokio::test(start_paused = true)]
async fn test_final_scan_recovers_missed_prompt() {
    let console = ScriptedConsole::new().snapshot(&[
        b"[  OK  ] Reached target Multi-User System.\r\n",
        b"buildbox login: \r\n",
        b"\r\n",
    ]);
    let (mut session, events) = session(&console);

    let outcome = session.reboot().await.unwrap();

    assert_eq!(outcome, RebootOutcome::PromptRecovered);
    assert_eq!(console.line_reads(), 60);
    assert!(events.lock().unwrap().contains(&Progress::PromptRecovered));
}

#[tokio::test(start_paused = true)]
async fn test_silent_device_times_out() {
    let console = ScriptedConsole::new();
    let (mut session, events) = session(&console);

    assert!(!session.try_reboot().await.unwrap());
    assert_eq!(console.line_reads(), 60);
    assert_eq!(console.writes(), writes(&[b"reboot\n", b"\n"]));

    let events = events.lock().unwrap();
    let notices = events
        .iter()
        .filter(|e| **e == Progress::ReceivingBootOutput)
        .count();
    assert_eq!(notices, 1);

    let milestones: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            Progress::Silence { elapsed, budget } => {
                assert_eq!(*budget, 60);
                Some(*elapsed)
            }
            _ => None,
        })
        .collect();
    assert_eq!(milestones, vec![30, 35, 40, 45, 50, 55, 60]);
    assert_eq!(events.last(), Some(&Progress::RebootTimedOut));
}

#[tokio::test(start_paused = true)]
async fn test_false_alarm_keeps_polling() {
    let console = ScriptedConsole::new()
        .line(b"Last login: Mon Oct 19 09:12:44 on ttyS0\r\n")
        .snapshot(&[b"systemd[1]: Stopping User Login Management...\r\n"])
        .silence(10)
        .line(b"buildbox login: ")
        .snapshot(&[b"buildbox login: "]);
    let (mut session, _events) = session(&console);

    let outcome = session.reboot().await.unwrap();

    assert_eq!(outcome, RebootOutcome::PromptReappeared);
    assert_eq!(console.line_reads(), 12);
    assert_eq!(console.writes(), writes(&[b"reboot\n", b"\n", b"\n"]));
}

#[tokio::test(start_paused = true)]
async fn test_boot_output_resets_hang_budget() {
    let console = ScriptedConsole::new()
        .silence(50)
        .line(b"[    0.000000] Linux version 6.1.0-26-amd64\r\n")
        .silence(50);
    let (mut session, _events) = session(&console);

    let outcome = session.reboot().await.unwrap();

    assert_eq!(outcome, RebootOutcome::TimedOut);
    assert_eq!(console.line_reads(), 50 + 1 + 60);
}

#[tokio::test(start_paused = true)]
async fn test_hang_budget_is_fresh_per_invocation() {
    let console = ScriptedConsole::new()
        .silence(50)
        .line(b"buildbox login: ")
        .snapshot(&[b"buildbox login: "])
        .silence(50)
        .line(b"buildbox login: ")
        .snapshot(&[b"password: "]);
    let (mut session, _events) = session(&console);

    assert_eq!(
        session.reboot().await.unwrap(),
        RebootOutcome::PromptReappeared
    );
    assert_eq!(
        session.reboot().await.unwrap(),
        RebootOutcome::PromptReappeared
    );
    assert_eq!(console.line_reads(), 102);
}
