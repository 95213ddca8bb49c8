use std::fs;
use std::process::{Command, Output};

fn run_script(name: &str, script: &str, extra: &[&str]) -> Output {
    let script_path = std::env::temp_dir().join(format!("serial-console-{name}.script"));
    fs::write(&script_path, script).expect("Failed to write test script");

    let output = Command::new(env!("CARGO_BIN_EXE_serial-console"))
        .arg("--script")
        .arg(&script_path)
        .args(extra)
        .output()
        .expect("Failed to execute serial-console");

    let _ = fs::remove_file(&script_path);
    output
}

#[test]
fn test_script_against_pty_shell() {
    // The echoed command line does not contain the expanded marker.
    let script = r#"
send "echo marker-$((40 + 2))"
expect "marker-42" 5s
send "exit"
"#;

    let output = run_script("pty", script, &["--command", "sh"]);

    assert!(
        output.status.success(),
        "serial-console failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("marker-42"), "got: {stdout}");
}

#[test]
fn test_invalid_script() {
    let output = run_script("invalid", "poweroff \"now\"\n", &["--command", "sh"]);

    assert!(
        !output.status.success(),
        "serial-console should fail with invalid command"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown command"),
        "Error should mention unknown command, got: {stderr}"
    );
}

#[test]
fn test_expect_timeout() {
    let script = r#"
send "echo ready"
expect "this_will_never_appear" 2s
"#;

    let output = run_script("timeout", script, &["--command", "sh"]);

    assert!(!output.status.success(), "serial-console should fail with timeout");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Timeout"), "Error should mention timeout, got: {stderr}");
}

#[test]
fn test_console_is_required() {
    let output = run_script("noconsole", "wait 10ms\n", &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--port") || stderr.contains("--command"), "got: {stderr}");
}

#[test]
fn test_missing_serial_port() {
    let output = run_script("noport", "wait 10ms\n", &["--port", "/dev/serial-console-missing"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open console"), "got: {stderr}");
}
