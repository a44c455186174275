//! Startup behavior of the binary

use std::process::Command;
use tempfile::TempDir;

fn bot_command(dir: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_homework-status-bot"));
    command.current_dir(dir.path()).env_clear();
    command
}

#[test]
fn missing_secrets_exit_before_polling() {
    let dir = TempDir::new().unwrap();
    // An unroutable endpoint: if the bot got as far as polling it would hang
    // on the request instead of exiting.
    let output = bot_command(&dir)
        .env("PRACTICUM_TOKEN", "practicum-token")
        .env("TELEGRAM_CHAT_ID", "100500")
        .env("PRACTICUM_ENDPOINT", "http://10.255.255.1/statuses/")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let log = std::fs::read_to_string(dir.path().join("program.log")).unwrap();
    assert!(log.contains("TELEGRAM_TOKEN"), "log: {}", log);
    assert!(log.contains("critical=true"), "log: {}", log);
    assert!(!log.contains("poll loop started"), "log: {}", log);
}

#[test]
fn no_environment_at_all_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let output = bot_command(&dir).output().unwrap();

    assert!(!output.status.success());
    let log = std::fs::read_to_string(dir.path().join("program.log")).unwrap();
    assert!(log.contains("PRACTICUM_TOKEN"), "log: {}", log);
    assert!(log.contains("TELEGRAM_CHAT_ID"), "log: {}", log);
}
