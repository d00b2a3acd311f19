use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;
use ticketmarket_core::{load_market_config, save_market_config, MarketConfig};

/// Write a settings file for a fast one-second run
fn write_settings(dir: &Path) -> PathBuf {
    let settings_path = dir.join("ticketmarket.toml");
    let market_path = dir.join("market.json");
    std::fs::write(
        &settings_path,
        format!(
            r#"
market_config_path = "{}"

[simulation]
tick_ms = 5
run_secs = 1
shutdown_grace_ms = 1000
"#,
            market_path.display()
        ),
    )
    .unwrap();
    settings_path
}

/// Run the binary, feeding `stdin` to it
fn run_cli(settings_path: &Path, stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ticketmarket"))
        .env("TICKETMARKET_SETTINGS", settings_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn ticketmarket");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child
        .wait_with_output()
        .expect("Failed to wait for ticketmarket")
}

#[test]
fn test_run_with_saved_config() {
    let dir = TempDir::new().unwrap();
    let settings_path = write_settings(dir.path());
    save_market_config(
        &MarketConfig::new(20, 2, 2, 10),
        &dir.path().join("market.json"),
    )
    .unwrap();

    let output = run_cli(&settings_path, "");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration inputs received successfully!"));
    assert!(stdout.contains("Total Tickets: 20"));
    assert!(stdout.contains("Customer 1 ("));
    assert!(stdout.contains("Customer 2 ("));
}

#[test]
fn test_prompts_and_saves_config() {
    let dir = TempDir::new().unwrap();
    let settings_path = write_settings(dir.path());

    let output = run_cli(&settings_path, "abc\n12\n3\n2\n6\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Invalid input. Please enter a positive integer."));
    assert!(stdout.contains("Max Ticket Capacity: 6"));

    let saved = load_market_config(&dir.path().join("market.json")).unwrap();
    assert_eq!(saved, MarketConfig::new(12, 3, 2, 6));
}

#[test]
fn test_closed_stdin_without_config_fails() {
    let dir = TempDir::new().unwrap();
    let settings_path = write_settings(dir.path());

    let output = run_cli(&settings_path, "");
    assert!(!output.status.success());
}
