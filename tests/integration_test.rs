use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to run hintsh with an isolated HOME and capture output
fn run_hintsh(home: &Path, args: &[&str]) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hintsh"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("GEMINI_API_KEY");

    // Offline mode for deterministic testing
    cmd.env("HINTSH_OFFLINE", "1");

    Ok(cmd.output()?)
}

fn run_line(line: &str) -> Result<String> {
    let home = TempDir::new()?;
    let output = run_hintsh(home.path(), &["-c", line])?;
    assert!(output.status.success(), "hintsh should exit cleanly for {line:?}");
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[test]
fn test_find_python_files_offline() -> Result<()> {
    let stdout = run_line("!find python files")?;

    assert!(stdout.contains("File Search"), "Stdout: {}", stdout);
    assert!(stdout.contains("find . -type f -name '*.py'"), "Stdout: {}", stdout);
    assert!(stdout.contains("[pattern-fallback]"));

    Ok(())
}

#[test]
fn test_git_force_push_uses_lease() -> Result<()> {
    let stdout = run_line("!git push --force")?;

    assert!(stdout.contains("git push --force-with-lease"), "Stdout: {}", stdout);
    assert!(
        stdout.split_whitespace().all(|token| token != "--force"),
        "Should never suggest a bare --force. Stdout: {}",
        stdout
    );

    Ok(())
}

#[test]
fn test_bare_git_is_status() -> Result<()> {
    let stdout = run_line("!git")?;

    assert!(stdout.contains("Git Suggestion"));
    assert!(stdout.contains("git status"), "Stdout: {}", stdout);

    Ok(())
}

#[test]
fn test_cd_to_missing_directory_reports_error() -> Result<()> {
    let stdout = run_line("cd /does/not/exist")?;

    assert!(stdout.contains("Error:"), "Stdout: {}", stdout);
    assert!(stdout.contains("/does/not/exist"));

    Ok(())
}

#[test]
fn test_system_command_passthrough() -> Result<()> {
    let stdout = run_line("echo test_system_command")?;

    assert!(stdout.contains("test_system_command"), "Stdout: {}", stdout);
    assert!(!stdout.contains("Try This"));

    Ok(())
}

#[test]
fn test_failed_command_offline_shows_error_panel() -> Result<()> {
    let stdout = run_line("ls /definitely/not/here")?;

    assert!(stdout.contains("offline"), "Stdout: {}", stdout);
    assert!(stdout.contains("Type !help for assistance"));

    Ok(())
}

#[test]
fn test_help_panel() -> Result<()> {
    let stdout = run_line("!help")?;

    assert!(stdout.contains("COMMAND HELP"));
    assert!(stdout.contains("!explain [cmd]"));
    assert!(stdout.contains("!find [query]"));

    Ok(())
}

#[test]
fn test_question_offline_is_reported_not_fatal() -> Result<()> {
    let stdout = run_line("?what is a symlink")?;

    assert!(stdout.contains("Error:"), "Stdout: {}", stdout);
    assert!(stdout.contains("Type !help for assistance"));

    Ok(())
}

#[test]
fn test_set_api_key_persists_config() -> Result<()> {
    let home = TempDir::new()?;

    let output = run_hintsh(home.path(), &["--set-api-key", "test-key-123"])?;
    assert!(output.status.success());

    let content = std::fs::read_to_string(home.path().join(".hintsh").join("config.toml"))?;
    assert!(content.contains("gemini_api_key = \"test-key-123\""), "Config: {}", content);

    let output = run_hintsh(home.path(), &["--config"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Status: Found"));
    assert!(stdout.contains("API Key: Set"));

    Ok(())
}
