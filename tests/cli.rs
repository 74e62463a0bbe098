use assert_cmd::Command;
use tempfile::tempdir;

fn arquiz() -> Command {
    Command::cargo_bin("arquiz").unwrap()
}

#[test]
fn help_lists_flags() {
    let out = arquiz().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&out.get_output().stdout).to_string();
    for flag in ["--source", "--target", "--questions", "--history", "--stats", "--data-dir"] {
        assert!(stdout.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn stats_on_empty_history_are_zero() {
    let dir = tempdir().unwrap();
    let out = arquiz()
        .args(["--stats", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&out.get_output().stdout).to_string();
    assert!(stdout.contains("Quiz terminés : 0"));
    assert!(stdout.contains("Meilleur score : 0%"));
}

#[test]
fn stats_read_existing_log_and_clear_removes_it() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("sessions.json"),
        r#"[{"date":"2024-05-01T08:00:00Z","total":5,"correct":4,"sourceLanguage":"EN","targetLanguage":"FR"}]"#,
    )
    .unwrap();

    let out = arquiz()
        .args(["--stats", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&out.get_output().stdout).to_string();
    assert!(stdout.contains("Quiz terminés : 1"));
    assert!(stdout.contains("Meilleur score : 80%"));

    arquiz()
        .args(["--clear-history", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success();
    assert!(!dir.path().join("sessions.json").exists());

    // clearing twice is fine
    arquiz()
        .args(["--clear-history", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn interactive_mode_requires_a_tty() {
    let dir = tempdir().unwrap();
    arquiz()
        .arg("--data-dir")
        .arg(dir.path())
        .write_stdin("")
        .assert()
        .failure();
}

#[test]
fn zero_questions_is_rejected() {
    let dir = tempdir().unwrap();
    arquiz()
        .args(["-n", "0", "--stats", "--data-dir"])
        .arg(dir.path())
        .assert()
        .failure();
}
