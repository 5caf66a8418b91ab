// Drives the compiled binary against a throwaway config and data directory.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("characters.txt"), "字音一\n").unwrap();
    fs::write(root.join("jyutping.tsv"), "字\tzi6\n音\tjam1\n一\tjat1\n").unwrap();
    let config = serde_json::json!({
        "characters_path": root.join("characters.txt"),
        "dictionary_path": root.join("jyutping.tsv"),
        "progress_path": root.join("progress.tsv"),
        "expected_character_count": 3,
        "abort_command": ":save",
        "color": false,
    });
    fs::write(root.join("config.json"), config.to_string()).unwrap();
    dir
}

fn drill(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jyutdrill").unwrap();
    cmd.env("HOME", root)
        .arg("--config")
        .arg(root.join("config.json"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).unwrap()
}

#[test]
fn unknown_subcommand_is_a_no_op() {
    let dir = workspace();
    let shown = stdout_of(drill(dir.path()).arg("juggle"));
    assert!(shown.contains("nothing to do"));

    let shown = stdout_of(drill(dir.path()).args(["reset", "everything"]));
    assert!(shown.contains("nothing to reset"));
    assert!(!dir.path().join("progress.tsv").exists());
}

#[test]
fn reset_creates_progress_once() {
    let dir = workspace();
    let progress = dir.path().join("progress.tsv");

    drill(dir.path()).args(["reset", "progress"]).assert().success();
    assert_eq!(
        fs::read_to_string(&progress).unwrap(),
        "Character\tJyutping\tLearned\tTested\tCorrect\tIncorrect\n\
         字\tzi6\t0\t0\t0\t0\n音\tjam1\t0\t0\t0\t0\n一\tjat1\t0\t0\t0\t0\n"
    );

    drill(dir.path()).args(["reset", "progress"]).assert().failure();
    drill(dir.path())
        .args(["reset", "progress", "--force"])
        .assert()
        .success();
}

#[test]
fn reset_fails_on_wrong_character_count() {
    let dir = workspace();
    fs::write(dir.path().join("characters.txt"), "字音\n").unwrap();
    drill(dir.path()).args(["reset", "progress"]).assert().failure();
    assert!(!dir.path().join("progress.tsv").exists());
}

#[test]
fn learn_stops_at_abort_command() {
    let dir = workspace();
    drill(dir.path()).args(["reset", "progress"]).assert().success();

    let shown = stdout_of(drill(dir.path()).args(["learn", "3"]).write_stdin(":save\n"));
    assert!(shown.contains("learning session: 1 of 3 (stopped early)"));

    let progress = fs::read_to_string(dir.path().join("progress.tsv")).unwrap();
    let learned = progress
        .lines()
        .skip(1)
        .filter(|line| line.split('\t').nth(2) == Some("1"))
        .count();
    assert_eq!(learned, 1);
}

#[test]
fn test_requires_learned_characters() {
    let dir = workspace();
    drill(dir.path()).args(["reset", "progress"]).assert().success();
    drill(dir.path())
        .args(["test", "1"])
        .write_stdin("zi6\n")
        .assert()
        .failure();
}

#[test]
fn learn_then_test_then_summary() {
    let dir = workspace();
    drill(dir.path()).args(["reset", "progress"]).assert().success();
    drill(dir.path())
        .args(["learn", "3"])
        .write_stdin("\n\n\n")
        .assert()
        .success();

    // Every guess is wrong, so each of the three gets scored incorrect.
    let shown = stdout_of(drill(dir.path()).args(["test", "3"]).write_stdin("x\nx\nx\n"));
    assert!(shown.contains("0 correct, 0 without tone, 3 incorrect"));

    let shown = stdout_of(drill(dir.path()).arg("summary"));
    assert!(shown.contains("3 of 3 characters learned (3 lessons)"));
    assert!(shown.contains("3 tests, 0.0% correct"));
}

#[test]
fn first_run_writes_default_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("fresh").join("config.json");

    Command::cargo_bin("jyutdrill")
        .unwrap()
        .env("HOME", dir.path())
        .arg("--config")
        .arg(&config)
        .arg("juggle")
        .assert()
        .success();

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(written["abort_command"], ":save");
}
