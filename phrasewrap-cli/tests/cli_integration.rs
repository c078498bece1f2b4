//! Integration tests for the phrasewrap CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{name}")
}

#[test]
fn test_apply_default_settings() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply").arg("-i").arg(fixture_path("japanese.html"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "<h1 class=\"phrasewrap\">今日は\u{200B}良い\u{200B}天気です。</h1>",
        ))
        .stdout(predicate::str::contains(
            "<p class=\"phrasewrap\">今日は\u{200B}<b>良い\u{200B}</b>天気です。</p>",
        ))
        .stdout(predicate::str::contains("<pre>今日は良い天気です。</pre>"))
        .stdout(predicate::str::contains(".phrasewrap { word-break: keep-all;"))
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"));
}

#[test]
fn test_apply_custom_separator() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply")
        .arg("-i")
        .arg(fixture_path("japanese.html"))
        .arg("--separator")
        .arg("|");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("今日は|良い|天気です。"));
}

#[test]
fn test_apply_word_break_inline_style() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply")
        .arg("-i")
        .arg(fixture_path("japanese.html"))
        .arg("--no-separator")
        .arg("--inline-style");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("今日は<wbr>良い<wbr>天気です。"))
        .stdout(predicate::str::contains("data-phrasewrap"))
        .stdout(predicate::str::contains("<style>").not());
}

#[test]
fn test_apply_with_config_file() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply")
        .arg("-i")
        .arg(fixture_path("no-lang.html"))
        .arg("-c")
        .arg(fixture_path("settings.toml"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<p class=\"wrap\">明日も|晴れです。</p>"))
        .stdout(predicate::str::contains(".wrap {"));
}

#[test]
fn test_apply_to_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    fs::write(
        temp_dir.path().join("a.html"),
        "<html lang=\"ja\"><body><p>今日は良い天気です。</p></body></html>",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("b.html"),
        "<html lang=\"ja\"><body><p>明日も晴れです。</p></body></html>",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply")
        .arg("-i")
        .arg(temp_dir.path().join("*.html").display().to_string())
        .arg("-o")
        .arg(&out_dir)
        .arg("-s")
        .arg("|")
        .arg("-q");
    cmd.assert().success();

    let a = fs::read_to_string(out_dir.join("a.html")).unwrap();
    let b = fs::read_to_string(out_dir.join("b.html")).unwrap();
    assert!(a.contains("今日は|良い|天気です。"));
    assert!(b.contains("明日も|晴れです。"));
}

#[test]
fn test_apply_to_output_directory_rejects_shared_names() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    for lang in ["en", "ja"] {
        let dir = temp_dir.path().join(lang);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("index.html"), "<p>今日は良い天気です。</p>").unwrap();
    }

    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply")
        .arg("-i")
        .arg(temp_dir.path().join("*/index.html").display().to_string())
        .arg("-o")
        .arg(&out_dir)
        .arg("-q");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("would both be written to"));
    assert!(!out_dir.join("index.html").exists());
}

#[test]
fn test_apply_output_is_stable_on_rerun() {
    let temp_dir = TempDir::new().unwrap();
    let once = temp_dir.path().join("once.html");
    let twice = temp_dir.path().join("twice.html");

    Command::cargo_bin("phrasewrap")
        .unwrap()
        .args(["apply", "-i", &fixture_path("japanese.html"), "-o"])
        .arg(&once)
        .assert()
        .success();
    Command::cargo_bin("phrasewrap")
        .unwrap()
        .args(["apply", "-i"])
        .arg(&once)
        .arg("-o")
        .arg(&twice)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&once).unwrap(),
        fs::read_to_string(&twice).unwrap()
    );
}

#[test]
fn test_apply_stats() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply")
        .arg("-i")
        .arg(fixture_path("japanese.html"))
        .arg("--stats");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("\"split\":2"));
}

#[test]
fn test_missing_input() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply").arg("-i").arg("nonexistent-*.html");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "[settings]\nseparator = 1\n").unwrap();

    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("apply")
        .arg("-i")
        .arg(fixture_path("japanese.html"))
        .arg("-c")
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_segment_text() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.args(["segment", "--lang", "ja", "今日は良い天気です。"]);

    cmd.assert()
        .success()
        .stdout("今日は|良い|天気です。\n");
}

#[test]
fn test_segment_json() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.args(["segment", "-f", "json", "今日は良い天気です。"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"text\": \"良い\""))
        .stdout(predicate::str::contains("\"offset\": 9"));
}

#[test]
fn test_list_languages() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.arg("list").arg("languages");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ja"))
        .stdout(predicate::str::contains("zh-hant"));
}

#[test]
fn test_conflicting_flags() {
    let mut cmd = Command::cargo_bin("phrasewrap").unwrap();
    cmd.args(["apply", "-i", "x.html", "--separator", "|", "--no-separator"]);

    cmd.assert().failure();
}
