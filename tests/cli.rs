//! End-to-end tests of the `mythly` binary against a temporary database.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/stories.json")
}

struct Env {
    home: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
        }
    }

    fn database(&self) -> PathBuf {
        self.home.path().join("library.db")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mythly").unwrap();
        cmd.env("HOME", self.home.path())
            .env_remove("RUST_LOG")
            .env_remove("MYTHLY_DATABASE")
            .arg("--database")
            .arg(self.database());
        cmd
    }

    fn loaded() -> Self {
        let env = Self::new();
        env.cmd()
            .args(["load", "--file"])
            .arg(fixture())
            .assert()
            .success();
        env
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.cmd().args(["-o", "json"]).args(args).output().unwrap();
        assert!(output.status.success(), "{args:?} failed");
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("mythly")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("library"))
        .stdout(predicate::str::contains("sessions"));
}

#[test]
fn test_load_is_idempotent() {
    let env = Env::new();

    env.cmd()
        .args(["load", "--file"])
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 stories"));

    env.cmd()
        .arg("load")
        .assert()
        .success()
        .stdout(predicate::str::contains("already loaded (3 stories)"));
}

#[test]
fn test_load_rejects_invalid_document() {
    let env = Env::new();
    let bad = env.home.path().join("bad.json");
    std::fs::write(&bad, r#"{"stories": [{"id": "x"}]}"#).unwrap();

    env.cmd()
        .args(["load", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Content error"));

    assert_eq!(env.json(&["library"])["count"], 0);
}

#[test]
fn test_load_without_document_fails() {
    Env::new()
        .cmd()
        .arg("load")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No content document configured"));
}

#[test]
fn test_load_uses_configured_path() {
    let env = Env::new();
    let config_dir = env.home.path().join(".mythly");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.yaml"),
        format!("content:\n  path: {}\n", fixture().display()),
    )
    .unwrap();

    env.cmd()
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Today's Story"));
}

#[test]
fn test_library_filters() {
    let env = Env::loaded();

    let all = env.json(&["library"]);
    assert_eq!(all["count"], 3);
    assert_eq!(all["items"][0]["id"], "krishna-sudama");

    let durga = env.json(&["library", "--deity", "durga"]);
    assert_eq!(durga["count"], 1);
    assert_eq!(durga["items"][0]["id"], "durga-mahishasura");

    let epic = env.json(&["library", "--epic", "SHIVA_PURANA"]);
    assert_eq!(epic["items"][0]["id"], "markandeya-shiva");

    let search = env.json(&["library", "--search", "RICE"]);
    assert_eq!(search["count"], 1);
    assert_eq!(search["items"][0]["id"], "krishna-sudama");
}

#[test]
fn test_library_conflicting_filters() {
    Env::loaded()
        .cmd()
        .args(["library", "--read", "--favorites"])
        .assert()
        .failure();
}

#[test]
fn test_show_story() {
    Env::loaded()
        .cmd()
        .args(["show", "durga-mahishasura"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Durga and the Buffalo Demon"))
        .stdout(predicate::str::contains("rode out on her lion"))
        .stdout(predicate::str::contains("markandeya-shiva"));
}

#[test]
fn test_show_unknown_story() {
    Env::loaded()
        .cmd()
        .args(["show", "no-such-story"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Story not found: no-such-story"));
}

#[test]
fn test_read_updates_stats_and_sessions() {
    let env = Env::loaded();

    env.cmd()
        .args(["read", "krishna-sudama", "--seconds", "185", "--audio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3m 5s"));

    let stats = env.json(&["stats"]);
    assert_eq!(stats["current_streak"], 1);
    assert_eq!(stats["longest_streak"], 1);
    assert_eq!(stats["total_stories_read"], 1);
    assert_eq!(stats["total_reading_minutes"], 3);
    assert_eq!(stats["favorite_deity"], "KRISHNA");

    let read = env.json(&["library", "--read"]);
    assert_eq!(read["count"], 1);
    assert_eq!(read["items"][0]["is_read"], true);

    let sessions = env.json(&["sessions"]);
    assert_eq!(sessions["count"], 1);
    assert_eq!(sessions["items"][0]["story_id"], "krishna-sudama");
    assert_eq!(sessions["items"][0]["used_audio"], true);
}

#[test]
fn test_read_same_day_keeps_streak() {
    let env = Env::loaded();

    env.cmd().args(["read", "krishna-sudama"]).assert().success();
    env.cmd().args(["read", "durga-mahishasura"]).assert().success();

    let stats = env.json(&["stats"]);
    assert_eq!(stats["current_streak"], 1);
    assert_eq!(stats["total_stories_read"], 2);
    assert_eq!(env.json(&["sessions"])["count"], 2);
    assert_eq!(
        env.json(&["sessions", "--story", "durga-mahishasura"])["count"],
        1
    );
}

#[test]
fn test_read_filter_lists_newest_published_first() {
    let env = Env::loaded();

    env.cmd().args(["read", "krishna-sudama"]).assert().success();
    env.cmd().args(["read", "markandeya-shiva"]).assert().success();

    let read = env.json(&["library", "--read"]);
    assert_eq!(read["count"], 2);
    assert_eq!(read["items"][0]["id"], "krishna-sudama");
    assert_eq!(read["items"][1]["id"], "markandeya-shiva");
}

#[test]
fn test_read_unknown_story() {
    let env = Env::loaded();

    env.cmd()
        .args(["read", "no-such-story"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));

    assert_eq!(env.json(&["stats"])["total_stories_read"], 0);
}

#[test]
fn test_favorite_toggle() {
    let env = Env::loaded();

    env.cmd()
        .args(["favorite", "markandeya-shiva"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"));

    let favorites = env.json(&["library", "--favorites"]);
    assert_eq!(favorites["count"], 1);
    assert_eq!(favorites["items"][0]["id"], "markandeya-shiva");

    let toggled = env.json(&["favorite", "markandeya-shiva"]);
    assert_eq!(toggled["is_favorite"], false);
    assert_eq!(env.json(&["library", "--favorites"])["count"], 0);
}

#[test]
fn test_today_json() {
    let today = Env::loaded().json(&["today"]);

    assert!(today["story"]["id"].is_string());
    assert_eq!(today["stats"]["total_stories_read"], 0);
}

#[test]
fn test_today_empty_library() {
    Env::new()
        .cmd()
        .arg("today")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No content document configured"));
}

#[test]
fn test_completions() {
    Env::new()
        .cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mythly"));
}
