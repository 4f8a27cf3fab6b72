//! CLI integration tests for the `pingpong` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes and output.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn pingpong() -> Command {
    let mut cmd = cargo_bin_cmd!("pingpong");
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn help_exits_0_with_description() {
    pingpong()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ping-pong match simulator"));
}

#[test]
fn version_exits_0() {
    pingpong()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pingpong"));
}

#[test]
fn play_prints_full_match_log() {
    pingpong()
        .args(["play", "--seed", "7", "--match-id", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "------------------ New Match 12 ------------------\n",
        ))
        .stdout(predicate::str::contains(
            "Player A & Player B on the court\n",
        ))
        .stdout(predicate::str::is_match(r"\[Alert\] Player [AB] wins!\n").unwrap())
        .stdout(predicate::str::ends_with(
            "------------------- Game Over -------------------\n",
        ));
}

#[test]
fn play_with_same_seed_is_reproducible() {
    let messages = |out: Vec<u8>| -> Vec<String> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| l.split_once("Z:").unwrap().1.to_string())
            .collect()
    };

    let first = pingpong()
        .args(["play", "--seed", "2024"])
        .output()
        .unwrap();
    let second = pingpong()
        .args(["play", "--seed", "2024"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(messages(first.stdout), messages(second.stdout));
}

#[test]
fn play_json_output_has_record_fields() {
    let output = pingpong()
        .args(["--output", "json", "play", "--seed", "3", "--match-id", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["match_id"], 4);
    let winner = json["winner"].as_str().unwrap();
    assert!(winner == "Player A" || winner == "Player B");
    let log = json["match_log"].as_str().unwrap();
    assert!(log.contains(&format!("[Alert] {} wins!", winner)));
    assert!(json["time"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn play_against_unreachable_table_forfeits() {
    pingpong()
        .args(["play", "--table-url", "http://127.0.0.1:9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Alert] Player B wins!"))
        .stdout(predicate::str::contains(" ==> ").not());
}
