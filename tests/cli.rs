// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CLI surface tests against the built binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, allowlist: &[&str], blocklist: &[&str]) {
    let config = serde_json::json!({
        "allowlist": allowlist,
        "blocklist": blocklist,
        "scan_mode": "single",
        "prefix": {"mode": "none"},
        "suffix": {"mode": "enter"},
        "max_history_items": 100,
        "history_backend": "structured",
        "notification_mode": "toast",
        "log_level": "warn",
        "log_format": "text"
    });
    fs::write(
        dir.path().join("config.json"),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();
}

fn scangate(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scangate").unwrap();
    cmd.arg("--data-dir").arg(dir.path());
    cmd
}

#[test]
fn check_allows_unblocked_host_by_default() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, &[], &[]);
    scangate(&dir)
        .args(["check", "https://anything.org"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed: anything.org"));
}

#[test]
fn check_blocks_blocklisted_host() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, &[], &["evil.com"]);
    scangate(&dir)
        .args(["check", "https://evil.com/payload"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("blocked: evil.com (blocklisted)"));
}

#[test]
fn check_blocks_host_missing_from_allowlist() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, &["good.com"], &[]);
    scangate(&dir)
        .args(["check", "https://evil.com"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not allowlisted"));
}

#[test]
fn check_accepts_bare_hostname() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, &["good.com"], &[]);
    scangate(&dir)
        .args(["check", "good.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed: good.com"));
}

#[test]
fn check_reports_malformed_input() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, &[], &[]);
    scangate(&dir)
        .args(["check", "ftp://example.com"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("malformed"));
}

#[test]
fn history_list_is_empty_on_fresh_dir() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, &[], &[]);
    scangate(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history."));
}

#[test]
fn history_clear_reports_success() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, &[], &[]);
    scangate(&dir)
        .args(["history", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("History cleared."));
}
