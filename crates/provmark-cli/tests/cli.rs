// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

#![allow(deprecated)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn provmark() -> Command {
    Command::cargo_bin("provmark").expect("binary should be built")
}

fn manifest_json(dir: &Path) -> serde_json::Value {
    let bytes = fs::read(dir.join("manifest.json")).expect("manifest should exist");
    serde_json::from_slice(&bytes).expect("manifest should be valid JSON")
}

fn batch_fixture() -> (TempDir, std::path::PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("docs");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("guide.md"), "# Guide\n").unwrap();
    fs::write(input.join("setup.exe"), [0x4du8, 0x5a]).unwrap();
    (tmp, input)
}

#[test]
fn no_arguments_prints_help() {
    provmark()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_reports_version() {
    provmark()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn single_file_writes_protected_copy_and_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("hello.py");
    fs::write(&input, "print(\"hi\")").unwrap();
    let out = tmp.path().join("out");

    provmark()
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Protected:"));

    let manifest = manifest_json(&out);
    assert_eq!(manifest["generator"], "provmark");
    assert!(manifest.get("company").is_some());
    let docs = manifest["documents"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["file_extension"], ".py");
    assert_eq!(
        docs[0]["original_hash"],
        "336f365e3407c76220fd9683cb075331635d4b6cfab8a8421f48df0f80c73a13"
    );
}

#[test]
fn default_output_is_beside_the_input() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("notes.txt");
    fs::write(&input, "notes").unwrap();

    provmark().arg(&input).assert().success();
    assert!(tmp.path().join("protected").join("manifest.json").is_file());
}

#[test]
fn batch_reports_counts() {
    let (tmp, input) = batch_fixture();
    let out = tmp.path().join("out");

    provmark()
        .args(["--batch", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed: 1"))
        .stdout(predicate::str::contains("Skipped:   1"));

    assert_eq!(manifest_json(&out)["documents"].as_array().unwrap().len(), 1);
}

#[test]
fn verify_passes_then_fails_after_tampering() {
    let (tmp, input) = batch_fixture();
    let out = tmp.path().join("out");
    provmark().arg("-b").arg(&input).arg("-o").arg(&out).assert().success();

    provmark()
        .arg("--verify")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 intact"));

    let protected = manifest_json(&out)["documents"][0]["protected_file"]
        .as_str()
        .unwrap()
        .to_owned();
    fs::write(&protected, "changed").unwrap();

    provmark()
        .arg("--verify")
        .arg(&out)
        .assert()
        .failure()
        .stdout(predicate::str::contains("MODIFIED"));
}

#[cfg(unix)]
#[test]
fn verify_lists_unreadable_entries_and_fails() {
    let (tmp, input) = batch_fixture();
    let out = tmp.path().join("out");
    provmark().arg("-b").arg(&input).arg("-o").arg(&out).assert().success();

    let protected = manifest_json(&out)["documents"][0]["protected_file"]
        .as_str()
        .unwrap()
        .to_owned();
    fs::remove_file(&protected).unwrap();
    fs::create_dir(&protected).unwrap();

    provmark()
        .arg("--verify")
        .arg(&out)
        .assert()
        .failure()
        .stdout(predicate::str::contains("UNREADABLE"))
        .stdout(predicate::str::contains("1 unreadable"));
}

#[test]
fn manifest_flag_regenerates_from_disk() {
    let (tmp, input) = batch_fixture();
    let out = tmp.path().join("out");
    provmark().arg("-b").arg(&input).arg("-o").arg(&out).assert().success();
    fs::remove_file(out.join("manifest.json")).unwrap();

    provmark()
        .arg("--manifest")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Documents: 1"));

    let manifest = manifest_json(&out);
    assert_eq!(
        manifest["documents"][0]["original_file"],
        "(original not tracked)"
    );
}

#[test]
fn missing_input_fails_with_plain_message() {
    let tmp = tempfile::tempdir().unwrap();
    provmark()
        .arg(tmp.path().join("absent.md"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing exists at"))
        .stderr(predicate::str::contains("scope: nothing was protected"));
}

#[test]
fn directory_without_batch_flag_is_rejected() {
    let (_tmp, input) = batch_fixture();
    provmark()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("use batch mode"));
}

#[test]
fn unreadable_config_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("config.json");
    fs::write(&config, "{ not json").unwrap();
    let input = tmp.path().join("a.md");
    fs::write(&input, "a").unwrap();

    provmark()
        .arg("-c")
        .arg(&config)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
    assert!(!tmp.path().join("protected").exists());
}

#[test]
fn config_file_sets_organization() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("config.json");
    fs::write(
        &config,
        r#"{ "organization": { "name": "Northwind Ltd", "cage_code": "1ABC2" } }"#,
    )
    .unwrap();
    let input = tmp.path().join("a.md");
    fs::write(&input, "a").unwrap();
    let out = tmp.path().join("out");

    provmark()
        .arg("-c")
        .arg(&config)
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let manifest = manifest_json(&out);
    assert_eq!(manifest["company"], "Northwind Ltd");
    assert_eq!(manifest["cage_code"], "1ABC2");
}
