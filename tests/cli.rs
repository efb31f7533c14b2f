use assert_cmd::Command;
use std::path::Path;

mod common;

fn fixture_dir() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_fixture_tree(temp.path(), &common::bird_fixtures());
    temp
}

fn prepare(root: &Path, archive: &Path) -> Command {
    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.arg("prepare")
        .arg("-d")
        .arg(root.join("images"))
        .arg("-l")
        .arg(root.join("images.txt"))
        .arg("-b")
        .arg(root.join("bounding_boxes.txt"))
        .arg("-o")
        .arg(archive);
    cmd
}

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("birdcrop 0.1.0\n");
}

#[test]
fn prepare_prints_summary_and_writes_archive() {
    let temp = fixture_dir();
    let archive = temp.path().join("birds.npz");

    prepare(temp.path(), &archive)
        .assert()
        .success()
        .stdout(predicates::str::contains("Number of valid images: 4"))
        .stdout(predicates::str::contains("Could not resize 1 images (16.67%)."));
    assert!(archive.exists());
}

#[test]
fn prepare_json_output() {
    let temp = fixture_dir();
    let archive = temp.path().join("birds.npz");

    prepare(temp.path(), &archive)
        .args(["--output", "json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("\"valid\": 4"))
        .stdout(predicates::str::contains("\"kind\": \"unresizable\""));
}

#[test]
fn split_from_prepared_archive() {
    let temp = fixture_dir();
    let archive = temp.path().join("birds.npz");
    prepare(temp.path(), &archive).assert().success();

    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.arg("split").arg("-i").arg(&archive);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Actual #"))
        .stdout(predicates::str::contains("4 image(s) across 2 categories"));
}

#[test]
fn split_builds_and_caches_when_given_output_file() {
    let temp = fixture_dir();
    let archive = temp.path().join("cache.npz");

    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.arg("split")
        .arg("-d")
        .arg(temp.path().join("images"))
        .arg("-l")
        .arg(temp.path().join("images.txt"))
        .arg("-b")
        .arg(temp.path().join("bounding_boxes.txt"))
        .arg("-o")
        .arg(&archive)
        .args(["--seed", "7"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Number of valid images: 4"))
        .stdout(predicates::str::contains("Target #"));
    assert!(archive.exists());
}

#[test]
fn split_requires_an_archive_argument() {
    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.arg("split");
    cmd.assert().failure();
}

#[test]
fn split_rejects_input_and_output_together() {
    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.args(["split", "-i", "a.npz", "-o", "b.npz"]);
    cmd.assert().failure();
}

#[test]
fn split_rejects_bad_shares() {
    let temp = fixture_dir();
    let archive = temp.path().join("birds.npz");
    prepare(temp.path(), &archive).assert().success();

    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.arg("split")
        .arg("-i")
        .arg(&archive)
        .args(["--train", "0.9", "--test", "0.2"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Invalid split configuration"));
}

#[test]
fn split_missing_archive_fails() {
    let mut cmd = Command::cargo_bin("birdcrop").unwrap();
    cmd.args(["split", "-i", "nonexistent_file.npz"]);
    cmd.assert().failure();
}

#[test]
fn unsupported_output_format_fails() {
    let temp = fixture_dir();
    let archive = temp.path().join("birds.npz");

    prepare(temp.path(), &archive)
        .args(["--output", "yaml"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported output format"));
}
