//! End-to-end translate tests with synthetic checkpoints and images.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::Path;

use assert_cmd::Command;
use ganshift_adapters::artifacts::ARTIFACTS;
use ganshift_test_support::{gradient_rgb, uniform_rgb, write_generator_weights};
use predicates::prelude::*;

/// Creates a models directory holding loadable checkpoints for both routes.
fn models_dir_with_checkpoints() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for artifact in ARTIFACTS {
        write_generator_weights(&dir.path().join(artifact.filename)).unwrap();
    }
    dir
}

fn save_png(image: &image::DynamicImage, path: &Path) {
    image.save(path).unwrap();
}

#[test]
fn test_translate_end_to_end() {
    let models = models_dir_with_checkpoints();
    let work = tempfile::tempdir().unwrap();

    save_png(&gradient_rgb(300, 200), &work.path().join("a.png"));
    save_png(&uniform_rgb(64, 64, [200, 200, 200]), &work.path().join("b.png"));
    let out = work.path().join("out.png");

    let mut cmd = Command::cargo_bin("ganshift").unwrap();
    cmd.arg("translate")
        .arg(work.path().join("a.png"))
        .arg(work.path().join("b.png"))
        .arg("--models-dir")
        .arg(models.path())
        .arg("-o")
        .arg(&out);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let translated = image::open(&out).unwrap();
    assert_eq!((translated.width(), translated.height()), (256, 256));
    assert_eq!(translated.color(), image::ColorType::Rgb8);
}

#[test]
fn test_translate_reverse_direction() {
    let models = models_dir_with_checkpoints();
    let work = tempfile::tempdir().unwrap();

    save_png(&uniform_rgb(128, 128, [10, 20, 30]), &work.path().join("a.png"));
    save_png(&uniform_rgb(128, 128, [30, 20, 10]), &work.path().join("b.png"));
    let out = work.path().join("out.png");

    let mut cmd = Command::cargo_bin("ganshift").unwrap();
    cmd.arg("translate")
        .arg(work.path().join("a.png"))
        .arg(work.path().join("b.png"))
        .arg("--direction")
        .arg("reverse")
        .arg("--models-dir")
        .arg(models.path())
        .arg("-o")
        .arg(&out);

    cmd.assert().success();
    assert!(out.exists());
}

#[test]
fn test_translate_without_checkpoints_points_at_fetch() {
    let models = tempfile::tempdir().unwrap(); // empty
    let work = tempfile::tempdir().unwrap();

    save_png(&uniform_rgb(32, 32, [0, 0, 0]), &work.path().join("a.png"));
    save_png(&uniform_rgb(32, 32, [0, 0, 0]), &work.path().join("b.png"));

    let mut cmd = Command::cargo_bin("ganshift").unwrap();
    cmd.arg("translate")
        .arg(work.path().join("a.png"))
        .arg(work.path().join("b.png"))
        .arg("--models-dir")
        .arg(models.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("ganshift models fetch"));
}

#[test]
fn test_translate_rejects_undecodable_second_image() {
    let models = models_dir_with_checkpoints();
    let work = tempfile::tempdir().unwrap();

    save_png(&uniform_rgb(32, 32, [0, 0, 0]), &work.path().join("a.png"));
    std::fs::write(work.path().join("b.png"), b"not an image").unwrap();

    let mut cmd = Command::cargo_bin("ganshift").unwrap();
    cmd.arg("translate")
        .arg(work.path().join("a.png"))
        .arg(work.path().join("b.png"))
        .arg("--models-dir")
        .arg(models.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("decode"));
}

#[test]
fn test_translate_rejects_unsupported_extension() {
    let models = models_dir_with_checkpoints();
    let work = tempfile::tempdir().unwrap();

    save_png(&uniform_rgb(32, 32, [0, 0, 0]), &work.path().join("a.png"));
    std::fs::write(work.path().join("b.tiff"), b"whatever").unwrap();

    let mut cmd = Command::cargo_bin("ganshift").unwrap();
    cmd.arg("translate")
        .arg(work.path().join("a.png"))
        .arg(work.path().join("b.tiff"))
        .arg("--models-dir")
        .arg(models.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type"));
}

#[test]
fn test_translate_corrupt_checkpoint_fails_closed() {
    let models = tempfile::tempdir().unwrap();
    // Present but unloadable: passes the existence check, fails at load.
    for artifact in ARTIFACTS {
        std::fs::write(models.path().join(artifact.filename), b"corrupt").unwrap();
    }

    let work = tempfile::tempdir().unwrap();
    save_png(&uniform_rgb(32, 32, [0, 0, 0]), &work.path().join("a.png"));
    save_png(&uniform_rgb(32, 32, [0, 0, 0]), &work.path().join("b.png"));

    let mut cmd = Command::cargo_bin("ganshift").unwrap();
    cmd.arg("translate")
        .arg(work.path().join("a.png"))
        .arg(work.path().join("b.png"))
        .arg("--models-dir")
        .arg(models.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("safetensors"));
}
