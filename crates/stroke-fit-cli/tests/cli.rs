use std::fs;
use std::path::Path;

use assert_cmd::Command;
use image::{GrayImage, Luma};
use predicates::prelude::*;

fn stroke_fit() -> Command {
    Command::cargo_bin("stroke-fit").expect("binary builds")
}

fn write_stroke_photo(path: &Path) {
    let mut img = GrayImage::from_pixel(48, 48, Luma([230u8]));
    for y in 10..22 {
        for x in 12..30 {
            img.put_pixel(x, y, Luma([30u8]));
        }
    }
    img.save(path).unwrap();
}

#[test]
fn help_lists_both_subcommands() {
    stroke_fit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fit"))
        .stdout(predicate::str::contains("normalize"));
}

#[test]
fn normalize_writes_the_dataset_layout() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("out");

    for sub in ["reg_stroke", "style_stroke"] {
        let dir = raw.join("char1").join(sub);
        fs::create_dir_all(&dir).unwrap();
        write_stroke_photo(&dir.join("tmp1_0.jpg"));
    }

    stroke_fit()
        .arg("normalize")
        .arg("--raw-dir")
        .arg(&raw)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 stroke pairs written"));

    // "char1" in the url-safe base64 alphabet
    let char_out = out.join("Y2hhcjE=");
    assert!(char_out.join("s0_0_crop.png").exists());
    assert!(char_out.join("s1_0_full.png").exists());
}

#[test]
fn normalize_rejects_a_missing_raw_dir() {
    let tmp = tempfile::tempdir().unwrap();
    stroke_fit()
        .arg("normalize")
        .arg("--raw-dir")
        .arg(tmp.path().join("missing"))
        .arg("--out-dir")
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn fit_requires_source_and_target() {
    stroke_fit()
        .arg("fit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--source"));
}
