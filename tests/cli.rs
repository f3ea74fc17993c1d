use std::fs;

use assert_cmd::Command;

fn write_sample_source(dir: &std::path::Path) {
    fs::write(
        dir.join("frame001.json"),
        r#"{"imageWidth": 100, "imageHeight": 100, "imagePath": "frame001.png",
            "shapes": [{"label": "Hand_Raised", "points": [[40, 40], [60, 60]]}]}"#,
    )
    .expect("write source document");
}

fn write_sample_image(path: &std::path::Path, width: u32, height: u32) {
    image::RgbImage::new(width, height)
        .save(path)
        .expect("write sample image");
}

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("labelprep"));
}

#[test]
fn outputs_tool_version() {
    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("-V");
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("labelprep"));
}

// Convert subcommand tests

#[test]
fn convert_writes_label_files() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("json");
    fs::create_dir_all(&input).unwrap();
    write_sample_source(&input);
    fs::write(temp.path().join("classes.json"), r#"{"Hand_Raised": 0}"#).unwrap();

    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("convert")
        .arg(&input)
        .arg(temp.path().join("labels"))
        .arg("--classes")
        .arg(temp.path().join("classes.json"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Converted 1 of 1 document(s)"));

    let written = fs::read_to_string(temp.path().join("labels/frame001.txt")).unwrap();
    assert_eq!(written, "0 0.500000 0.500000 0.200000 0.200000");
}

#[test]
fn convert_reports_unknown_labels() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("json");
    fs::create_dir_all(&input).unwrap();
    write_sample_source(&input);
    fs::write(temp.path().join("classes.json"), r#"{"Person": 0}"#).unwrap();

    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("convert")
        .arg(&input)
        .arg(temp.path().join("labels"))
        .arg("--classes")
        .arg(temp.path().join("classes.json"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("UnknownLabel"))
        .stdout(predicates::str::contains("Hand_Raised"));
}

#[test]
fn convert_rejects_missing_class_map() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("json");
    fs::create_dir_all(&input).unwrap();

    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("convert")
        .arg(&input)
        .arg(temp.path().join("labels"))
        .arg("--classes")
        .arg(temp.path().join("missing.json"));
    cmd.assert().failure();
}

// Check subcommand tests

#[test]
fn check_passes_on_consistent_dataset() {
    let temp = tempfile::tempdir().unwrap();
    let images = temp.path().join("imgs");
    let labels = temp.path().join("lbl");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&labels).unwrap();
    write_sample_image(&images.join("a.png"), 100, 100);
    fs::write(labels.join("a.txt"), "0 0.500000 0.500000 0.200000 0.200000").unwrap();

    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("check")
        .arg(&images)
        .arg(&labels)
        .arg(temp.path().join("annotated"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Check passed"));

    assert!(temp.path().join("annotated/a_annotated.jpg").is_file());
}

#[test]
fn check_reports_mismatches() {
    let temp = tempfile::tempdir().unwrap();
    let images = temp.path().join("imgs");
    let labels = temp.path().join("lbl");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&labels).unwrap();
    write_sample_image(&images.join("only_image.png"), 10, 10);
    fs::write(labels.join("only_label.txt"), "").unwrap();

    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("check")
        .arg(&images)
        .arg(&labels)
        .arg(temp.path().join("annotated"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("only_image"))
        .stdout(predicates::str::contains("only_label"));
}

#[test]
fn check_strict_fails_on_findings() {
    let temp = tempfile::tempdir().unwrap();
    let images = temp.path().join("imgs");
    let labels = temp.path().join("lbl");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&labels).unwrap();
    write_sample_image(&images.join("a.png"), 100, 100);
    fs::write(labels.join("a.txt"), "0 1.500000 0.500000 0.200000 0.200000").unwrap();

    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("check")
        .arg(&images)
        .arg(&labels)
        .arg(temp.path().join("annotated"))
        .arg("--strict");
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("CenterOutOfRange"));
}

#[test]
fn check_json_report_format() {
    let temp = tempfile::tempdir().unwrap();
    let images = temp.path().join("imgs");
    let labels = temp.path().join("lbl");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&labels).unwrap();
    write_sample_image(&images.join("a.png"), 100, 100);
    fs::write(labels.join("a.txt"), "0 0.500000 0.500000 0.200000 0.200000").unwrap();

    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("check")
        .arg(&images)
        .arg(&labels)
        .arg(temp.path().join("annotated"))
        .args(["--report", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"pairs_checked\": 1"))
        .stdout(predicates::str::contains("\"annotated_saved\": 1"));
}

#[test]
fn check_unsupported_report_format_fails() {
    let temp = tempfile::tempdir().unwrap();
    let images = temp.path().join("imgs");
    let labels = temp.path().join("lbl");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&labels).unwrap();

    let mut cmd = Command::cargo_bin("labelprep").unwrap();
    cmd.arg("check")
        .arg(&images)
        .arg(&labels)
        .arg(temp.path().join("annotated"))
        .args(["--report", "not-a-format"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported report format"));
}
