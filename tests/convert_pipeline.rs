//! End-to-end conversion runs against real directories.

use std::fs;
use std::path::Path;

use labelprep::classes::ClassMap;
use labelprep::convert::{convert_dir, ConvertIssueCode};

fn classes() -> ClassMap {
    ClassMap::from_pairs([("Hand_Raised", 0u32), ("Person", 1u32)])
}

fn write_doc(dir: &Path, name: &str, json: &str) {
    fs::write(dir.join(name), json).expect("write source document");
}

fn sample_docs(input: &Path) {
    write_doc(
        input,
        "frame001.json",
        r#"{"imageWidth": 1920, "imageHeight": 1080, "imagePath": "frame001.jpg",
            "shapes": [
                {"label": "Hand_Raised", "points": [[100.0, 200.0], [300.0, 400.0]]},
                {"label": "Person", "points": [[0.0, 0.0], [960.0, 1080.0]]}
            ]}"#,
    );
    write_doc(
        input,
        "frame002.json",
        r#"{"imageWidth": 100, "imageHeight": 100, "imagePath": "frame002.jpg",
            "shapes": [{"label": "Hand_Raised", "points": [[40, 40], [60, 60]]}]}"#,
    );
}

#[test]
fn converts_documents_to_expected_bytes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("json");
    let output = temp.path().join("labels");
    fs::create_dir_all(&input).expect("create input dir");
    sample_docs(&input);

    let report = convert_dir(&input, &output, &classes()).expect("convert dir");

    assert_eq!(report.documents, 2);
    assert_eq!(report.converted, 2);
    assert_eq!(report.records, 3);
    assert!(report.is_clean());

    let frame001 = fs::read_to_string(output.join("frame001.txt")).expect("read frame001");
    assert_eq!(
        frame001,
        "0 0.104167 0.277778 0.104167 0.185185\n1 0.250000 0.500000 0.500000 1.000000"
    );

    let frame002 = fs::read_to_string(output.join("frame002.txt")).expect("read frame002");
    assert_eq!(frame002, "0 0.500000 0.500000 0.200000 0.200000");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("json");
    fs::create_dir_all(&input).expect("create input dir");
    sample_docs(&input);

    let first_out = temp.path().join("labels_first");
    let second_out = temp.path().join("labels_second");

    convert_dir(&input, &first_out, &classes()).expect("first run");
    convert_dir(&input, &second_out, &classes()).expect("second run");

    for name in ["frame001.txt", "frame002.txt"] {
        let first = fs::read(first_out.join(name)).expect("read first output");
        let second = fs::read(second_out.join(name)).expect("read second output");
        assert_eq!(first, second, "output for {} differs between runs", name);
    }
}

#[test]
fn unknown_label_document_still_converts_other_shapes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("json");
    let output = temp.path().join("labels");
    fs::create_dir_all(&input).expect("create input dir");

    write_doc(
        &input,
        "frame003.json",
        r#"{"imageWidth": 100, "imageHeight": 100, "imagePath": "frame003.jpg",
            "shapes": [
                {"label": "Waving", "points": [[10, 10], [20, 20]]},
                {"label": "Person", "points": [[0, 0], [100, 100]]}
            ]}"#,
    );

    let report = convert_dir(&input, &output, &classes()).expect("convert dir");

    assert_eq!(report.records, 1);
    let unknown: Vec<_> = report
        .issues
        .iter()
        .filter(|issue| issue.code == ConvertIssueCode::UnknownLabel)
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].document, "frame003.json");

    let written = fs::read_to_string(output.join("frame003.txt")).expect("read output");
    assert_eq!(written, "1 0.500000 0.500000 1.000000 1.000000");
}

#[test]
fn nested_input_directories_are_walked() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("json");
    let nested = input.join("session_b");
    let output = temp.path().join("labels");
    fs::create_dir_all(&nested).expect("create nested dir");

    write_doc(
        &nested,
        "frame010.json",
        r#"{"imageWidth": 10, "imageHeight": 10, "imagePath": "frame010.jpg",
            "shapes": [{"label": "Person", "points": [[0, 0], [10, 10]]}]}"#,
    );

    let report = convert_dir(&input, &output, &classes()).expect("convert dir");

    assert_eq!(report.converted, 1);
    assert!(output.join("frame010.txt").is_file());
}

#[test]
fn rejects_non_directory_input() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let file = temp.path().join("not_a_dir.json");
    fs::write(&file, "{}").expect("write file");

    let err = convert_dir(&file, &temp.path().join("labels"), &classes()).unwrap_err();
    assert!(matches!(
        err,
        labelprep::LabelprepError::InputDirInvalid { .. }
    ));
}
