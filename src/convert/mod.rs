//! Source-document to label-file conversion.
//!
//! One conversion run walks a directory of JSON source documents and
//! writes one label text file per document into the output directory,
//! named by the document's image base name. Processing order is sorted by
//! relative path so repeated runs produce byte-identical output.

mod report;

pub use report::{ConvertIssue, ConvertIssueCode, ConvertReport};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::classes::ClassMap;
use crate::error::LabelprepError;
use crate::geom::NormalizedBox;
use crate::source::SourceDocument;
use crate::yolo::{write_label_file, YoloRecord};

const SOURCE_EXTENSION: &str = "json";

/// Records and per-shape issues produced from one source document.
#[derive(Clone, Debug, Default)]
pub struct DocumentOutcome {
    pub records: Vec<YoloRecord>,
    pub issues: Vec<ConvertIssue>,
}

/// Converts every source document under `input` into a label file under
/// `output`, creating `output` if absent.
///
/// Documents that fail to parse, declare unusable dimensions, or collide
/// on an already-written base name are skipped with an issue; nothing
/// short of an IO failure on the output side aborts the batch.
pub fn convert_dir(
    input: &Path,
    output: &Path,
    classes: &ClassMap,
) -> Result<ConvertReport, LabelprepError> {
    if !input.is_dir() {
        return Err(LabelprepError::InputDirInvalid {
            path: input.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    fs::create_dir_all(output).map_err(LabelprepError::Io)?;

    let source_files = collect_source_files(input)?;

    let mut report = ConvertReport::new();
    let mut written_bases: BTreeMap<String, String> = BTreeMap::new();

    for path in source_files {
        let document = rel_string(input, &path);
        report.documents += 1;

        let doc = match SourceDocument::read(&path) {
            Ok(doc) => doc,
            Err(LabelprepError::SourceParse { source, .. }) => {
                report.add(ConvertIssue::new(
                    ConvertIssueCode::SourceParse,
                    &document,
                    source.to_string(),
                ));
                continue;
            }
            Err(LabelprepError::Io(err)) => {
                report.add(ConvertIssue::new(
                    ConvertIssueCode::SourceParse,
                    &document,
                    err.to_string(),
                ));
                continue;
            }
            Err(other) => return Err(other),
        };

        let base = doc.base_name().to_string();
        if let Some(first) = written_bases.get(&base) {
            report.add(ConvertIssue::new(
                ConvertIssueCode::DuplicateBaseName,
                &document,
                format!("base name '{}' already written from {}", base, first),
            ));
            continue;
        }

        match convert_document(&doc, &document, classes) {
            Ok(outcome) => {
                let label_path = output.join(format!("{}.txt", base));
                fs::write(&label_path, write_label_file(&outcome.records))
                    .map_err(LabelprepError::Io)?;

                report.converted += 1;
                report.records += outcome.records.len();
                report.issues.extend(outcome.issues);
                written_bases.insert(base, document);
            }
            Err(LabelprepError::InvalidDimensions { width, height }) => {
                report.add(ConvertIssue::new(
                    ConvertIssueCode::InvalidDimensions,
                    &document,
                    format!("declared dimensions {}x{} must be positive", width, height),
                ));
            }
            Err(other) => return Err(other),
        }
    }

    Ok(report)
}

/// Converts the shapes of one document into label records.
///
/// Shapes with unknown labels or fewer than two points are dropped with
/// an issue; the rest of the document converts normally. Zero or negative
/// declared dimensions fail the whole document with `InvalidDimensions`
/// at the first normalization, leaving other documents unaffected.
pub fn convert_document(
    doc: &SourceDocument,
    document_name: &str,
    classes: &ClassMap,
) -> Result<DocumentOutcome, LabelprepError> {
    let mut outcome = DocumentOutcome::default();

    for shape in &doc.shapes {
        let Some(class_id) = classes.resolve(&shape.label) else {
            outcome.issues.push(ConvertIssue::new(
                ConvertIssueCode::UnknownLabel,
                document_name,
                format!("skipping unknown label '{}'", shape.label),
            ));
            continue;
        };

        let Some(corners) = shape.corner_box() else {
            outcome.issues.push(ConvertIssue::new(
                ConvertIssueCode::DegenerateShape,
                document_name,
                format!(
                    "shape '{}' has {} point(s), need two corners",
                    shape.label,
                    shape.points.len()
                ),
            ));
            continue;
        };

        let nbox = NormalizedBox::from_corners(corners, doc.image_width, doc.image_height)?;
        outcome.records.push(YoloRecord::new(class_id, nbox));
    }

    Ok(outcome)
}

fn collect_source_files(input: &Path) -> Result<Vec<PathBuf>, LabelprepError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(input).follow_links(true) {
        let entry = entry.map_err(|source| LabelprepError::InputDirInvalid {
            path: input.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        let is_source = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION));

        if entry.file_type().is_file() && is_source {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_by_cached_key(|path| rel_string(input, path));
    Ok(files)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
