//! Dataset consistency checking and box visualization.
//!
//! A check run reconciles an image directory against an annotation
//! directory by base name, then walks every matched pair: parses the
//! label file, applies the range checks, and renders every record (valid
//! or not) back onto the image through the raster backend. Pairs are
//! processed in sorted base-name order so the diagnostic stream is
//! deterministic.

mod report;

pub use report::{CheckReport, Finding, FindingCode, MismatchReport};

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LabelprepError;
use crate::render::{Color, RasterBackend};
use crate::yolo::parse_label_file;

/// Image extensions joined to annotations, in lookup preference order.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const LABEL_EXTENSION: &str = "txt";

const BOX_COLOR: Color = [0, 255, 0];
const BOX_THICKNESS: u32 = 2;
const LABEL_SCALE: f32 = 16.0;
const LABEL_OFFSET: i32 = 10;

/// Computes the symmetric difference between the image and annotation
/// base-name sets.
///
/// Strictly a reporting operation: neither input is mutated and no files
/// are touched. `missing_annotations` is `images - annotations`,
/// `missing_images` is `annotations - images`.
pub fn reconcile(images: &BTreeSet<String>, annotations: &BTreeSet<String>) -> MismatchReport {
    MismatchReport {
        missing_annotations: images.difference(annotations).cloned().collect(),
        missing_images: annotations.difference(images).cloned().collect(),
    }
}

/// Checks an annotation directory against an image directory and writes
/// one annotated image per matched pair into `output_dir`.
///
/// Findings never filter rendering: records that fail the range checks
/// are reported and drawn anyway. An image that fails to decode skips its
/// pair; nothing skips the run.
pub fn check_dataset<B: RasterBackend>(
    image_dir: &Path,
    label_dir: &Path,
    output_dir: &Path,
    backend: &B,
) -> Result<CheckReport, LabelprepError> {
    let images = scan_dir(image_dir, &IMAGE_EXTENSIONS)?;
    let labels = scan_dir(label_dir, &[LABEL_EXTENSION])?;

    fs::create_dir_all(output_dir).map_err(LabelprepError::Io)?;

    let image_bases: BTreeSet<String> = images.keys().cloned().collect();
    let label_bases: BTreeSet<String> = labels.keys().cloned().collect();

    let mut report = CheckReport::new();
    report.mismatches = reconcile(&image_bases, &label_bases);

    for (base, label_path) in &labels {
        let Some(image_path) = images.get(base) else {
            continue;
        };
        report.pairs_checked += 1;

        let mut canvas = match backend.load(image_path) {
            Ok(canvas) => canvas,
            Err(err) => {
                report.add(Finding::for_pair(
                    FindingCode::UnreadableImage,
                    base,
                    err.to_string(),
                ));
                continue;
            }
        };
        let (width, height) = backend.dimensions(&canvas);

        let content = fs::read_to_string(label_path).map_err(LabelprepError::Io)?;
        let parsed = parse_label_file(&content);

        // Findings for one pair are emitted as a block in ascending line
        // order, so malformed lines and range checks interleave the way
        // they appear in the file.
        let mut pair_findings: Vec<Finding> = Vec::new();

        for malformed in &parsed.malformed {
            pair_findings.push(Finding::at_line(
                FindingCode::MalformedLine,
                base,
                malformed.line,
                malformed.error.to_string(),
            ));
        }

        for (line, record) in &parsed.records {
            if !record.class_integral() {
                pair_findings.push(Finding::at_line(
                    FindingCode::ClassIdNotIntegral,
                    base,
                    *line,
                    format!("class id {} is not a non-negative integer", record.class_id),
                ));
            }

            let nbox = record.nbox();
            if !nbox.center_in_unit_range() {
                pair_findings.push(Finding::at_line(
                    FindingCode::CenterOutOfRange,
                    base,
                    *line,
                    format!("center ({:.6}, {:.6}) outside [0, 1]", nbox.cx, nbox.cy),
                ));
            }
            if !nbox.size_in_unit_range() {
                pair_findings.push(Finding::at_line(
                    FindingCode::SizeOutOfRange,
                    base,
                    *line,
                    format!("size ({:.6}, {:.6}) outside [0, 1]", nbox.w, nbox.h),
                ));
            }

            let (x_min, y_min, x_max, y_max) = nbox.to_pixel_corners(width, height);
            backend.draw_rect(
                &mut canvas,
                (x_min, y_min),
                (x_max, y_max),
                BOX_COLOR,
                BOX_THICKNESS,
            );
            backend.draw_label(
                &mut canvas,
                &format!("Class {}", record.class_label()),
                (x_min, y_min - LABEL_OFFSET),
                LABEL_SCALE,
                BOX_COLOR,
            );
        }

        pair_findings.sort_by_key(|finding| finding.line);
        report.findings.extend(pair_findings);

        let out_path = output_dir.join(format!("{}_annotated.jpg", base));
        backend.save(&canvas, &out_path)?;
        report.annotated_saved += 1;
    }

    Ok(report)
}

/// Maps base names to file paths for one flat directory.
///
/// When several extensions share a base name, the earliest extension in
/// `extensions` wins.
fn scan_dir(dir: &Path, extensions: &[&str]) -> Result<BTreeMap<String, PathBuf>, LabelprepError> {
    if !dir.is_dir() {
        return Err(LabelprepError::InputDirInvalid {
            path: dir.to_path_buf(),
            message: "expected a directory".to_string(),
        });
    }

    let mut found: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();

    for entry in fs::read_dir(dir).map_err(LabelprepError::Io)? {
        let entry = entry.map_err(LabelprepError::Io)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            continue;
        };
        let Some(rank) = extensions
            .iter()
            .position(|allowed| ext.eq_ignore_ascii_case(allowed))
        else {
            continue;
        };
        let Some(base) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        found
            .entry(base.to_string())
            .and_modify(|slot| {
                if rank < slot.0 {
                    *slot = (rank, path.clone());
                }
            })
            .or_insert((rank, path.clone()));
    }

    Ok(found
        .into_iter()
        .map(|(base, (_, path))| (base, path))
        .collect())
}
