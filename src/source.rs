//! Source annotation documents.
//!
//! One JSON document per image, as produced by polygon labeling tools:
//! `imageWidth`/`imageHeight` in pixels, `imagePath` (only its base name
//! is used), and a list of labeled shapes whose first two points are
//! opposite rectangle corners. Documents carry many more fields than
//! these; everything else is ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LabelprepError;
use crate::geom::CornerBox;

/// A source annotation document.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    /// Declared image width in pixels. Validated at normalization time,
    /// not at parse time, so bad values surface per document.
    pub image_width: f64,

    /// Declared image height in pixels.
    pub image_height: f64,

    /// Image file name or path; only the base name is used.
    pub image_path: String,

    /// Labeled shapes. Absent means an image with no annotations.
    #[serde(default)]
    pub shapes: Vec<SourceShape>,
}

/// One labeled shape inside a source document.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceShape {
    pub label: String,

    /// Corner points in pixel space. Two opposite corners are expected;
    /// extra points (polygon exports) are ignored beyond the first two.
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
}

impl SourceDocument {
    /// Reads and parses a document from disk.
    pub fn read(path: &Path) -> Result<Self, LabelprepError> {
        let data = fs::read_to_string(path).map_err(LabelprepError::Io)?;
        Self::from_json_str(&data).map_err(|source| LabelprepError::SourceParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The base name joining this document to its image and label file:
    /// the final path component of `imagePath` with its extension removed.
    pub fn base_name(&self) -> &str {
        let name = self
            .image_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.image_path.as_str());

        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }
}

impl SourceShape {
    /// The first two points as an opposite-corner box, in source order.
    ///
    /// Returns `None` for degenerate shapes with fewer than two points.
    pub fn corner_box(&self) -> Option<CornerBox> {
        match self.points.as_slice() {
            [first, second, ..] => Some(CornerBox::from_points(*first, *second)),
            _ => None,
        }
    }
}

/// Fuzz-only entrypoint for document parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_document(input: &str) {
    let _ = SourceDocument::from_json_str(input);
}
