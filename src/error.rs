use std::path::PathBuf;
use thiserror::Error;

/// The main error type for labelprep operations.
#[derive(Debug, Error)]
pub enum LabelprepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse source document {path}: {source}")]
    SourceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse class map {path}: {source}")]
    ClassMapParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse class map {path}: {source}")]
    ClassMapYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unusable class map {path}: {message}")]
    ClassMapInvalid { path: PathBuf, message: String },

    #[error("Invalid image dimensions {width}x{height} (must be positive)")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Invalid input directory {path}: {message}")]
    InputDirInvalid { path: PathBuf, message: String },

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to load font {path}: {message}")]
    FontLoad { path: PathBuf, message: String },

    #[error("Unsupported report format: {0}")]
    UnsupportedReportFormat(String),

    #[error("Check found {finding_count} finding(s) and {mismatch_count} mismatched base name(s)")]
    CheckFailed {
        finding_count: usize,
        mismatch_count: usize,
    },
}
