//! Conversion run reporting.

use std::fmt;

/// The outcome of one conversion run over a directory of source documents.
#[derive(Clone, Debug, Default)]
pub struct ConvertReport {
    /// Source documents seen.
    pub documents: usize,

    /// Documents that produced a label file.
    pub converted: usize,

    /// Records written across all label files.
    pub records: usize,

    /// All issues found during conversion, in processing order.
    pub issues: Vec<ConvertIssue>,
}

impl ConvertReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: ConvertIssue) {
        self.issues.push(issue);
    }

    /// Returns true if conversion finished without any issues.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Converted {} of {} document(s), {} record(s) written",
            self.converted, self.documents, self.records
        )?;

        if !self.issues.is_empty() {
            writeln!(f)?;
            for issue in &self.issues {
                writeln!(f, "  {}", issue)?;
            }
        }

        Ok(())
    }
}

/// A single non-fatal conversion issue.
#[derive(Clone, Debug)]
pub struct ConvertIssue {
    /// A stable code for the issue type.
    pub code: ConvertIssueCode,

    /// The source document the issue occurred in.
    pub document: String,

    /// A human-readable description of the issue.
    pub message: String,
}

impl ConvertIssue {
    /// Creates a new conversion issue.
    pub fn new(
        code: ConvertIssueCode,
        document: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            document: document.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.code, self.document, self.message)
    }
}

/// A stable code identifying the type of conversion issue.
///
/// None of these abort the batch: a document affected by `SourceParse`,
/// `InvalidDimensions` or `DuplicateBaseName` is skipped as a whole, the
/// other codes drop a single shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConvertIssueCode {
    /// The document could not be read or parsed as JSON.
    SourceParse,
    /// The document declares zero or negative image dimensions.
    InvalidDimensions,
    /// A shape carries a label absent from the class map.
    UnknownLabel,
    /// A shape has fewer than the two corner points required.
    DegenerateShape,
    /// Another document already produced this output base name.
    DuplicateBaseName,
}
