//! Check run reporting.
//!
//! Everything the check pipeline observes lands here: the dataset-level
//! mismatch sets and the per-line findings, all advisory. The report is
//! printable as text and serializable as JSON for programmatic use.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Base names present on one side of the dataset but not the other.
///
/// Computed fresh each run by set difference; a dataset is consistent iff
/// both sets are empty. `BTreeSet` keeps the reporting order sorted and
/// therefore diffable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MismatchReport {
    /// Images lacking an annotation file.
    pub missing_annotations: BTreeSet<String>,

    /// Annotation files lacking an image.
    pub missing_images: BTreeSet<String>,
}

impl MismatchReport {
    /// Returns true if every image has an annotation file and vice versa.
    pub fn is_consistent(&self) -> bool {
        self.missing_annotations.is_empty() && self.missing_images.is_empty()
    }

    /// Total number of mismatched base names across both sets.
    pub fn len(&self) -> usize {
        self.missing_annotations.len() + self.missing_images.len()
    }

    /// Returns true if there are no mismatches.
    pub fn is_empty(&self) -> bool {
        self.is_consistent()
    }
}

/// The result of one check run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CheckReport {
    /// Dataset-level mismatches, reported before any per-file findings.
    pub mismatches: MismatchReport,

    /// Per-file findings, grouped per base name in line order.
    pub findings: Vec<Finding>,

    /// Image/annotation pairs that were examined.
    pub pairs_checked: usize,

    /// Annotated images written to the output directory.
    pub annotated_saved: usize,
}

impl CheckReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finding to the report.
    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Returns the number of findings in the report.
    pub fn finding_count(&self) -> usize {
        self.findings.len()
    }

    /// Returns the number of mismatched base names.
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }

    /// Returns true if there are no mismatches and no findings.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_consistent() && self.findings.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(
                f,
                "Check passed: {} pair(s) verified, {} annotated image(s) saved",
                self.pairs_checked, self.annotated_saved
            );
        }

        writeln!(
            f,
            "Check completed with {} mismatched base name(s) and {} finding(s):",
            self.mismatch_count(),
            self.finding_count()
        )?;
        writeln!(f)?;

        if !self.mismatches.missing_annotations.is_empty() {
            writeln!(
                f,
                "  Missing annotations for image(s): {}",
                join(&self.mismatches.missing_annotations)
            )?;
        }
        if !self.mismatches.missing_images.is_empty() {
            writeln!(
                f,
                "  Missing images for annotation(s): {}",
                join(&self.mismatches.missing_images)
            )?;
        }

        for finding in &self.findings {
            writeln!(f, "  {}", finding)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Verified {} pair(s), saved {} annotated image(s)",
            self.pairs_checked, self.annotated_saved
        )
    }
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// A single advisory finding against one image/annotation pair.
#[derive(Clone, Debug, Serialize)]
pub struct Finding {
    /// A stable code for the finding type.
    pub code: FindingCode,

    /// The base name of the affected pair.
    pub base: String,

    /// 1-based line number inside the annotation file, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// A human-readable description of the finding.
    pub message: String,
}

impl Finding {
    /// Creates a finding tied to a specific annotation line.
    pub fn at_line(
        code: FindingCode,
        base: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            base: base.into(),
            line: Some(line),
            message: message.into(),
        }
    }

    /// Creates a finding about a pair as a whole.
    pub fn for_pair(code: FindingCode, base: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            base: base.into(),
            line: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "[{:?}] {} line {}: {}",
                self.code, self.base, line, self.message
            ),
            None => write!(f, "[{:?}] {}: {}", self.code, self.base, self.message),
        }
    }
}

/// A stable code identifying the type of check finding.
///
/// All findings are advisory: a record flagged by the range codes is
/// still rendered so a reviewer can see exactly what is wrong on the
/// image. Only `UnreadableImage` skips work, and only for its own pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FindingCode {
    /// The image could not be decoded; the pair was skipped.
    UnreadableImage,
    /// A line did not parse; it was excluded from rendering.
    MalformedLine,
    /// The class field is not a non-negative integer.
    ClassIdNotIntegral,
    /// A center coordinate lies outside `[0, 1]`.
    CenterOutOfRange,
    /// A box dimension lies outside `[0, 1]`.
    SizeOutOfRange,
}
