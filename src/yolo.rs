//! YOLO label line codec.
//!
//! One annotation file holds one line per box:
//! `"<class_id> <center_x> <center_y> <box_width> <box_height>"`, the four
//! geometry fields formatted with exactly six digits after the decimal
//! point. Parsing and domain validation are separate stages: this module
//! only decides whether a line has the right shape (five numeric tokens);
//! whether the values are in range is the check pipeline's concern.

use std::fmt;

use crate::classes::ClassId;
use crate::geom::NormalizedBox;

/// One normalized box record, as stored on a single label line.
///
/// The class field is kept as parsed (floating point) rather than as an
/// integer: fractional class ids are accepted by the parser and flagged
/// downstream, so they must survive the round trip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloRecord {
    pub class_id: f64,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl YoloRecord {
    /// Creates a record from a resolved class id and a normalized box.
    pub fn new(class_id: ClassId, nbox: NormalizedBox) -> Self {
        Self {
            class_id: class_id.as_u32() as f64,
            cx: nbox.cx,
            cy: nbox.cy,
            w: nbox.w,
            h: nbox.h,
        }
    }

    /// Returns the geometry fields as a [`NormalizedBox`].
    pub fn nbox(&self) -> NormalizedBox {
        NormalizedBox::new(self.cx, self.cy, self.w, self.h)
    }

    /// Returns true if the class field is a non-negative integer, the
    /// only domain the text format actually defines.
    pub fn class_integral(&self) -> bool {
        self.class_id.is_finite() && self.class_id >= 0.0 && self.class_id.fract() == 0.0
    }

    /// The class id truncated to an integer, for display purposes.
    pub fn class_label(&self) -> i64 {
        self.class_id as i64
    }

    /// Serializes the record to its single-line text form.
    pub fn to_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.cx, self.cy, self.w, self.h
        )
    }
}

/// Why a single line failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineError {
    /// The line did not split into exactly five tokens.
    TokenCount(usize),
    /// A token did not parse as a floating-point number.
    NonNumeric { token: String },
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::TokenCount(found) if *found > 5 => {
                write!(f, "expected exactly 5 tokens, found more")
            }
            LineError::TokenCount(found) => {
                write!(f, "expected exactly 5 tokens, found {}", found)
            }
            LineError::NonNumeric { token } => {
                write!(f, "token '{}' is not a number", token)
            }
        }
    }
}

/// Parses one label line into a record.
///
/// A line is well-formed iff it splits into exactly five
/// whitespace-separated tokens that all parse as `f64`. A fractional or
/// negative first token is accepted here; the check pipeline reports it
/// as a format concern.
pub fn parse_line(line: &str) -> Result<YoloRecord, LineError> {
    // Cap token collection so pathological lines cannot allocate unbounded memory.
    let tokens: Vec<&str> = line.split_whitespace().take(6).collect();

    if tokens.len() != 5 {
        return Err(LineError::TokenCount(tokens.len()));
    }

    let mut values = [0.0f64; 5];
    for (value, token) in values.iter_mut().zip(&tokens) {
        *value = token.parse::<f64>().map_err(|_| LineError::NonNumeric {
            token: (*token).to_string(),
        })?;
    }

    Ok(YoloRecord {
        class_id: values[0],
        cx: values[1],
        cy: values[2],
        w: values[3],
        h: values[4],
    })
}

/// A malformed line found while parsing a label file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number.
    pub line: usize,
    pub error: LineError,
}

/// The outcome of parsing a whole label file.
///
/// Malformed lines never abort the file: they are collected alongside the
/// records that did parse, each addressed by its 1-based line number.
#[derive(Clone, Debug, Default)]
pub struct ParsedLabelFile {
    pub records: Vec<(usize, YoloRecord)>,
    pub malformed: Vec<MalformedLine>,
}

/// Parses the full contents of a label file.
pub fn parse_label_file(content: &str) -> ParsedLabelFile {
    let mut parsed = ParsedLabelFile::default();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;
        match parse_line(line) {
            Ok(record) => parsed.records.push((line_num, record)),
            Err(error) => parsed.malformed.push(MalformedLine {
                line: line_num,
                error,
            }),
        }
    }

    parsed
}

/// Serializes records to the contents of a label file.
///
/// Lines are joined with `"\n"` and zero records serialize to an empty
/// file, which keeps converter output byte-stable across runs.
pub fn write_label_file(records: &[YoloRecord]) -> String {
    records
        .iter()
        .map(YoloRecord::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_line(input: &str) {
    let _ = parse_line(input);
}
