//! Labelprep: convert polygon annotations to YOLO labels and audit them.
//!
//! Labelprep covers the two dataset-preparation steps between a polygon
//! labeling tool and detector training: `convert` turns JSON source
//! documents into normalized YOLO label files, and `check` reconciles an
//! image directory against its label directory, validates every label
//! line, and renders the boxes back onto the imagery for visual review.
//!
//! # Modules
//!
//! - [`geom`]: pixel-corner and normalized box geometry
//! - [`classes`]: label-to-class-id registry
//! - [`yolo`]: label line codec
//! - [`source`]: polygon source document types
//! - [`convert`]: directory conversion pipeline and report
//! - [`check`]: reconciliation, validation and rendering pipeline
//! - [`render`]: raster backend trait and `image`/`imageproc` implementation
//! - [`error`]: error types for labelprep operations

pub mod check;
pub mod classes;
pub mod convert;
pub mod error;
pub mod geom;
pub mod render;
pub mod source;
pub mod yolo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::LabelprepError;

use crate::classes::ClassMap;
use crate::render::{ImageBackend, RasterBackend};

/// The labelprep CLI application.
#[derive(Parser)]
#[command(name = "labelprep")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert polygon source documents to YOLO label files.
    Convert(ConvertArgs),

    /// Check label files against images and render verified boxes.
    Check(CheckArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Directory containing JSON source documents.
    input: PathBuf,

    /// Directory to write label files into (created if absent).
    output: PathBuf,

    /// Class map: a JSON label-to-id object or a data.yaml.
    #[arg(long)]
    classes: PathBuf,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Directory containing images.
    images: PathBuf,

    /// Directory containing YOLO label files.
    labels: PathBuf,

    /// Directory to write annotated images into (created if absent).
    output: PathBuf,

    /// TrueType font for box labels. Without it, well-known system
    /// locations are tried; if none exists, labels are not drawn.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,

    /// Exit non-zero if the check produces any mismatch or finding.
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the labelprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LabelprepError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Check(args)) => run_check(args),
        None => {
            println!("labelprep {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert polygon annotations to YOLO labels and audit them against imagery.");
            println!();
            println!("Run 'labelprep --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), LabelprepError> {
    let classes = ClassMap::load(&args.classes)?;
    let report = convert::convert_dir(&args.input, &args.output, &classes)?;

    print!("{}", report);
    Ok(())
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), LabelprepError> {
    let format = match args.report.as_str() {
        "text" => ReportFormat::Text,
        "json" => ReportFormat::Json,
        other => {
            return Err(LabelprepError::UnsupportedReportFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    };

    let backend = match &args.font {
        Some(path) => ImageBackend::with_font(path)?,
        None => ImageBackend::discover(),
    };
    if !backend.supports_labels() {
        eprintln!("warning: no usable font found; box labels will not be drawn");
    }

    let report = check::check_dataset(&args.images, &args.labels, &args.output, &backend)?;

    match format {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .expect("check report serializes without custom state");
            println!("{}", json);
        }
    }

    if args.strict && !report.is_clean() {
        return Err(LabelprepError::CheckFailed {
            finding_count: report.finding_count(),
            mismatch_count: report.mismatch_count(),
        });
    }

    Ok(())
}
