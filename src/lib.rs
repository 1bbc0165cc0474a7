//! Openvoc: OpenImages → Pascal VOC dataset exporter.
//!
//! Openvoc reads a subset of the OpenImages bounding-box annotations
//! (selected by a caller-supplied class list), converts the normalized box
//! coordinates to absolute pixel bounds, and writes the Pascal VOC on-disk
//! layout consumed by object-detection training pipelines: image-set
//! manifests, one XML annotation document per image, and optionally the
//! source images themselves. A horizontal-flip augmentation can double the
//! train and validation partitions.
//!
//! # Modules
//!
//! - [`labels`]: class-name ↔ label-code resolution
//! - [`aggregate`]: streaming aggregation of raw annotation rows
//! - [`bbox`]: normalized boxes and the pixel-coordinate conversion
//! - [`export`]: manifests, VOC XML, flip augmentation, pipeline driver
//! - [`download`]: optional retrieval of source images
//! - [`error`]: error types for openvoc operations

pub mod aggregate;
pub mod bbox;
pub mod config;
pub mod download;
pub mod error;
pub mod export;
pub mod labels;
pub mod records;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::ExportConfig;
pub use error::OpenVocError;

/// The openvoc CLI application.
#[derive(Parser)]
#[command(name = "openvoc")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Export an OpenImages subset as a Pascal VOC dataset.
    Export(ExportArgs),
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Root of the OpenImages distribution (class-descriptions.csv plus
    /// per-partition annotation tables).
    #[arg(long)]
    source: PathBuf,

    /// Destination root for the VOC layout.
    #[arg(long)]
    dest: PathBuf,

    /// Plain-text class list, one name per line.
    #[arg(long)]
    classes: PathBuf,

    /// Fetch source images over the network.
    #[arg(long)]
    download: bool,

    /// Also emit a combined train+validation image set.
    #[arg(long)]
    trainval: bool,

    /// Generate horizontally flipped images, annotations and image sets
    /// for train and validation.
    #[arg(long)]
    hflip: bool,

    /// Download attempts per image before giving up.
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the openvoc CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), OpenVocError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Export(args)) => run_export_command(args),
        None => {
            // No subcommand: just print a help hint and exit successfully
            println!("openvoc {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("OpenImages to Pascal VOC dataset exporter.");
            println!();
            println!("Run 'openvoc --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the export subcommand.
fn run_export_command(args: ExportArgs) -> Result<(), OpenVocError> {
    let config = ExportConfig::new(args.source, args.dest, args.classes)
        .with_download(args.download)
        .with_trainval(args.trainval)
        .with_hflip(args.hflip)
        .with_download_retries(args.retries);

    let report = export::run_export(&config)?;

    match args.output.as_str() {
        "json" => {
            let rendered = serde_json::to_string_pretty(&report)
                .expect("report serialization is infallible");
            println!("{rendered}");
        }
        _ => {
            print!("{report}");
        }
    }

    // A partial run left a usable dataset behind but must be observable
    // in the exit status.
    if report.is_partial() {
        Err(OpenVocError::ExportIncomplete {
            skipped: report.skipped_count(),
        })
    } else {
        Ok(())
    }
}
