//! Structured reporting for an export run.
//!
//! Tracks per-partition counts (images found, boxes matched, documents
//! written, images skipped, downloads failed) so users can see exactly
//! what a run produced — and whether it was only partially successful.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Counts for one pass over a single image set.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PartitionSummary {
    /// Image-set name ("train", "validation", "test").
    pub partition: String,
    /// Distinct images with at least one matching annotation row.
    pub images_found: usize,
    /// Matching boxes, totalled per label name.
    pub boxes_per_label: BTreeMap<String, usize>,
    /// Annotation documents written.
    pub annotations_written: usize,
    /// Images skipped because their file was absent or unreadable.
    pub images_skipped: usize,
    /// Images fetched over the network (download runs only).
    pub images_downloaded: usize,
    /// Downloads given up on after exhausting retries.
    pub downloads_failed: usize,
    /// Flipped images written (augmentation runs only).
    pub flips_written: usize,
    /// Flipped annotation documents written.
    pub flip_annotations_written: usize,
    /// Images skipped during the flip pass.
    pub flips_skipped: usize,
}

impl PartitionSummary {
    /// Create an empty summary for a named image set.
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            ..Default::default()
        }
    }

    /// Total boxes matched in this partition.
    pub fn box_count(&self) -> usize {
        self.boxes_per_label.values().sum()
    }
}

/// A report generated by one export run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExportReport {
    pub partitions: Vec<PartitionSummary>,
}

impl ExportReport {
    /// Add a partition summary to the report.
    pub fn add(&mut self, summary: PartitionSummary) {
        self.partitions.push(summary);
    }

    /// Total images skipped across all partitions and passes, download
    /// failures included.
    pub fn skipped_count(&self) -> usize {
        self.partitions
            .iter()
            .map(|p| p.images_skipped + p.flips_skipped + p.downloads_failed)
            .sum()
    }

    /// Total annotation documents written, flipped variants included.
    pub fn written_count(&self) -> usize {
        self.partitions
            .iter()
            .map(|p| p.annotations_written + p.flip_annotations_written)
            .sum()
    }

    /// Returns true if any image was skipped anywhere.
    ///
    /// A partial run still leaves a usable dataset behind, but the caller
    /// must be able to tell it apart from a complete one.
    pub fn is_partial(&self) -> bool {
        self.skipped_count() > 0
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for summary in &self.partitions {
            writeln!(
                f,
                "{}: {} image(s), {} box(es), {} annotation(s) written",
                summary.partition,
                summary.images_found,
                summary.box_count(),
                summary.annotations_written
            )?;

            for (label, count) in &summary.boxes_per_label {
                writeln!(f, "  {}: {} box(es)", label, count)?;
            }

            if summary.images_downloaded > 0 || summary.downloads_failed > 0 {
                writeln!(
                    f,
                    "  downloaded {} image(s), {} failed",
                    summary.images_downloaded, summary.downloads_failed
                )?;
            }

            if summary.flips_written > 0 || summary.flips_skipped > 0 {
                writeln!(
                    f,
                    "  flipped {} image(s), {} flipped annotation(s) written",
                    summary.flips_written, summary.flip_annotations_written
                )?;
            }

            if summary.images_skipped > 0 || summary.flips_skipped > 0 {
                writeln!(
                    f,
                    "  skipped {} image(s)",
                    summary.images_skipped + summary.flips_skipped
                )?;
            }
        }

        if self.is_partial() {
            writeln!(
                f,
                "\nPartial export: {} image(s) skipped in total",
                self.skipped_count()
            )?;
        } else {
            writeln!(f, "\nExport complete")?;
        }

        Ok(())
    }
}
