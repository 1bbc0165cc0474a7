//! Annotation aggregation: streaming a partition's raw rows into
//! [`PartitionRecords`].
//!
//! The annotation table is scanned once; rows whose label code is not in
//! the caller's [`LabelMap`] are dropped (not retained as "unknown"). A row
//! whose numeric fields fail to parse aborts the aggregation — a malformed
//! annotations file is a source-data problem the user must see, and the
//! same policy applies to every numeric read in this crate.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::bbox::BBox;
use crate::config::Partition;
use crate::error::OpenVocError;
use crate::labels::{LabelCode, LabelMap};
use crate::records::{ImageId, PartitionRecords};

/// One raw annotation row. The source table carries more columns
/// (confidence, occlusion flags, ...); serde ignores what we don't name.
#[derive(Debug, Deserialize)]
struct AnnotationRow {
    #[serde(rename = "ImageID")]
    image_id: String,
    #[serde(rename = "LabelName")]
    label_name: String,
    #[serde(rename = "XMin")]
    xmin: f64,
    #[serde(rename = "XMax")]
    xmax: f64,
    #[serde(rename = "YMin")]
    ymin: f64,
    #[serde(rename = "YMax")]
    ymax: f64,
}

/// Aggregates a partition's annotation CSV file.
///
/// # Errors
///
/// Fails with [`OpenVocError::AnnotationCsv`] on any unreadable or
/// malformed row, naming the offending file.
pub fn aggregate_partition(
    path: &Path,
    partition: Partition,
    labels: &LabelMap,
) -> Result<PartitionRecords, OpenVocError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    aggregate_from_reader(reader, partition, labels, path)
}

/// Aggregates annotation rows from any reader.
///
/// This is a pure fold over the row stream: boxes land in their image's
/// per-label list in row-encounter order. `path` is only used for error
/// reporting; tests pass byte slices with a placeholder path.
pub fn aggregate_from_reader<R: Read>(
    reader: R,
    partition: Partition,
    labels: &LabelMap,
    path: &Path,
) -> Result<PartitionRecords, OpenVocError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = PartitionRecords::new(partition);

    for result in csv_reader.deserialize() {
        let row: AnnotationRow = result.map_err(|source| OpenVocError::AnnotationCsv {
            path: path.to_path_buf(),
            source,
        })?;

        if !labels.contains_code(&row.label_name) {
            continue;
        }

        records.push_box(
            ImageId::new(row.image_id),
            LabelCode::new(row.label_name),
            BBox::new(row.xmin, row.xmax, row.ymin, row.ymax),
        );
    }

    Ok(records)
}
