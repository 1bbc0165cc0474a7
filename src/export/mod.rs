//! The export pipeline: sequencing of label resolution, aggregation,
//! optional download, manifest and annotation writing, and optional
//! horizontal-flip augmentation.
//!
//! Execution is strictly sequential with blocking I/O. There are no
//! retries beyond the download bound and no rollback: the first hard error
//! aborts the run and leaves partially written output in place.

pub mod flip;
pub mod manifest;
pub mod report;
pub mod voc_xml;

pub use report::{ExportReport, PartitionSummary};

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::aggregate::aggregate_partition;
use crate::config::{ExportConfig, Partition, TRAINVAL_SET};
use crate::download::download_partition_images;
use crate::error::OpenVocError;
use crate::labels::LabelMap;
use crate::records::{ImageId, PartitionRecords};

/// Runs the whole export described by `config` and returns its report.
///
/// The caller decides what a partial report means; this function only
/// fails on hard errors (unresolved classes, malformed CSV, filesystem
/// trouble), never on skipped images.
pub fn run_export(config: &ExportConfig) -> Result<ExportReport, OpenVocError> {
    let labels = LabelMap::from_files(&config.class_list, &config.catalog_csv())?;
    info!("resolved {} class(es)", labels.len());

    let image_sets_dir = config.image_sets_dir();
    let annotations_dir = config.annotations_dir();
    let jpeg_dir = config.jpeg_images_dir();

    let mut report = ExportReport::default();
    let mut dataset: BTreeMap<Partition, PartitionRecords> = BTreeMap::new();

    for partition in Partition::ALL {
        let records =
            aggregate_partition(&config.annotations_csv(partition), partition, &labels)?;
        info!(
            "found {} {} image(s) ({} box(es))",
            records.len(),
            partition,
            records.box_count()
        );

        let mut summary = PartitionSummary::new(partition.as_str());
        summary.images_found = records.len();
        summary.boxes_per_label = records
            .boxes_per_label()
            .into_iter()
            .map(|(code, count)| {
                let name = labels
                    .name_for(&code)
                    .map(str::to_owned)
                    .unwrap_or_else(|| code.as_str().to_owned());
                (name, count)
            })
            .collect();

        if config.download {
            info!("downloading {} image(s)...", partition);
            let wanted: BTreeSet<&ImageId> = records.image_ids().collect();
            let outcome = download_partition_images(
                &config.image_index_csv(partition),
                &wanted,
                &jpeg_dir,
                config.download_retries,
            )?;
            summary.images_downloaded = outcome.fetched;
            summary.downloads_failed = outcome.failed;
        }

        manifest::write_image_set(
            &image_sets_dir,
            partition.as_str(),
            records.image_ids(),
            false,
        )?;

        info!("writing annotations for the {} image(s)...", partition);
        let outcome =
            voc_xml::write_annotations(&records, &labels, &annotations_dir, &jpeg_dir, false)?;
        summary.annotations_written = outcome.written;
        summary.images_skipped = outcome.skipped;

        report.add(summary);
        dataset.insert(partition, records);
    }

    if config.trainval {
        info!("writing {}.txt...", TRAINVAL_SET);
        manifest::write_image_set(&image_sets_dir, TRAINVAL_SET, trainval_ids(&dataset), false)?;
    }

    if config.hflip {
        for partition in Partition::AUGMENTED {
            let records = &dataset[&partition];
            info!("flipping {} image(s)...", partition);

            let flip_outcome = flip::flip_partition_images(records, &jpeg_dir)?;
            let annotation_outcome =
                voc_xml::write_annotations(records, &labels, &annotations_dir, &jpeg_dir, true)?;

            // The partition manifest is re-written with the flipped
            // variants interleaved.
            manifest::write_image_set(
                &image_sets_dir,
                partition.as_str(),
                records.image_ids(),
                true,
            )?;

            if let Some(summary) = report
                .partitions
                .iter_mut()
                .find(|summary| summary.partition == partition.as_str())
            {
                summary.flips_written = flip_outcome.written;
                summary.flips_skipped = flip_outcome.skipped;
                summary.flip_annotations_written = annotation_outcome.written;
            }
        }

        if config.trainval {
            manifest::write_image_set(
                &image_sets_dir,
                TRAINVAL_SET,
                trainval_ids(&dataset),
                true,
            )?;
        }
    }

    Ok(report)
}

/// Set union of the train and validation image identifiers, sorted.
fn trainval_ids(dataset: &BTreeMap<Partition, PartitionRecords>) -> impl Iterator<Item = &ImageId> {
    let mut union: BTreeSet<&ImageId> = BTreeSet::new();
    for partition in Partition::AUGMENTED {
        if let Some(records) = dataset.get(&partition) {
            union.extend(records.image_ids());
        }
    }
    union.into_iter()
}
