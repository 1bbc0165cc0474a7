//! Per-partition image records: bounding boxes grouped by image and label.

use std::collections::BTreeMap;
use std::fmt;

use crate::bbox::BBox;
use crate::config::{Partition, FLIP_SUFFIX};
use crate::labels::LabelCode;

/// Identifier of an image in the source dataset (an opaque string).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(String);

impl ImageId {
    /// Creates a new image identifier.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier of this image's horizontally flipped variant.
    pub fn flipped_name(&self) -> String {
        format!("{}{}", self.0, FLIP_SUFFIX)
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Boxes for one image, grouped by label code in encounter order within
/// each label.
pub type ImageRecord = BTreeMap<LabelCode, Vec<BBox>>;

/// All image records aggregated from one partition's annotation stream.
///
/// `BTreeMap` keys give deterministic iteration order (sorted by image id),
/// so manifests and annotation documents come out identical across runs.
#[derive(Clone, Debug)]
pub struct PartitionRecords {
    pub partition: Partition,
    pub images: BTreeMap<ImageId, ImageRecord>,
}

impl PartitionRecords {
    /// Creates an empty record set for a partition.
    pub fn new(partition: Partition) -> Self {
        Self {
            partition,
            images: BTreeMap::new(),
        }
    }

    /// Appends one box to an image's per-label list, creating the image
    /// record and label list lazily on first encounter.
    pub fn push_box(&mut self, image_id: ImageId, code: LabelCode, bbox: BBox) {
        self.images
            .entry(image_id)
            .or_default()
            .entry(code)
            .or_default()
            .push(bbox);
    }

    /// Number of distinct images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true if no images were recorded.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Iterates image identifiers in deterministic (sorted) order.
    pub fn image_ids(&self) -> impl Iterator<Item = &ImageId> {
        self.images.keys()
    }

    /// Total number of boxes across all images and labels.
    pub fn box_count(&self) -> usize {
        self.images
            .values()
            .flat_map(|record| record.values())
            .map(Vec::len)
            .sum()
    }

    /// Per-label box totals across the whole partition.
    pub fn boxes_per_label(&self) -> BTreeMap<LabelCode, usize> {
        let mut counts: BTreeMap<LabelCode, usize> = BTreeMap::new();
        for record in self.images.values() {
            for (code, boxes) in record {
                *counts.entry(code.clone()).or_default() += boxes.len();
            }
        }
        counts
    }
}
