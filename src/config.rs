//! Export configuration and dataset layout.
//!
//! All paths and feature toggles live in an immutable [`ExportConfig`] that
//! is passed into the pipeline driver at construction. There is no
//! process-wide state.
//!
//! # Source layout
//!
//! ```text
//! <source_root>/
//!   class-descriptions.csv            label code, free-text description
//!   <partition>/
//!     annotations-human-bbox.csv      one row per (image, label, box)
//!     images.csv                      ImageID, OriginalURL (download only)
//! ```
//!
//! # Destination layout
//!
//! ```text
//! <dest_root>/
//!   ImageSets/Main/<set>.txt          one image identifier per line
//!   Annotations/<id>.xml              one VOC document per image
//!   JPEGImages/<id>.jpg               source and flipped images
//! ```

use std::path::{Path, PathBuf};

/// File name of the label-code/description catalog under the source root.
pub const CLASS_DESCRIPTIONS_CSV: &str = "class-descriptions.csv";

/// File name of the per-partition annotation table.
pub const ANNOTATIONS_CSV: &str = "annotations-human-bbox.csv";

/// File name of the per-partition image index (used only for download).
pub const IMAGE_INDEX_CSV: &str = "images.csv";

/// Identifier suffix for horizontally flipped variants.
pub const FLIP_SUFFIX: &str = "_flipped";

/// Name of the combined train+validation image set.
pub const TRAINVAL_SET: &str = "trainval";

/// One of the three dataset splits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Partition {
    Train,
    Validation,
    Test,
}

impl Partition {
    /// All partitions, in pipeline processing order.
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Validation, Partition::Test];

    /// The partitions that take part in flip augmentation.
    pub const AUGMENTED: [Partition; 2] = [Partition::Train, Partition::Validation];

    /// Directory and image-set name for this partition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Validation => "validation",
            Partition::Test => "test",
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration for one export run.
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Root of the source dataset distribution.
    pub source_root: PathBuf,

    /// Root of the destination dataset tree.
    pub dest_root: PathBuf,

    /// Plain-text file listing the class names of interest, one per line.
    pub class_list: PathBuf,

    /// Fetch source images over the network before writing annotations.
    pub download: bool,

    /// Also emit a combined train+validation image set.
    pub trainval: bool,

    /// Generate horizontally flipped images, annotations and image sets
    /// for the train and validation partitions.
    pub hflip: bool,

    /// Attempts per image before a download is given up on.
    pub download_retries: u32,
}

impl ExportConfig {
    /// Creates a configuration with all feature toggles off.
    pub fn new(
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        class_list: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            class_list: class_list.into(),
            download: false,
            trainval: false,
            hflip: false,
            download_retries: 3,
        }
    }

    /// Enables or disables image download.
    pub fn with_download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    /// Enables or disables the combined trainval image set.
    pub fn with_trainval(mut self, trainval: bool) -> Self {
        self.trainval = trainval;
        self
    }

    /// Enables or disables horizontal-flip augmentation.
    pub fn with_hflip(mut self, hflip: bool) -> Self {
        self.hflip = hflip;
        self
    }

    /// Sets the per-image download attempt bound.
    pub fn with_download_retries(mut self, retries: u32) -> Self {
        self.download_retries = retries;
        self
    }

    /// Path of the label-code/description catalog.
    pub fn catalog_csv(&self) -> PathBuf {
        self.source_root.join(CLASS_DESCRIPTIONS_CSV)
    }

    /// Path of a partition's annotation table.
    pub fn annotations_csv(&self, partition: Partition) -> PathBuf {
        self.source_root.join(partition.as_str()).join(ANNOTATIONS_CSV)
    }

    /// Path of a partition's image index.
    pub fn image_index_csv(&self, partition: Partition) -> PathBuf {
        self.source_root.join(partition.as_str()).join(IMAGE_INDEX_CSV)
    }

    /// Directory receiving the image-set manifests.
    pub fn image_sets_dir(&self) -> PathBuf {
        self.dest_root.join("ImageSets").join("Main")
    }

    /// Directory receiving the per-image annotation documents.
    pub fn annotations_dir(&self) -> PathBuf {
        self.dest_root.join("Annotations")
    }

    /// Directory holding the JPEG images (downloaded, pre-existing, flipped).
    pub fn jpeg_images_dir(&self) -> PathBuf {
        self.dest_root.join("JPEGImages")
    }
}

/// Reads a class-list file: one class name per line, blank lines ignored.
pub fn read_class_list(path: &Path) -> Result<Vec<String>, std::io::Error> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect())
}
