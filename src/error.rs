use std::path::PathBuf;
use thiserror::Error;

/// The main error type for openvoc operations.
///
/// Per-image problems (an unreadable source image, a download that keeps
/// failing) are deliberately *not* represented here: the pipeline skips and
/// logs those, and surfaces them through [`ExportReport`] counts and the
/// final [`ExportIncomplete`](OpenVocError::ExportIncomplete) status.
///
/// [`ExportReport`]: crate::export::ExportReport
#[derive(Debug, Error)]
pub enum OpenVocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("class '{class}' has no entry in the class-description catalog")]
    UnresolvedClass { class: String },

    #[error("Failed to parse class-description catalog {path}: {source}")]
    CatalogCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse annotations CSV {path}: {source}")]
    AnnotationCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse image index CSV {path}: {source}")]
    ImageIndexCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("export finished with {skipped} skipped image(s)")]
    ExportIncomplete { skipped: usize },
}
