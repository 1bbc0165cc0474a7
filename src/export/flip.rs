//! Horizontal-flip augmentation of partition images.
//!
//! Each image in the partition is decoded, reflected across the vertical
//! axis, and saved under its flipped-variant filename. The in-memory
//! records for the originals are never touched; the mirrored annotation
//! documents are produced by a separate writer pass with the mirror flag
//! set.

use std::path::Path;

use image::ImageReader;
use tracing::{debug, warn};

use crate::error::OpenVocError;
use crate::records::PartitionRecords;

/// Outcome of one flip pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlipOutcome {
    /// Flipped images written.
    pub written: usize,
    /// Images skipped because the source file could not be decoded.
    pub skipped: usize,
}

/// Writes a horizontally mirrored copy of every partition image.
///
/// An unreadable source image is skipped and logged; a failure to *write*
/// the flipped copy aborts the run.
pub fn flip_partition_images(
    records: &PartitionRecords,
    jpeg_dir: &Path,
) -> Result<FlipOutcome, OpenVocError> {
    let mut outcome = FlipOutcome::default();

    for image_id in records.image_ids() {
        let src = jpeg_dir.join(format!("{image_id}.jpg"));
        let dst = jpeg_dir.join(format!("{}.jpg", image_id.flipped_name()));

        match flip_image_file(&src, &dst) {
            Ok(()) => {
                debug!("flipped {} -> {}", src.display(), dst.display());
                outcome.written += 1;
            }
            Err(FlipError::Unreadable(message)) => {
                warn!("skipping flip of image {image_id}: {message}");
                outcome.skipped += 1;
            }
            Err(FlipError::Write(source)) => {
                return Err(OpenVocError::ImageWrite {
                    path: dst,
                    source,
                });
            }
        }
    }

    Ok(outcome)
}

#[derive(Debug)]
enum FlipError {
    Unreadable(String),
    Write(image::ImageError),
}

/// Decodes `src` (format guessed from content, not extension), mirrors it
/// horizontally, and encodes the result at `dst` (format from extension).
fn flip_image_file(src: &Path, dst: &Path) -> Result<(), FlipError> {
    let reader = ImageReader::open(src)
        .map_err(|err| FlipError::Unreadable(err.to_string()))?
        .with_guessed_format()
        .map_err(|err| FlipError::Unreadable(err.to_string()))?;

    let img = reader
        .decode()
        .map_err(|err| FlipError::Unreadable(err.to_string()))?;

    img.fliph().save(dst).map_err(FlipError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use crate::config::Partition;
    use crate::labels::LabelCode;
    use crate::records::ImageId;
    use image::{Rgb, RgbImage};

    fn records_with(ids: &[&str]) -> PartitionRecords {
        let mut records = PartitionRecords::new(Partition::Train);
        for id in ids {
            records.push_box(
                ImageId::new(*id),
                LabelCode::new("/m/01yrx"),
                BBox::new(0.0, 1.0, 0.0, 1.0),
            );
        }
        records
    }

    #[test]
    fn flip_image_file_mirrors_pixels() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let src = temp.path().join("src.bmp");
        let dst = temp.path().join("dst.bmp");

        // Left column white, the rest black.
        let mut img = RgbImage::new(4, 2);
        for y in 0..2 {
            img.put_pixel(0, y, Rgb([255, 255, 255]));
        }
        img.save(&src).expect("save source bmp");

        flip_image_file(&src, &dst).expect("flip");

        let flipped = image::open(&dst).expect("reload").to_rgb8();
        assert_eq!(flipped.get_pixel(3, 0), &Rgb([255, 255, 255]));
        assert_eq!(flipped.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn missing_source_image_is_skipped() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let records = records_with(&["absent"]);

        let outcome = flip_partition_images(&records, temp.path()).expect("flip pass");
        assert_eq!(outcome.written, 0);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn flip_pass_writes_suffixed_files() {
        let temp = tempfile::tempdir().expect("create temp dir");

        let img = RgbImage::new(3, 3);
        img.save(temp.path().join("img1.jpg")).expect("save source");

        let records = records_with(&["img1"]);
        let outcome = flip_partition_images(&records, temp.path()).expect("flip pass");

        assert_eq!(outcome.written, 1);
        assert!(temp.path().join("img1_flipped.jpg").is_file());
    }
}
