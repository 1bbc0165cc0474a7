//! Pascal VOC XML annotation writing.
//!
//! One document is emitted per image record, named after the image
//! identifier (with the flipped-variant suffix when mirroring). Pixel
//! dimensions come from a header probe of the image file in `JPEGImages/`;
//! an image whose file is absent or unreadable is skipped and logged, not
//! fatal — a handful of broken files must not halt a batch over a large
//! dataset.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::OpenVocError;
use crate::labels::LabelMap;
use crate::records::{ImageRecord, PartitionRecords};

/// Outcome of one annotation-writing pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnnotationOutcome {
    /// Documents written.
    pub written: usize,
    /// Images skipped because their file could not be probed.
    pub skipped: usize,
}

/// Writes one VOC XML document per image record.
///
/// With `mirror` set, box coordinates are reflected about the 1.0 axis
/// before pixel conversion and the document (and the filename it names)
/// take the flipped-variant identifier. Dimensions are always probed from
/// the *original* image file; the flipped copy shares them.
pub fn write_annotations(
    records: &PartitionRecords,
    labels: &LabelMap,
    annotations_dir: &Path,
    jpeg_dir: &Path,
    mirror: bool,
) -> Result<AnnotationOutcome, OpenVocError> {
    fs::create_dir_all(annotations_dir)?;

    let mut outcome = AnnotationOutcome::default();

    for (image_id, record) in &records.images {
        let image_path = jpeg_dir.join(format!("{image_id}.jpg"));

        let dims = match imagesize::size(&image_path) {
            Ok(dims) => dims,
            Err(err) => {
                warn!("skipping image {image_id}: {err} ({})", image_path.display());
                outcome.skipped += 1;
                continue;
            }
        };
        let width = dims.width as u32;
        let height = dims.height as u32;

        let stem = if mirror {
            image_id.flipped_name()
        } else {
            image_id.as_str().to_owned()
        };

        let xml = render_annotation(&stem, width, height, record, labels, mirror);
        let xml_path = annotations_dir.join(format!("{stem}.xml"));
        fs::write(&xml_path, xml)?;

        debug!("wrote {}", xml_path.display());
        outcome.written += 1;
    }

    Ok(outcome)
}

/// Renders one annotation document for an image of the given dimensions.
fn render_annotation(
    stem: &str,
    width: u32,
    height: u32,
    record: &ImageRecord,
    labels: &LabelMap,
    mirror: bool,
) -> String {
    let mut xml = String::new();

    writeln!(xml, "<?xml version=\"1.0\" encoding=\"utf-8\"?>").expect("write to string");
    writeln!(xml, "<annotation>").expect("write to string");
    writeln!(xml, "  <folder>JPEGImages</folder>").expect("write to string");
    writeln!(xml, "  <filename>{}.jpg</filename>", xml_escape(stem)).expect("write to string");
    writeln!(xml, "  <size>").expect("write to string");
    writeln!(xml, "    <width>{}</width>", width).expect("write to string");
    writeln!(xml, "    <height>{}</height>", height).expect("write to string");
    writeln!(xml, "  </size>").expect("write to string");

    for (code, boxes) in record {
        // Codes absent from the label map are dropped at aggregation time;
        // a record can only hold requested codes.
        let name = labels
            .name_for(code)
            .map(str::to_lowercase)
            .unwrap_or_else(|| code.as_str().to_owned());

        for bbox in boxes {
            let normalized = if mirror { bbox.mirrored() } else { *bbox };
            let pixel = normalized.to_pixel(width, height);

            writeln!(xml, "  <object>").expect("write to string");
            writeln!(xml, "    <name>{}</name>", xml_escape(&name)).expect("write to string");
            writeln!(xml, "    <bndbox>").expect("write to string");
            writeln!(xml, "      <xmin>{}</xmin>", pixel.xmin).expect("write to string");
            writeln!(xml, "      <ymin>{}</ymin>", pixel.ymin).expect("write to string");
            writeln!(xml, "      <xmax>{}</xmax>", pixel.xmax).expect("write to string");
            writeln!(xml, "      <ymax>{}</ymax>", pixel.ymax).expect("write to string");
            writeln!(xml, "    </bndbox>").expect("write to string");
            writeln!(xml, "  </object>").expect("write to string");
        }
    }

    writeln!(xml, "</annotation>").expect("write to string");
    xml
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
