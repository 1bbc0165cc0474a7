#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;

/// Writes a real JPEG of the given dimensions, creating parent dirs.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    RgbImage::new(width, height)
        .save(path)
        .expect("write jpeg file");
}

/// A synthesized OpenImages source tree plus an empty destination root.
pub struct Fixture {
    pub temp: tempfile::TempDir,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub classes: PathBuf,
}

impl Fixture {
    /// Lays out a cat/dog catalog and empty annotation tables for all
    /// three partitions.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("create temp dir");
        let source = temp.path().join("source");
        let dest = temp.path().join("dest");
        let classes = temp.path().join("classes.txt");

        fs::create_dir_all(&source).expect("create source root");
        fs::write(&classes, "cat\ndog\n").expect("write class list");
        fs::write(
            source.join("class-descriptions.csv"),
            "/m/01yrx,Cat\n/m/0bt9lr,Dog\n",
        )
        .expect("write catalog");

        for partition in ["train", "validation", "test"] {
            let dir = source.join(partition);
            fs::create_dir_all(&dir).expect("create partition dir");
            fs::write(
                dir.join("annotations-human-bbox.csv"),
                "ImageID,Source,LabelName,Confidence,XMin,XMax,YMin,YMax\n",
            )
            .expect("write empty annotations");
        }

        Self {
            temp,
            source,
            dest,
            classes,
        }
    }

    /// Replaces a partition's annotation table. `rows` are raw CSV lines
    /// without the header.
    pub fn set_annotations(&self, partition: &str, rows: &[&str]) {
        let mut content =
            String::from("ImageID,Source,LabelName,Confidence,XMin,XMax,YMin,YMax\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(
            self.source.join(partition).join("annotations-human-bbox.csv"),
            content,
        )
        .expect("write annotations");
    }

    /// Drops a square JPEG into the destination's JPEGImages directory.
    pub fn place_image(&self, image_id: &str, side: u32) {
        write_jpeg(
            &self.dest.join("JPEGImages").join(format!("{image_id}.jpg")),
            side,
            side,
        );
    }

    pub fn manifest(&self, set_name: &str) -> String {
        fs::read_to_string(
            self.dest
                .join("ImageSets")
                .join("Main")
                .join(format!("{set_name}.txt")),
        )
        .expect("read manifest")
    }

    pub fn annotation_xml(&self, stem: &str) -> String {
        fs::read_to_string(self.dest.join("Annotations").join(format!("{stem}.xml")))
            .expect("read annotation xml")
    }

    pub fn annotation_exists(&self, stem: &str) -> bool {
        self.dest
            .join("Annotations")
            .join(format!("{stem}.xml"))
            .is_file()
    }
}

/// Extracts (name, xmin, ymin, xmax, ymax) for every object in a VOC
/// document, in document order.
pub fn parse_objects(xml: &str) -> Vec<(String, i64, i64, i64, i64)> {
    let doc = roxmltree::Document::parse(xml).expect("parse voc xml");
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "annotation");

    root.children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
        .map(|object| {
            let text = |tag: &str| -> String {
                object
                    .children()
                    .find(|c| c.is_element() && c.tag_name().name() == tag)
                    .and_then(|c| c.text())
                    .expect("object child text")
                    .to_string()
            };
            let bndbox = object
                .children()
                .find(|c| c.is_element() && c.tag_name().name() == "bndbox")
                .expect("bndbox element");
            let coord = |tag: &str| -> i64 {
                bndbox
                    .children()
                    .find(|c| c.is_element() && c.tag_name().name() == tag)
                    .and_then(|c| c.text())
                    .expect("bndbox coord")
                    .parse()
                    .expect("integer coord")
            };

            (
                text("name"),
                coord("xmin"),
                coord("ymin"),
                coord("xmax"),
                coord("ymax"),
            )
        })
        .collect()
}
