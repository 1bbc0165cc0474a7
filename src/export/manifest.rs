//! Image-set manifest writing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::OpenVocError;
use crate::records::ImageId;

/// Writes an image-set manifest: one identifier per line, in the given
/// iteration order. With `flip` set, each identifier's flipped-variant
/// name follows on the immediately next line.
///
/// Creates `image_sets_dir` if absent and overwrites any existing manifest
/// for `set_name`. No sorting, no deduplication.
pub fn write_image_set<'a>(
    image_sets_dir: &Path,
    set_name: &str,
    ids: impl IntoIterator<Item = &'a ImageId>,
    flip: bool,
) -> Result<PathBuf, OpenVocError> {
    fs::create_dir_all(image_sets_dir)?;

    let path = image_sets_dir.join(format!("{set_name}.txt"));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    for id in ids {
        writeln!(writer, "{id}")?;
        if flip {
            writeln!(writer, "{}", id.flipped_name())?;
        }
    }

    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_manifest_is_one_id_per_line() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let ids = vec![ImageId::new("A"), ImageId::new("B")];

        let path =
            write_image_set(temp.path(), "test", ids.iter(), false).expect("write manifest");

        let content = fs::read_to_string(path).expect("read manifest");
        assert_eq!(content, "A\nB\n");
    }

    #[test]
    fn flip_manifest_interleaves_flipped_names() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let ids = vec![ImageId::new("A"), ImageId::new("B")];

        let path = write_image_set(temp.path(), "train", ids.iter(), true).expect("write manifest");

        let content = fs::read_to_string(path).expect("read manifest");
        assert_eq!(content, "A\nA_flipped\nB\nB_flipped\n");
    }

    #[test]
    fn rewriting_overwrites_previous_content() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let ids = vec![ImageId::new("A")];

        write_image_set(temp.path(), "train", ids.iter(), false).expect("first write");
        let path = write_image_set(temp.path(), "train", ids.iter(), true).expect("second write");

        let content = fs::read_to_string(path).expect("read manifest");
        assert_eq!(content, "A\nA_flipped\n");
    }

    #[test]
    fn creates_missing_directory_tree() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let nested = temp.path().join("ImageSets").join("Main");

        write_image_set(&nested, "validation", std::iter::empty::<&ImageId>(), false)
            .expect("write into missing dir");

        assert!(nested.join("validation.txt").is_file());
    }
}
