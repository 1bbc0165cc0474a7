//! Optional retrieval of source images over the network.
//!
//! The per-partition image index maps image identifiers to their original
//! URLs. Each wanted image is fetched with a bounded number of attempts;
//! an image whose download keeps failing is logged and counted, not fatal
//! — the annotation pass simply skips it later for want of a readable
//! file.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::OpenVocError;
use crate::records::ImageId;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One row of the per-partition image index. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct ImageIndexRow {
    #[serde(rename = "ImageID")]
    image_id: String,
    #[serde(rename = "OriginalURL")]
    original_url: String,
}

/// Outcome of a partition's download pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct DownloadOutcome {
    /// Images fetched and written to the destination.
    pub fetched: usize,
    /// Images given up on after exhausting the attempt bound.
    pub failed: usize,
}

/// Downloads every wanted image listed in `index_csv` into `jpeg_dir`.
///
/// `retries` is the total number of attempts per image (minimum 1).
/// Existing files are overwritten.
pub fn download_partition_images(
    index_csv: &Path,
    wanted: &BTreeSet<&ImageId>,
    jpeg_dir: &Path,
    retries: u32,
) -> Result<DownloadOutcome, OpenVocError> {
    std::fs::create_dir_all(jpeg_dir)?;

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(HTTP_TIMEOUT))
        .build();
    let agent: ureq::Agent = config.into();

    let file = File::open(index_csv)?;
    let mut csv_reader = csv::Reader::from_reader(BufReader::new(file));

    let mut outcome = DownloadOutcome::default();

    for result in csv_reader.deserialize() {
        let row: ImageIndexRow = result.map_err(|source| OpenVocError::ImageIndexCsv {
            path: index_csv.to_path_buf(),
            source,
        })?;

        if !wanted.contains(&ImageId::new(row.image_id.clone())) {
            continue;
        }

        let dest = jpeg_dir.join(format!("{}.jpg", row.image_id));
        info!("fetching {} -> {}", row.original_url, dest.display());

        match fetch_with_retries(&agent, &row.original_url, retries) {
            Ok(bytes) => {
                std::fs::write(&dest, bytes)?;
                outcome.fetched += 1;
            }
            Err(message) => {
                warn!(
                    "giving up on image {} after {} attempt(s): {}",
                    row.image_id,
                    retries.max(1),
                    message
                );
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}

fn fetch_with_retries(agent: &ureq::Agent, url: &str, retries: u32) -> Result<Vec<u8>, String> {
    let attempts = retries.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match fetch(agent, url) {
            Ok(bytes) => return Ok(bytes),
            Err(message) => {
                debug!("attempt {attempt}/{attempts} for {url} failed: {message}");
                last_error = message;
            }
        }
    }

    Err(last_error)
}

fn fetch(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>, String> {
    let mut response = agent
        .get(url)
        .call()
        .map_err(|source| source.to_string())?;

    response
        .body_mut()
        .read_to_vec()
        .map_err(|source| source.to_string())
}
