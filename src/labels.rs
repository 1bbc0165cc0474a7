//! Label-name resolution against the source dataset's class catalog.
//!
//! The source dataset keys its raw annotation rows by machine-generated
//! label codes (e.g. `/m/01yrx`), while callers supply human-readable class
//! names. [`LabelMap`] is the bijection between the two, built once per run
//! from the `class-descriptions.csv` catalog and read-only thereafter.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::OpenVocError;

/// A machine-generated label code from the source dataset catalog.
///
/// Codes are opaque strings; nothing in this crate interprets their
/// structure.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelCode(String);

impl LabelCode {
    /// Creates a new label code.
    #[inline]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LabelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabelCode({})", self.0)
    }
}

impl fmt::Display for LabelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the class-description catalog (headerless CSV).
#[derive(Debug, Deserialize)]
struct CatalogRow {
    label_code: String,
    label_description: String,
}

/// A read-only bijection between caller-supplied class names and the
/// catalog's label codes.
///
/// Names are stored in their normalized (capitalized) form; the annotation
/// writer lower-cases them at emit time.
#[derive(Clone, Debug, Default)]
pub struct LabelMap {
    code_by_name: BTreeMap<String, LabelCode>,
    name_by_code: BTreeMap<LabelCode, String>,
}

impl LabelMap {
    /// Builds the mapping from a class-list file and the catalog CSV.
    ///
    /// # Errors
    ///
    /// Fails with [`OpenVocError::UnresolvedClass`] if any requested class
    /// has no catalog entry. A silent partial mapping would poison every
    /// downstream lookup, so resolution is all-or-nothing.
    pub fn from_files(class_list: &Path, catalog_csv: &Path) -> Result<Self, OpenVocError> {
        let classes = crate::config::read_class_list(class_list)?;
        let catalog = read_catalog(catalog_csv)?;
        Self::resolve(&classes, &catalog)
    }

    /// Resolves a list of class names against a description→code catalog.
    pub fn resolve(
        classes: &[String],
        catalog: &BTreeMap<String, LabelCode>,
    ) -> Result<Self, OpenVocError> {
        let mut map = LabelMap::default();

        for class in classes {
            let name = capitalize(class);
            let code = catalog
                .get(&name)
                .cloned()
                .ok_or_else(|| OpenVocError::UnresolvedClass {
                    class: class.clone(),
                })?;

            map.name_by_code.insert(code.clone(), name.clone());
            map.code_by_name.insert(name, code);
        }

        Ok(map)
    }

    /// Looks up the label code for a normalized class name.
    pub fn code_for(&self, name: &str) -> Option<&LabelCode> {
        self.code_by_name.get(name)
    }

    /// Looks up the class name for a label code.
    pub fn name_for(&self, code: &LabelCode) -> Option<&str> {
        self.name_by_code.get(code).map(String::as_str)
    }

    /// Returns true if the given code belongs to a requested class.
    pub fn contains_code(&self, code: &str) -> bool {
        self.name_by_code.contains_key(&LabelCode::new(code))
    }

    /// Iterates over the requested label codes.
    pub fn codes(&self) -> impl Iterator<Item = &LabelCode> {
        self.name_by_code.keys()
    }

    /// Number of resolved classes.
    pub fn len(&self) -> usize {
        self.name_by_code.len()
    }

    /// Returns true if no classes were resolved.
    pub fn is_empty(&self) -> bool {
        self.name_by_code.is_empty()
    }
}

/// Reads the headerless two-column catalog into a description→code map.
pub fn read_catalog(path: &Path) -> Result<BTreeMap<String, LabelCode>, OpenVocError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut catalog = BTreeMap::new();
    for result in csv_reader.deserialize() {
        let row: CatalogRow = result.map_err(|source| OpenVocError::CatalogCsv {
            path: path.to_path_buf(),
            source,
        })?;
        catalog.insert(row.label_description, LabelCode::new(row.label_code));
    }

    Ok(catalog)
}

/// Normalizes a class name: first character uppercased, the rest lowercased.
///
/// Matches the capitalization the catalog uses for its descriptions.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
