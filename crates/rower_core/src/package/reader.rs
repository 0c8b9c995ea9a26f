//! Data package reader.
//!
//! # Responsibility
//! - Load a written package back from disk and revalidate its contract.
//!
//! # Invariants
//! - A package that fails cross-validation (profile, label shape, mapping
//!   coverage) is rejected, not partially returned.

use super::{
    PackageError, PackageManifest, PackageResult, DEFINITIONS_FILE, MANIFEST_FILE, MAPPING_FILE,
    PACKAGE_PROFILE,
};
use crate::model::activity::is_row_label;
use crate::service::definitions::RowDefinitions;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::BufReader;
use std::path::Path;

/// One package loaded from disk.
///
/// The mapping is keyed by bare activity codes, exactly as stored; the
/// owning dataset name is available through the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub manifest: PackageManifest,
    pub definitions: RowDefinitions,
    pub mapping: BTreeMap<String, String>,
}

/// Reads and validates the package at `dirpath`.
pub fn read_package(dirpath: impl AsRef<Path>) -> PackageResult<Package> {
    let dirpath = dirpath.as_ref();
    if !dirpath.is_dir() {
        return Err(PackageError::NotADirectory(dirpath.to_path_buf()));
    }

    let manifest: PackageManifest = read_json(&dirpath.join(MANIFEST_FILE))?;
    if manifest.profile != PACKAGE_PROFILE {
        return Err(PackageError::InvalidPackage(format!(
            "unexpected profile `{}`",
            manifest.profile
        )));
    }

    let definitions: RowDefinitions = read_json(&dirpath.join(DEFINITIONS_FILE))?;
    let mapping: BTreeMap<String, String> = read_json(&dirpath.join(MAPPING_FILE))?;

    if let Some(bad) = mapping.values().find(|label| !is_row_label(label.as_str())) {
        return Err(PackageError::InvalidPackage(format!(
            "mapping value `{bad}` is not a canonical RoW label"
        )));
    }

    let referenced: BTreeSet<&String> = mapping.values().collect();
    let defined: BTreeSet<&String> = definitions.keys().collect();
    if referenced != defined {
        return Err(PackageError::MismatchedMapping {
            definitions: defined.len(),
            identifiers: referenced.len(),
        });
    }

    Ok(Package {
        manifest,
        definitions,
        mapping,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> PackageResult<T> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
