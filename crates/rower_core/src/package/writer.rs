//! Data package writer.
//!
//! # Responsibility
//! - Validate a run outcome and serialize it as `<root>/<name>/` with a
//!   manifest and two JSON resources.
//!
//! # Invariants
//! - An existing package directory is only removed on explicit overwrite;
//!   without it the directory is left untouched.
//! - Mapping keys are reduced to bare activity codes on disk; the dataset
//!   name lives in the manifest.

use super::{
    PackageError, PackageManifest, PackageResult, ResourceDescriptor, DEFINITIONS_FILE,
    MANIFEST_FILE, MAPPING_FILE, PACKAGE_PROFILE,
};
use crate::service::definitions::{ActivityRowMapping, RowOutcome};
use log::{error, info};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Writer options.
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Replace an existing package directory of the same name.
    pub overwrite: bool,
    /// Override the package name (defaults to the implicit dataset name).
    /// You should probably not do this.
    pub rename: Option<String>,
}

/// Writes `outcome` as a data package under `root`.
///
/// The package directory is named after the mapping's implicit dataset name
/// unless [`PackageOptions::rename`] overrides it. Returns the created
/// package path.
pub fn write_package(
    root: impl AsRef<Path>,
    outcome: &RowOutcome,
    options: &PackageOptions,
) -> PackageResult<PathBuf> {
    let started_at = Instant::now();
    let root = root.as_ref();

    let result = prepare_and_write(root, outcome, options);

    match &result {
        Ok(dirpath) => info!(
            "event=package_write module=package status=ok path={} \
             definitions={} mapped_activities={} duration_ms={}",
            dirpath.display(),
            outcome.definitions.len(),
            outcome.mapping.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=package_write module=package status=error root={} duration_ms={} error={err}",
            root.display(),
            started_at.elapsed().as_millis()
        ),
    }

    result
}

fn prepare_and_write(
    root: &Path,
    outcome: &RowOutcome,
    options: &PackageOptions,
) -> PackageResult<PathBuf> {
    validate_outcome(outcome)?;
    let dataset = implicit_dataset_name(&outcome.mapping)?;
    let name = options.rename.clone().unwrap_or_else(|| dataset.clone());

    prepare_root(root)?;

    let dirpath = root.join(&name);
    if dirpath.exists() {
        if !dirpath.is_dir() {
            return Err(PackageError::NotADirectory(dirpath));
        }
        if !options.overwrite {
            return Err(PackageError::DirectoryExists(dirpath));
        }
        fs::remove_dir_all(&dirpath).map_err(|err| map_io(err, &dirpath))?;
    }
    fs::create_dir(&dirpath).map_err(|err| map_io(err, &dirpath))?;

    let manifest = build_manifest(&name, &dataset);
    write_json(&dirpath.join(MANIFEST_FILE), &manifest)?;
    write_json(&dirpath.join(DEFINITIONS_FILE), &outcome.definitions)?;

    let codes_only: BTreeMap<&str, &str> = outcome
        .mapping
        .iter()
        .map(|((_, code), label)| (code.as_str(), label.as_str()))
        .collect();
    write_json(&dirpath.join(MAPPING_FILE), &codes_only)?;

    Ok(dirpath)
}

fn validate_outcome(outcome: &RowOutcome) -> PackageResult<()> {
    if outcome.definitions.is_empty() {
        return Err(PackageError::NoData);
    }

    let referenced: BTreeSet<&String> = outcome.mapping.values().collect();
    let defined: BTreeSet<&String> = outcome.definitions.keys().collect();
    if referenced != defined {
        return Err(PackageError::MismatchedMapping {
            definitions: defined.len(),
            identifiers: referenced.len(),
        });
    }

    Ok(())
}

fn implicit_dataset_name(mapping: &ActivityRowMapping) -> PackageResult<String> {
    let mut names: Vec<String> = mapping.keys().map(|(dataset, _)| dataset.clone()).collect();
    names.sort();
    names.dedup();
    match names.len() {
        1 => Ok(names.remove(0)),
        _ => Err(PackageError::MultipleDatasets(names)),
    }
}

fn prepare_root(root: &Path) -> PackageResult<()> {
    if root.exists() {
        if !root.is_dir() {
            return Err(PackageError::NotADirectory(root.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(root).map_err(|err| map_io(err, root))
}

fn build_manifest(name: &str, dataset: &str) -> PackageManifest {
    PackageManifest {
        name: name.to_string(),
        description: format!("Details about specific RoWs for dataset {dataset}"),
        profile: PACKAGE_PROFILE.to_string(),
        resources: vec![
            ResourceDescriptor {
                name: "RoW definitions".to_string(),
                path: DEFINITIONS_FILE.to_string(),
                description: "Specific RoWs as keys, list of excluded geographies as values"
                    .to_string(),
                format: "json".to_string(),
            },
            ResourceDescriptor {
                name: "Activity to RoW mapping".to_string(),
                path: MAPPING_FILE.to_string(),
                description: "Activity codes as keys, specific RoW labels as values".to_string(),
                format: "json".to_string(),
            },
        ],
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> PackageResult<()> {
    let file = fs::File::create(path).map_err(|err| map_io(err, path))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

fn map_io(err: std::io::Error, path: &Path) -> PackageError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        return PackageError::PermissionDenied(path.to_path_buf());
    }
    PackageError::Io(err)
}
