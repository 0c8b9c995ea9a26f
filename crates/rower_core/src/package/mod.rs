//! Data package persistence for RoW artifacts.
//!
//! # Responsibility
//! - Define the on-disk package layout (manifest + two JSON resources).
//! - Own package-level validation and error reporting.
//!
//! # Invariants
//! - A package is written atomically from the caller's viewpoint: the target
//!   subdirectory is created fresh (or replaced on explicit overwrite) and an
//!   existing package is never partially updated.
//! - All JSON output is pretty-printed UTF-8 with non-ASCII preserved
//!   verbatim, so geography names in non-Latin scripts round-trip exactly.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod reader;
pub mod writer;

pub use reader::{read_package, Package};
pub use writer::{write_package, PackageOptions};

/// Manifest file name inside a package directory.
pub const MANIFEST_FILE: &str = "datapackage.json";
/// Resource file holding canonical label -> excluded geographies.
pub const DEFINITIONS_FILE: &str = "RoW_definition.json";
/// Resource file holding activity code -> canonical label.
pub const MAPPING_FILE: &str = "activity_to_RoW_mapping.json";
/// Frictionless-style profile tag carried by the manifest.
pub const PACKAGE_PROFILE: &str = "data-package";

/// Self-describing package manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub description: String,
    pub profile: String,
    pub resources: Vec<ResourceDescriptor>,
}

/// One resource entry of the manifest; `path` is relative to the package
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub name: String,
    pub path: String,
    pub description: String,
    pub format: String,
}

pub type PackageResult<T> = Result<T, PackageError>;

/// Package I/O and validation errors.
#[derive(Debug)]
pub enum PackageError {
    /// Empty RoW definitions; nothing to persist.
    NoData,
    /// Definition keys and mapping-referenced labels disagree.
    MismatchedMapping {
        definitions: usize,
        identifiers: usize,
    },
    /// Mapping keys span more than one implicit dataset name.
    MultipleDatasets(Vec<String>),
    /// Target package directory already exists and overwrite is off.
    DirectoryExists(PathBuf),
    /// Output root (or package path) exists but is not a directory.
    NotADirectory(PathBuf),
    /// Output location is not writable.
    PermissionDenied(PathBuf),
    /// Stored package violates the package contract.
    InvalidPackage(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for PackageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "no RoW definitions to save"),
            Self::MismatchedMapping {
                definitions,
                identifiers,
            } => write!(
                f,
                "RoW definitions and activity mapping disagree: \
                 {definitions} definitions, {identifiers} labels referenced"
            ),
            Self::MultipleDatasets(names) => write!(
                f,
                "activity mapping must cover a single dataset, found: {}",
                names.join(", ")
            ),
            Self::DirectoryExists(path) => {
                write!(f, "package directory already exists: {}", path.display())
            }
            Self::NotADirectory(path) => {
                write!(f, "not a directory: {}", path.display())
            }
            Self::PermissionDenied(path) => {
                write!(f, "not writable: {}", path.display())
            }
            Self::InvalidPackage(message) => write!(f, "invalid package: {message}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PackageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PackageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PackageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
