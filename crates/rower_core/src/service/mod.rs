//! RoW disambiguation pipeline.
//!
//! # Responsibility
//! - Partition dataset activities by grouping signature.
//! - Derive canonical RoW labels and their excluded-geography definitions.
//! - Apply labels back onto activity records and persist them.
//!
//! # Invariants
//! - Pipeline stages are pure where possible; only `RowService` touches the
//!   activity store.
//! - Identical input always yields identical groups, labels and mappings.

use crate::repo::activity_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod definitions;
pub mod grouping;
pub mod relabel;
pub mod row_service;

pub type RowResult<T> = Result<T, RowError>;

/// Pipeline error for one disambiguation run.
///
/// Every variant is terminal for the run; there is no retry path.
#[derive(Debug)]
pub enum RowError {
    /// Dataset is registered but holds zero activities.
    EmptyDataset { dataset: String },
    /// No activity in the dataset carries the RoW sentinel location.
    NoRowFound { dataset: String },
    /// Activity store failure (load, write-back, unknown dataset).
    Repo(RepoError),
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataset { dataset } => {
                write!(f, "dataset `{dataset}` contains no activities")
            }
            Self::NoRowFound { dataset } => {
                write!(f, "no activities with RoW location found in dataset `{dataset}`")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RowError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
