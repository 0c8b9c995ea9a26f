//! Signature grouping engine.
//!
//! # Responsibility
//! - Partition a dataset's activities by `(name, reference_product)`.
//!
//! # Invariants
//! - The partition is total and disjoint; no record is dropped.
//! - Group order (by signature) and in-group order (by location, then code)
//!   are stable across runs for identical input.

use crate::model::activity::{Activity, Signature};
use crate::service::{RowError, RowResult};
use std::collections::BTreeMap;

/// One `(location, code)` pair of a grouped activity.
pub type LocatedCode = (String, String);

/// Dataset partition keyed by grouping signature.
///
/// `BTreeMap` iteration gives the deterministic signature order the label
/// enumeration in [`crate::service::definitions`] relies on.
pub type GroupedActivities = BTreeMap<Signature, Vec<LocatedCode>>;

/// Partitions `activities` into signature groups.
///
/// Activities without a reference product group under an empty slot rather
/// than being dropped. Fails when the dataset holds zero records.
pub fn group_by_signature(dataset: &str, activities: &[Activity]) -> RowResult<GroupedActivities> {
    if activities.is_empty() {
        return Err(RowError::EmptyDataset {
            dataset: dataset.to_string(),
        });
    }

    let mut groups = GroupedActivities::new();
    for activity in activities {
        groups
            .entry(activity.signature())
            .or_default()
            .push((activity.location.clone(), activity.code.clone()));
    }

    for entries in groups.values_mut() {
        entries.sort();
    }

    Ok(groups)
}
