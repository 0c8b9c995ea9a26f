//! Label assigner.
//!
//! # Responsibility
//! - Rewrite the `location` field of mapped activities with their canonical
//!   RoW labels, in memory.
//!
//! # Invariants
//! - Only `location` is touched; identity and signature fields stay intact.
//! - Unmapped activities pass through unchanged.

use crate::model::activity::Activity;
use crate::service::definitions::ActivityRowMapping;

/// Applies canonical labels to the in-memory collection.
///
/// Returns the number of relabeled activities. Pure with respect to the
/// store, which makes dry runs trivial; persistence is a separate step in
/// [`crate::service::row_service::RowService`].
pub fn apply_row_labels(activities: &mut [Activity], mapping: &ActivityRowMapping) -> usize {
    let mut relabeled = 0;

    for activity in activities.iter_mut() {
        let key = (activity.dataset.clone(), activity.code.clone());
        if let Some(label) = mapping.get(&key) {
            activity.location = label.clone();
            relabeled += 1;
        }
    }

    relabeled
}
