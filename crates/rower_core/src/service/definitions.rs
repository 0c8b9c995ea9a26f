//! RoW definition generator.
//!
//! # Responsibility
//! - Select signature groups containing the RoW sentinel.
//! - Compute per-group excluded-geography lists.
//! - Assign canonical `RoW_<n>` labels in deterministic group order.
//!
//! # Invariants
//! - Excluded-geography lists are sorted, deduplicated and never contain the
//!   sentinel.
//! - Labels are run-local positional indices; they restart at `RoW_0` every
//!   run and are not stable across dataset edits.
//! - Every emitted label is referenced by at least one mapped activity.

use crate::model::activity::{is_row_label, row_label, ROW_SENTINEL};
use crate::service::grouping::GroupedActivities;
use crate::service::{RowError, RowResult};
use log::warn;
use std::collections::BTreeMap;

/// Canonical label -> excluded explicit geographies.
pub type RowDefinitions = BTreeMap<String, Vec<String>>;

/// Transient activity identity used while one run is in flight.
pub type ActivityKey = (String, String); // (dataset, code)

/// `(dataset, code)` -> canonical label, for sentinel-carrying records only.
pub type ActivityRowMapping = BTreeMap<ActivityKey, String>;

/// Both artifacts of one disambiguation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub definitions: RowDefinitions,
    pub mapping: ActivityRowMapping,
}

/// Derives RoW definitions and the activity mapping from a dataset partition.
///
/// Groups without a sentinel record are skipped. A qualifying group whose
/// excluded-geography list is empty is a degenerate, trivially-global RoW and
/// is kept. Fails when zero groups qualify.
pub fn define_rows(dataset: &str, groups: &GroupedActivities) -> RowResult<RowOutcome> {
    let mut definitions = RowDefinitions::new();
    let mut mapping = ActivityRowMapping::new();

    for (signature, entries) in groups {
        if !entries
            .iter()
            .any(|(location, _)| location.as_str() == ROW_SENTINEL)
        {
            continue;
        }

        if entries
            .iter()
            .any(|(location, _)| is_row_label(location.as_str()))
        {
            warn!(
                "event=define_rows module=service status=warn dataset={dataset} \
                 signature=\"{signature}\" reason=canonical_labels_already_present"
            );
        }

        let label = row_label(definitions.len());

        let mut excluded: Vec<String> = entries
            .iter()
            .map(|(location, _)| location.clone())
            .filter(|location| location.as_str() != ROW_SENTINEL)
            .collect();
        excluded.sort();
        excluded.dedup();
        definitions.insert(label.clone(), excluded);

        for (location, code) in entries {
            if location.as_str() == ROW_SENTINEL {
                mapping.insert((dataset.to_string(), code.clone()), label.clone());
            }
        }
    }

    if definitions.is_empty() {
        return Err(RowError::NoRowFound {
            dataset: dataset.to_string(),
        });
    }

    Ok(RowOutcome {
        definitions,
        mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::define_rows;
    use crate::model::activity::Activity;
    use crate::service::grouping::group_by_signature;
    use crate::service::RowError;

    fn activity(code: &str, name: &str, location: &str) -> Activity {
        let mut activity = Activity::new("db", code, name, location);
        activity.reference_product = Some(name.to_string());
        activity
    }

    #[test]
    fn no_sentinel_groups_is_terminal() {
        let activities = vec![activity("c1", "steel", "DE"), activity("c2", "wood", "FR")];
        let groups = group_by_signature("db", &activities).unwrap();
        let err = define_rows("db", &groups).unwrap_err();
        assert!(matches!(err, RowError::NoRowFound { dataset } if dataset == "db"));
    }

    #[test]
    fn excluded_geographies_are_sorted_deduplicated_and_sentinel_free() {
        let activities = vec![
            activity("c1", "steel", "RoW"),
            activity("c2", "steel", "FR"),
            activity("c3", "steel", "DE"),
            activity("c4", "steel", "DE"),
        ];
        let groups = group_by_signature("db", &activities).unwrap();
        let outcome = define_rows("db", &groups).unwrap();

        assert_eq!(
            outcome.definitions["RoW_0"],
            vec!["DE".to_string(), "FR".to_string()]
        );
    }

    #[test]
    fn degenerate_group_keeps_empty_definition() {
        let activities = vec![activity("c1", "wood", "RoW")];
        let groups = group_by_signature("db", &activities).unwrap();
        let outcome = define_rows("db", &groups).unwrap();

        assert_eq!(outcome.definitions["RoW_0"], Vec::<String>::new());
        assert_eq!(
            outcome.mapping[&("db".to_string(), "c1".to_string())],
            "RoW_0"
        );
    }

    #[test]
    fn multiple_sentinel_records_in_one_group_share_one_label() {
        let activities = vec![
            activity("c1", "steel", "RoW"),
            activity("c2", "steel", "RoW"),
            activity("c3", "steel", "DE"),
        ];
        let groups = group_by_signature("db", &activities).unwrap();
        let outcome = define_rows("db", &groups).unwrap();

        assert_eq!(outcome.definitions.len(), 1);
        assert_eq!(outcome.mapping.len(), 2);
        assert!(outcome.mapping.values().all(|label| label == "RoW_0"));
    }

    #[test]
    fn labels_enumerate_qualifying_groups_in_signature_order() {
        let activities = vec![
            activity("c1", "wood", "RoW"),
            activity("c2", "steel", "RoW"),
            activity("c3", "paper", "SE"),
        ];
        let groups = group_by_signature("db", &activities).unwrap();
        let outcome = define_rows("db", &groups).unwrap();

        // "paper" does not qualify; "steel" < "wood" by signature.
        assert_eq!(
            outcome.mapping[&("db".to_string(), "c2".to_string())],
            "RoW_0"
        );
        assert_eq!(
            outcome.mapping[&("db".to_string(), "c1".to_string())],
            "RoW_1"
        );
    }
}
