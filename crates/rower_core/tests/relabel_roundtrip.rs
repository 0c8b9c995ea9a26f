use rower_core::db::open_db_in_memory;
use rower_core::{
    apply_row_labels, group_by_signature, is_row_label, Activity, ActivityRepository, RowError,
    RowService, SqliteActivityRepository, ROW_SENTINEL,
};

const DATASET: &str = "lci_test";

fn activity(code: &str, name: &str, product: &str, location: &str) -> Activity {
    let mut activity = Activity::new(DATASET, code, name, location);
    activity.reference_product = Some(product.to_string());
    activity
}

fn seed(conn: &mut rusqlite::Connection, activities: &[Activity]) {
    let mut repo = SqliteActivityRepository::new(conn);
    repo.register_dataset(DATASET).unwrap();
    repo.write(DATASET, activities).unwrap();
}

#[test]
fn define_and_relabel_persists_canonical_labels() {
    let mut conn = open_db_in_memory().unwrap();
    seed(
        &mut conn,
        &[
            activity("c1", "steel", "steel", ROW_SENTINEL),
            activity("c2", "steel", "steel", "DE"),
            activity("c3", "wood", "wood", ROW_SENTINEL),
        ],
    );

    {
        let mut service = RowService::new(SqliteActivityRepository::new(&mut conn));
        let outcome = service.define_and_relabel(DATASET).unwrap();
        assert_eq!(outcome.definitions.len(), 2);
    }

    let repo = SqliteActivityRepository::new(&mut conn);
    let stored = repo.load(DATASET).unwrap();
    let by_code = |code: &str| {
        stored
            .iter()
            .find(|a| a.code == code)
            .unwrap_or_else(|| panic!("missing activity {code}"))
    };

    assert_eq!(by_code("c1").location, "RoW_0");
    assert_eq!(by_code("c2").location, "DE");
    assert_eq!(by_code("c3").location, "RoW_1");
    assert!(stored.iter().all(|a| a.location != ROW_SENTINEL));
}

#[test]
fn define_rows_alone_is_a_dry_run() {
    let mut conn = open_db_in_memory().unwrap();
    seed(
        &mut conn,
        &[
            activity("c1", "steel", "steel", ROW_SENTINEL),
            activity("c2", "steel", "steel", "DE"),
        ],
    );

    {
        let service = RowService::new(SqliteActivityRepository::new(&mut conn));
        service.define_rows(DATASET).unwrap();
    }

    let repo = SqliteActivityRepository::new(&mut conn);
    let stored = repo.load(DATASET).unwrap();
    assert!(stored.iter().any(|a| a.location == ROW_SENTINEL));
}

#[test]
fn relabel_count_matches_mapped_sentinel_records() {
    let mut conn = open_db_in_memory().unwrap();
    seed(
        &mut conn,
        &[
            activity("c1", "steel", "steel", ROW_SENTINEL),
            activity("c2", "steel", "steel", ROW_SENTINEL),
            activity("c3", "steel", "steel", "DE"),
        ],
    );

    let mut service = RowService::new(SqliteActivityRepository::new(&mut conn));
    let outcome = service.define_rows(DATASET).unwrap();
    let relabeled = service.relabel(DATASET, &outcome.mapping).unwrap();
    assert_eq!(relabeled, 2);
}

#[test]
fn relabel_against_missing_dataset_is_a_write_failure() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn, &[activity("c1", "steel", "steel", ROW_SENTINEL)]);

    let mapping = {
        let service = RowService::new(SqliteActivityRepository::new(&mut conn));
        service.define_rows(DATASET).unwrap().mapping
    };

    let mut service = RowService::new(SqliteActivityRepository::new(&mut conn));
    let err = service.relabel("missing", &mapping).unwrap_err();
    assert!(matches!(err, RowError::Repo(_)));
}

#[test]
fn relabeled_records_keep_their_signature_group() {
    let mut conn = open_db_in_memory().unwrap();
    seed(
        &mut conn,
        &[
            activity("c1", "steel", "steel", ROW_SENTINEL),
            activity("c2", "steel", "steel", "DE"),
        ],
    );

    let before = {
        let repo = SqliteActivityRepository::new(&mut conn);
        group_by_signature(DATASET, &repo.load(DATASET).unwrap()).unwrap()
    };

    {
        let mut service = RowService::new(SqliteActivityRepository::new(&mut conn));
        service.define_and_relabel(DATASET).unwrap();
    }

    let repo = SqliteActivityRepository::new(&mut conn);
    let after = group_by_signature(DATASET, &repo.load(DATASET).unwrap()).unwrap();

    let before_signatures: Vec<_> = before.keys().cloned().collect();
    let after_signatures: Vec<_> = after.keys().cloned().collect();
    assert_eq!(before_signatures, after_signatures);

    // The relabeled record moved from the sentinel to a canonical label
    // inside the same group.
    let steel_group = &after[&before_signatures[0]];
    assert!(steel_group
        .iter()
        .any(|(location, code)| code == "c1" && is_row_label(location)));
}

#[test]
fn apply_row_labels_is_reusable_for_in_memory_dry_runs() {
    let mut conn = open_db_in_memory().unwrap();
    seed(
        &mut conn,
        &[
            activity("c1", "steel", "steel", ROW_SENTINEL),
            activity("c2", "steel", "steel", "DE"),
        ],
    );

    let mapping = {
        let service = RowService::new(SqliteActivityRepository::new(&mut conn));
        service.define_rows(DATASET).unwrap().mapping
    };
    let mut loaded = {
        let repo = SqliteActivityRepository::new(&mut conn);
        repo.load(DATASET).unwrap()
    };

    let relabeled = apply_row_labels(&mut loaded, &mapping);
    assert_eq!(relabeled, 1);

    // Nothing was persisted.
    let repo = SqliteActivityRepository::new(&mut conn);
    let stored = repo.load(DATASET).unwrap();
    assert!(stored.iter().any(|a| a.location == ROW_SENTINEL));
}
