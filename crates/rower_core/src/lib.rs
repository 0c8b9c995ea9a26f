//! Core logic for consistent "Rest-of-World" labeling in LCI datasets.
//!
//! Many LCI datasets share the placeholder location `"RoW"` even though the
//! geographies it excludes differ per process/product group. This crate
//! groups a dataset's activities by `(name, reference_product)`, derives a
//! canonical `RoW_<n>` label and an excluded-geography definition per group,
//! optionally rewrites the affected activities in place, and persists both
//! artifacts as a self-describing data package.

pub mod db;
pub mod logging;
pub mod model;
pub mod package;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{
    is_row_label, row_label, Activity, ActivityValidationError, Signature, ROW_SENTINEL,
};
pub use package::{
    read_package, write_package, Package, PackageError, PackageManifest, PackageOptions,
    PackageResult, ResourceDescriptor,
};
pub use repo::activity_repo::{
    ActivityRepository, RepoError, RepoResult, SqliteActivityRepository,
};
pub use service::definitions::{
    define_rows, ActivityKey, ActivityRowMapping, RowDefinitions, RowOutcome,
};
pub use service::grouping::{group_by_signature, GroupedActivities, LocatedCode};
pub use service::relabel::apply_row_labels;
pub use service::row_service::RowService;
pub use service::{RowError, RowResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
