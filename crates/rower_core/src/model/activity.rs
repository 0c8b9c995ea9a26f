//! Activity record model and RoW label helpers.
//!
//! # Responsibility
//! - Define the fixed-shape process record loaded from an activity store.
//! - Validate required fields once, at load/write time, not at point-of-use.
//! - Provide the grouping signature and canonical RoW label primitives.
//!
//! # Invariants
//! - `ROW_SENTINEL` is the only value treated as an unresolved RoW marker.
//! - Canonical labels have the exact shape `RoW_<decimal index>` and are
//!   never themselves sentinels.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Placeholder location meaning "everywhere not modeled explicitly".
pub const ROW_SENTINEL: &str = "RoW";

static ROW_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^RoW_[0-9]+$").expect("valid RoW label regex"));

/// Builds the canonical run-scoped RoW label for a group index.
pub fn row_label(index: usize) -> String {
    format!("RoW_{index}")
}

/// Returns whether `value` is a canonical `RoW_<n>` label.
///
/// The bare sentinel `"RoW"` is not a canonical label.
pub fn is_row_label(value: &str) -> bool {
    ROW_LABEL_RE.is_match(value)
}

/// Grouping key: activities sharing one `(name, reference_product)` pair
/// describe the same process/product in different geographies.
///
/// Total order (`Ord`) keeps group enumeration deterministic across runs;
/// activities without a reference product sort before those with one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Signature {
    pub name: String,
    pub reference_product: Option<String>,
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.reference_product {
            Some(product) => write!(f, "{} / {product}", self.name),
            None => write!(f, "{} / -", self.name),
        }
    }
}

/// One process/activity record of an LCI dataset.
///
/// Owned by the activity store; core treats every field except `location`
/// as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Stable identity, unique within `dataset`.
    pub code: String,
    /// Name of the owning dataset.
    pub dataset: String,
    /// Process name.
    pub name: String,
    /// Reference product; absent records group under an empty slot.
    pub reference_product: Option<String>,
    /// Free-text geography. `"RoW"` marks an unresolved rest-of-world entry.
    pub location: String,
}

impl Activity {
    /// Creates an activity with no reference product.
    pub fn new(
        dataset: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            dataset: dataset.into(),
            name: name.into(),
            reference_product: None,
            location: location.into(),
        }
    }

    /// Returns the grouping signature for this record.
    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            reference_product: self.reference_product.clone(),
        }
    }

    /// Returns whether this record carries the unresolved RoW sentinel.
    pub fn is_row(&self) -> bool {
        self.location == ROW_SENTINEL
    }

    /// Checks required-field invariants.
    ///
    /// Called by the store on every load and before every write, so
    /// downstream grouping code can rely on non-empty fields.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.code.trim().is_empty() {
            return Err(ActivityValidationError::EmptyCode);
        }
        if self.dataset.trim().is_empty() {
            return Err(ActivityValidationError::EmptyDataset);
        }
        if self.name.trim().is_empty() {
            return Err(ActivityValidationError::EmptyName);
        }
        if self.location.trim().is_empty() {
            return Err(ActivityValidationError::EmptyLocation);
        }
        Ok(())
    }
}

/// Required-field violations for activity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityValidationError {
    EmptyCode,
    EmptyDataset,
    EmptyName,
    EmptyLocation,
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "activity code must not be empty"),
            Self::EmptyDataset => write!(f, "activity dataset must not be empty"),
            Self::EmptyName => write!(f, "activity name must not be empty"),
            Self::EmptyLocation => write!(f, "activity location must not be empty"),
        }
    }
}

impl Error for ActivityValidationError {}

#[cfg(test)]
mod tests {
    use super::{is_row_label, row_label, Activity, ActivityValidationError, ROW_SENTINEL};

    #[test]
    fn row_label_formats_index() {
        assert_eq!(row_label(0), "RoW_0");
        assert_eq!(row_label(12), "RoW_12");
    }

    #[test]
    fn row_label_recognizer_accepts_canonical_labels_only() {
        assert!(is_row_label("RoW_0"));
        assert!(is_row_label("RoW_41"));
        assert!(!is_row_label(ROW_SENTINEL));
        assert!(!is_row_label("RoW_"));
        assert!(!is_row_label("RoW_1x"));
        assert!(!is_row_label("row_1"));
    }

    #[test]
    fn sentinel_detection_is_exact() {
        let row = Activity::new("db", "c1", "steel", ROW_SENTINEL);
        let geo = Activity::new("db", "c2", "steel", "DE");
        let labeled = Activity::new("db", "c3", "steel", "RoW_0");
        assert!(row.is_row());
        assert!(!geo.is_row());
        assert!(!labeled.is_row());
    }

    #[test]
    fn signature_ignores_location_and_code() {
        let a = Activity::new("db", "c1", "steel", "RoW");
        let b = Activity::new("db", "c2", "steel", "DE");
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn signature_orders_missing_product_first() {
        let mut bare = Activity::new("db", "c1", "steel", "DE");
        bare.reference_product = None;
        let mut with_product = Activity::new("db", "c2", "steel", "DE");
        with_product.reference_product = Some("steel".to_string());
        assert!(bare.signature() < with_product.signature());
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        let blank_code = Activity::new("db", "  ", "steel", "DE");
        assert_eq!(
            blank_code.validate().unwrap_err(),
            ActivityValidationError::EmptyCode
        );

        let blank_location = Activity::new("db", "c1", "steel", "");
        assert_eq!(
            blank_location.validate().unwrap_err(),
            ActivityValidationError::EmptyLocation
        );
    }

    #[test]
    fn validate_allows_missing_reference_product() {
        let activity = Activity::new("db", "c1", "steel", "DE");
        assert!(activity.validate().is_ok());
    }
}
