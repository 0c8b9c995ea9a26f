//! Domain model for LCI process records.
//!
//! # Responsibility
//! - Define the canonical activity record shape used by grouping and
//!   relabeling logic.
//! - Own the "RoW" sentinel and the canonical `RoW_<n>` label format.
//!
//! # Invariants
//! - `(dataset, code)` identifies an activity; `code` never changes.
//! - Only the `location` field of an activity is ever rewritten by core.

pub mod activity;
