//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the activity store contract consumed by the RoW pipeline.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository reads and writes enforce `Activity::validate()`.
//! - Dataset writes are all-or-nothing; partial batches never persist.

pub mod activity_repo;
