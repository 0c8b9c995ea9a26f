//! RoW disambiguation use-case service.
//!
//! # Responsibility
//! - Orchestrate load -> group -> define -> (optional) relabel/persist for
//!   one dataset.
//! - Keep compute and write-back separately callable for dry runs.
//!
//! # Invariants
//! - `define_rows` performs no writes.
//! - `relabel` persists the whole mutated collection or surfaces the write
//!   failure; there is no partial persistence path in core.

use crate::repo::activity_repo::ActivityRepository;
use crate::service::definitions::{define_rows, ActivityRowMapping, RowOutcome};
use crate::service::grouping::group_by_signature;
use crate::service::relabel::apply_row_labels;
use crate::service::RowResult;
use log::{error, info};
use std::time::Instant;

/// Disambiguation facade over an injected activity store.
pub struct RowService<R: ActivityRepository> {
    repo: R,
}

impl<R: ActivityRepository> RowService<R> {
    /// Creates a service using the provided store implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Computes RoW definitions and the activity mapping for `dataset`.
    ///
    /// Read-only; the store is not mutated.
    pub fn define_rows(&self, dataset: &str) -> RowResult<RowOutcome> {
        let started_at = Instant::now();
        info!("event=define_rows module=service status=start dataset={dataset}");

        let result = self.load_and_define(dataset);

        match &result {
            Ok(outcome) => info!(
                "event=define_rows module=service status=ok dataset={dataset} \
                 definitions={} row_activities={} duration_ms={}",
                outcome.definitions.len(),
                outcome.mapping.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=define_rows module=service status=error dataset={dataset} \
                 duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }

        result
    }

    /// Rewrites mapped activities' locations and persists the dataset.
    ///
    /// Returns the relabel count. The batch is handed to the store as one
    /// atomic write; a failing write leaves the stored dataset unchanged.
    pub fn relabel(&mut self, dataset: &str, mapping: &ActivityRowMapping) -> RowResult<usize> {
        let started_at = Instant::now();
        info!("event=relabel module=service status=start dataset={dataset}");

        let result = (|| {
            let mut activities = self.repo.load(dataset)?;
            let relabeled = apply_row_labels(&mut activities, mapping);
            self.repo.write(dataset, &activities)?;
            Ok(relabeled)
        })();

        match &result {
            Ok(relabeled) => info!(
                "event=relabel module=service status=ok dataset={dataset} \
                 relabeled={relabeled} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=relabel module=service status=error dataset={dataset} \
                 duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }

        result
    }

    /// Computes definitions, then labels the dataset in place.
    pub fn define_and_relabel(&mut self, dataset: &str) -> RowResult<RowOutcome> {
        let outcome = self.define_rows(dataset)?;
        self.relabel(dataset, &outcome.mapping)?;
        Ok(outcome)
    }

    fn load_and_define(&self, dataset: &str) -> RowResult<RowOutcome> {
        let activities = self.repo.load(dataset)?;
        let groups = group_by_signature(dataset, &activities)?;
        define_rows(dataset, &groups)
    }
}
