//! Activity store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide registration, bulk load and bulk write APIs over the
//!   `datasets`/`activities` tables.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `load` returns rows in stable `(name, reference_product, location,
//!   code)` order so downstream grouping is reproducible.
//! - `write` replaces a dataset's rows in a single transaction.
//! - Unknown dataset names are semantic errors, not empty results.

use crate::db::DbError;
use crate::model::activity::{Activity, ActivityValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ACTIVITY_SELECT_SQL: &str = "SELECT
    code,
    dataset,
    name,
    reference_product,
    location
FROM activities";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for activity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Dataset name is not present in the `datasets` registration table.
    UnregisteredDataset(String),
    Validation(ActivityValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnregisteredDataset(name) => write!(f, "dataset not registered: `{name}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted activity data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UnregisteredDataset(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ActivityValidationError> for RepoError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for whole-dataset activity access.
///
/// This is the seam the RoW pipeline is injected with; production code uses
/// the SQLite implementation below, tests may substitute their own.
pub trait ActivityRepository {
    /// Registers a dataset name. Registering an existing name is a no-op.
    fn register_dataset(&mut self, dataset: &str) -> RepoResult<()>;
    /// Returns all registered dataset names sorted ascending.
    fn list_datasets(&self) -> RepoResult<Vec<String>>;
    /// Loads the full activity collection of one dataset.
    fn load(&self, dataset: &str) -> RepoResult<Vec<Activity>>;
    /// Replaces the full activity collection of one dataset atomically.
    fn write(&mut self, dataset: &str, activities: &[Activity]) -> RepoResult<()>;
}

/// SQLite-backed activity store.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn ensure_registered(&self, dataset: &str) -> RepoResult<()> {
        let known: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM datasets WHERE name = ?1;",
            [dataset],
            |row| row.get(0),
        )?;
        if known == 0 {
            return Err(RepoError::UnregisteredDataset(dataset.to_string()));
        }
        Ok(())
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn register_dataset(&mut self, dataset: &str) -> RepoResult<()> {
        if dataset.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "dataset name must not be empty".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT OR IGNORE INTO datasets (name) VALUES (?1);",
            [dataset],
        )?;
        Ok(())
    }

    fn list_datasets(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM datasets ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();

        while let Some(row) = rows.next()? {
            names.push(row.get(0)?);
        }

        Ok(names)
    }

    fn load(&self, dataset: &str) -> RepoResult<Vec<Activity>> {
        self.ensure_registered(dataset)?;

        let mut stmt = self.conn.prepare(&format!(
            "{ACTIVITY_SELECT_SQL}
             WHERE dataset = ?1
             ORDER BY name ASC, reference_product ASC, location ASC, code ASC;"
        ))?;

        let mut rows = stmt.query([dataset])?;
        let mut activities = Vec::new();

        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }

        Ok(activities)
    }

    fn write(&mut self, dataset: &str, activities: &[Activity]) -> RepoResult<()> {
        self.ensure_registered(dataset)?;

        for activity in activities {
            activity.validate()?;
            if activity.dataset != dataset {
                return Err(RepoError::InvalidData(format!(
                    "activity `{}` belongs to dataset `{}`, not `{dataset}`",
                    activity.code, activity.dataset
                )));
            }
        }

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM activities WHERE dataset = ?1;", [dataset])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO activities (
                    code,
                    dataset,
                    name,
                    reference_product,
                    location
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for activity in activities {
                stmt.execute(params![
                    activity.code.as_str(),
                    activity.dataset.as_str(),
                    activity.name.as_str(),
                    activity.reference_product.as_deref(),
                    activity.location.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }
}

fn parse_activity_row(row: &Row<'_>) -> RepoResult<Activity> {
    let activity = Activity {
        code: row.get("code")?,
        dataset: row.get("dataset")?,
        name: row.get("name")?,
        reference_product: row.get("reference_product")?,
        location: row.get("location")?,
    };
    activity.validate()?;
    Ok(activity)
}
