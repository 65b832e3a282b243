//! On-disk snapshot of a [`RecordStore`].
//!
//! A snapshot is a SQLite file with a `metadata` table carrying the schema
//! version, so files written by other versions are rejected instead of
//! being misread.

use crate::error::{MgpError, Result};
use crate::output::replace_atomically;
use crate::store::{PersonRecord, RecordStore};
use chrono::{DateTime, Utc};
use mgptree_scanner::{PersonId, PersonName};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;

/// Details of the scrape that produced a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInfo {
    pub created_at: DateTime<Utc>,
    pub max_generations: u32,
    pub seeds: Vec<PersonName>,
}

impl SnapshotInfo {
    pub fn new(max_generations: u32, seeds: Vec<PersonName>) -> Self {
        Self {
            created_at: Utc::now(),
            max_generations,
            seeds,
        }
    }
}

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Create (or reuse) a database file and make sure the schema exists.
    pub fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        let db = Database {
            conn,
            path: path.to_path_buf(),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an existing snapshot read-only and check its schema version.
    pub fn open(path: &Path) -> Result<Self> {
        let unreadable = |source| MgpError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        };
        // SQLite reports these as generic open errors, so check up front.
        let file = fs::File::open(path).map_err(unreadable)?;
        if file.metadata().map_err(unreadable)?.is_dir() {
            return Err(unreadable(io::Error::new(io::ErrorKind::IsADirectory, "is a directory")));
        }
        drop(file);

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| invalid(path, e))?;
        let db = Database {
            conn,
            path: path.to_path_buf(),
        };

        match db.schema_version()? {
            Some(version) if version == SCHEMA_VERSION.to_string() => Ok(db),
            Some(found) => Err(MgpError::UnsupportedSchema {
                path: path.to_path_buf(),
                found,
                expected: SCHEMA_VERSION,
            }),
            None => Err(MgpError::InvalidDatabase {
                path: path.to_path_buf(),
                reason: "missing schema version".to_string(),
            }),
        }
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS people (
    id INTEGER PRIMARY KEY,
    family_name TEXT NOT NULL,
    given_name TEXT NOT NULL,
    middle_names TEXT,
    title TEXT,
    institution TEXT,
    year TEXT,
    generation INTEGER NOT NULL CHECK(generation >= 0)
);

CREATE INDEX IF NOT EXISTS idx_people_generation ON people(generation);

-- Ordered advisor list; advisor_id may name a record that was never fetched
CREATE TABLE IF NOT EXISTS advisors (
    advisee_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    advisor_id INTEGER NOT NULL,
    PRIMARY KEY (advisee_id, position),
    FOREIGN KEY(advisee_id) REFERENCES people(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_advisors_advisor ON advisors(advisor_id);
            ",
        )?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<Option<String>> {
        self.metadata("schema_version")
    }

    fn metadata(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(|e| invalid(&self.path, e))
    }

    fn required_metadata(&self, key: &str) -> Result<String> {
        self.metadata(key)?.ok_or_else(|| MgpError::InvalidDatabase {
            path: self.path.clone(),
            reason: format!("missing metadata '{}'", key),
        })
    }

    /// Replace the contents of the database with `store`.
    pub fn save(&mut self, store: &RecordStore, info: &SnapshotInfo) -> Result<()> {
        let seeds = serde_json::to_string(&info.seeds)?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM advisors", [])?;
        tx.execute("DELETE FROM people", [])?;
        tx.execute("DELETE FROM metadata", [])?;

        {
            let mut insert_meta = tx.prepare("INSERT INTO metadata (key, value) VALUES (?1, ?2)")?;
            insert_meta.execute(params!["schema_version", SCHEMA_VERSION.to_string()])?;
            insert_meta.execute(params!["created_at", info.created_at.to_rfc3339()])?;
            insert_meta.execute(params!["max_generations", info.max_generations.to_string()])?;
            insert_meta.execute(params!["seeds", seeds])?;

            let mut insert_person = tx.prepare(
                "INSERT INTO people (id, family_name, given_name, middle_names, title, institution, year, generation)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            let mut insert_advisor =
                tx.prepare("INSERT INTO advisors (advisee_id, position, advisor_id) VALUES (?1, ?2, ?3)")?;

            for id in store.ids() {
                let Some(record) = store.get(id) else {
                    continue;
                };
                insert_person.execute(params![
                    record.id,
                    record.name.last,
                    record.name.first,
                    record.name.middle,
                    record.title,
                    record.institution,
                    record.year,
                    record.generation,
                ])?;
                for (position, advisor) in record.advisors.iter().enumerate() {
                    insert_advisor.execute(params![record.id, position as i64, *advisor])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    pub fn load_info(&self) -> Result<SnapshotInfo> {
        let created_at = self.required_metadata("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| MgpError::InvalidDatabase {
                path: self.path.clone(),
                reason: format!("bad created_at '{}': {}", created_at, e),
            })?
            .with_timezone(&Utc);

        let max_generations = self.required_metadata("max_generations")?;
        let max_generations = max_generations.parse().map_err(|_| MgpError::InvalidDatabase {
            path: self.path.clone(),
            reason: format!("bad max_generations '{}'", max_generations),
        })?;

        let seeds = serde_json::from_str(&self.required_metadata("seeds")?)?;

        Ok(SnapshotInfo {
            created_at,
            max_generations,
            seeds,
        })
    }

    pub fn load_store(&self) -> Result<RecordStore> {
        let mut advisors: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT advisee_id, advisor_id FROM advisors ORDER BY advisee_id, position")
                .map_err(|e| invalid(&self.path, e))?;
            let rows = stmt.query_map([], |row| Ok((row.get::<_, PersonId>(0)?, row.get::<_, PersonId>(1)?)))?;
            for row in rows {
                let (advisee, advisor) = row?;
                advisors.entry(advisee).or_default().push(advisor);
            }
        }

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, family_name, given_name, middle_names, title, institution, year, generation
                 FROM people ORDER BY id",
            )
            .map_err(|e| invalid(&self.path, e))?;

        let records = stmt
            .query_map([], |row| {
                let id: PersonId = row.get(0)?;
                Ok(PersonRecord {
                    id,
                    name: PersonName {
                        last: row.get(1)?,
                        first: row.get(2)?,
                        middle: row.get(3)?,
                    },
                    title: row.get(4)?,
                    institution: row.get(5)?,
                    year: row.get(6)?,
                    advisors: Vec::new(),
                    generation: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records
            .into_iter()
            .map(|mut record| {
                record.advisors = advisors.remove(&record.id).unwrap_or_default();
                record
            })
            .collect())
    }
}

fn invalid(path: &Path, error: rusqlite::Error) -> MgpError {
    MgpError::InvalidDatabase {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

/// Write a snapshot to `path`, replacing any previous file only once the new
/// one is complete.
pub fn write_snapshot(path: &Path, store: &RecordStore, info: &SnapshotInfo) -> Result<()> {
    replace_atomically(path, |temp| {
        let mut db = Database::create(temp.path())?;
        db.save(store, info)
    })
}

pub fn read_snapshot(path: &Path) -> Result<(RecordStore, SnapshotInfo)> {
    let db = Database::open(path)?;
    let info = db.load_info()?;
    let store = db.load_store()?;
    Ok((store, info))
}
