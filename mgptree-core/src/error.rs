use std::path::PathBuf;
use thiserror::Error;

/// Process exit status for a fatal error that is not more specific.
pub const EXIT_FAILURE: i32 = 1;
/// Process exit status when an input file is missing or unreadable.
pub const EXIT_INPUT_UNREADABLE: i32 = 3;
/// Process exit status when a run produced no records.
pub const EXIT_NO_RECORDS: i32 = 4;

#[derive(Error, Debug)]
pub enum MgpError {
    #[error("Could not read input file {}: {}", .path.display(), .source)]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid mgptree database: {}", .path.display(), .reason)]
    InvalidDatabase { path: PathBuf, reason: String },

    #[error("{} uses schema version {}, expected {}", .path.display(), .found, .expected)]
    UnsupportedSchema {
        path: PathBuf,
        found: String,
        expected: u32,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid names found in {}", .0.display())]
    NoNames(PathBuf),

    #[error("None of the {0} input name(s) could be resolved")]
    NoSeedsResolved(usize),

    #[error("No records were produced")]
    NoRecords,
}

impl MgpError {
    pub fn exit_code(&self) -> i32 {
        match self {
            MgpError::InputUnreadable { .. } => EXIT_INPUT_UNREADABLE,
            MgpError::NoNames(_) | MgpError::NoSeedsResolved(_) | MgpError::NoRecords => EXIT_NO_RECORDS,
            _ => EXIT_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, MgpError>;
