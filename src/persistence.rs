use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::{Map, Value};

use crate::errors::IngestError;

/// The JSON store: `{ "<timestamp>": { "<field>": "<value>", ... }, ... }`.
///
/// The `Store` value owns the file path exclusively; it is moved into
/// the ingest task at startup and no other component writes the file.
/// That single-writer ownership is what makes the unlocked
/// read-modify-write below safe.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge one submission record into the store file.
    ///
    /// Reads the full document, inserts `timestamp -> record`
    /// (overwriting silently on a colliding key), truncates and
    /// rewrites the whole file pretty-printed. The file is opened
    /// without `create`: it must pre-exist with at least `{}`.
    ///
    /// Returns the number of entries now in the store.
    pub fn append(&self, timestamp: &str, record: Map<String, Value>) -> Result<usize, IngestError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)?;

        let mut text = String::new();
        file.read_to_string(&mut text)?;

        let doc: Value = serde_json::from_str(&text)?;
        let Value::Object(mut doc) = doc else {
            return Err(IngestError::NotAnObject);
        };

        doc.insert(timestamp.to_string(), Value::Object(record));
        let count = doc.len();

        // serde_json leaves non-ASCII characters unescaped, so the
        // file stays human-readable for non-Latin submissions.
        let pretty = serde_json::to_string_pretty(&Value::Object(doc))?;

        file.seek(SeekFrom::Start(0))?;
        file.set_len(0)?;
        file.write_all(pretty.as_bytes())?;

        Ok(count)
    }
}

/// Store key for one submission: the local wall-clock reading at
/// receipt time, e.g. "2024-05-17 14:03:21.532106".
///
/// Microsecond resolution makes collisions unlikely but not
/// impossible; a colliding key overwrites the earlier record.
pub fn timestamp_key() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}
