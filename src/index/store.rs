//! Persisted index artifacts.
//!
//! The index persists as two JSON files in a dedicated cache directory: the
//! data artifact (the full date-to-entry map) and a metadata envelope (build
//! time, counts, schema version). Loading enforces version-based
//! invalidation: a cache written under an older schema version is discarded
//! wholesale, never partially migrated.

use crate::Result;
use crate::index::DateIndexEntry;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

const LOG_TARGET: &str = "    store";

/// Bump whenever the shape of the index's derivable fields changes; any
/// persisted cache tagged with an older version is rebuilt from scratch.
pub const INDEX_SCHEMA_VERSION: u32 = 4;

const INDEX_FILE: &str = "race_date_index.json";
const INDEX_META_FILE: &str = "race_date_index_meta.json";

const fn default_meta_version() -> u32 {
    1
}

/// Metadata envelope persisted alongside the index data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexMeta {
    pub built_at: DateTime<Utc>,
    pub date_count: usize,
    pub race_count: usize,

    /// Caches written before versioning existed lack this field.
    #[serde(default = "default_meta_version")]
    pub version: u32,
}

impl IndexMeta {
    /// Envelope for a freshly built index, tagged with the current schema
    /// version.
    #[must_use]
    pub const fn new(built_at: DateTime<Utc>, date_count: usize, race_count: usize) -> Self {
        Self {
            built_at,
            date_count,
            race_count,
            version: INDEX_SCHEMA_VERSION,
        }
    }
}

/// A persisted index that loaded successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedIndex {
    pub entries: BTreeMap<String, DateIndexEntry>,

    /// Absent when the data artifact exists without its envelope.
    pub meta: Option<IndexMeta>,
}

/// On-disk home of the persisted index.
#[derive(Debug, Clone)]
pub struct IndexStore {
    dir: Utf8PathBuf,
}

impl IndexStore {
    #[must_use]
    pub const fn new(dir: Utf8PathBuf) -> Self {
        Self { dir }
    }

    #[must_use]
    pub fn data_path(&self) -> Utf8PathBuf {
        self.dir.join(INDEX_FILE)
    }

    #[must_use]
    pub fn meta_path(&self) -> Utf8PathBuf {
        self.dir.join(INDEX_META_FILE)
    }

    /// Load the persisted index.
    ///
    /// `None` means "not loaded": the data artifact is missing or unreadable,
    /// or the cache was written under an older schema version. A data
    /// artifact with no metadata envelope at all is accepted as-is.
    #[must_use]
    pub fn load(&self) -> Option<LoadedIndex> {
        let data_path = self.data_path();
        let file = match File::open(&data_path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "no persisted index at '{data_path}': {e:#}");
                return None;
            }
        };

        let reader = BufReader::new(file);
        let entries: BTreeMap<String, DateIndexEntry> = match serde_json::from_reader(reader) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "unreadable persisted index at '{data_path}': {e:#}");
                return None;
            }
        };

        let meta = self.load_meta();
        if let Some(meta) = &meta
            && meta.version < INDEX_SCHEMA_VERSION
        {
            log::warn!(
                target: LOG_TARGET,
                "discarding persisted index built under schema version {} (current is {INDEX_SCHEMA_VERSION})",
                meta.version
            );
            return None;
        }

        log::info!(target: LOG_TARGET, "loaded persisted index covering {} dates", entries.len());
        Some(LoadedIndex { entries, meta })
    }

    fn load_meta(&self) -> Option<IndexMeta> {
        let meta_path = self.meta_path();
        let file = match File::open(&meta_path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "no index metadata at '{meta_path}': {e:#}");
                return None;
            }
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(meta) => Some(meta),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "unreadable index metadata at '{meta_path}': {e:#}");
                None
            }
        }
    }

    /// Write both artifacts, data first, then the metadata envelope.
    pub fn save(&self, entries: &BTreeMap<String, DateIndexEntry>, meta: &IndexMeta) -> Result<()> {
        fs::create_dir_all(&self.dir).into_app_err_with(|| format!("unable to create cache directory '{}'", self.dir))?;
        write_json(&self.data_path(), entries)?;
        write_json(&self.meta_path(), meta)?;

        log::info!(
            target: LOG_TARGET,
            "persisted index: {} dates, {} races, schema version {}",
            meta.date_count,
            meta.race_count,
            meta.version
        );
        Ok(())
    }

    /// Delete both artifacts; files that are already gone are not an error.
    pub fn clear(&self) {
        for path in [self.data_path(), self.meta_path()] {
            if let Err(e) = fs::remove_file(&path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                log::warn!(target: LOG_TARGET, "unable to remove '{path}': {e:#}");
            }
        }
    }
}

fn write_json<T>(path: &Utf8Path, data: &T) -> Result<()>
where
    T: Serialize,
{
    let file = File::create(path).into_app_err_with(|| format!("unable to create cache file '{path}'"))?;
    let mut writer = BufWriter::new(file);

    // Use pretty formatting in debug mode for easier inspection, compact in release for smaller files
    #[cfg(debug_assertions)]
    let result = serde_json::to_writer_pretty(&mut writer, data);
    #[cfg(not(debug_assertions))]
    let result = serde_json::to_writer(&mut writer, data);

    result.into_app_err_with(|| format!("unable to write cache file '{path}'"))?;
    writer.flush().into_app_err_with(|| format!("unable to flush cache file '{path}'"))?;
    Ok(())
}
