//! Shared race index with lazy loading and single-flight rebuilds.
//!
//! [`RaceDayIndex`] is the query surface over the persisted index. Queries
//! never scan the dataset: they serve whatever is in memory, pulling the
//! persisted files in on first use. Only [`rebuild`](RaceDayIndex::rebuild)
//! walks the dataset, and at most one rebuild runs at a time; a rebuild
//! requested while another is underway reports back without doing anything.

use crate::index::model::{DateIndexEntry, PaceBands};
use crate::index::store::{IndexMeta, IndexStore};
use crate::scan::build_index;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

const LOG_TARGET: &str = "  service";

/// What a rebuild request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildReport {
    /// Another rebuild held the guard; nothing happened.
    SkippedInProgress,

    /// A cold service found a usable persisted index and loaded it instead
    /// of scanning.
    Reloaded { dates: usize, races: usize },

    /// A dataset scan produced and persisted a fresh index.
    Built { dates: usize, races: usize },
}

/// Point-in-time snapshot of the service for operator display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStatus {
    pub ready: bool,
    pub date_count: usize,
    pub race_count: usize,
    pub built_at: Option<DateTime<Utc>>,
    pub schema_version: Option<u32>,
    pub builds_performed: u64,
}

#[derive(Debug, Default)]
struct IndexState {
    entries: BTreeMap<String, DateIndexEntry>,

    /// Date keys most recent first, precomputed so queries return without
    /// walking the map.
    dates: Vec<String>,
    meta: Option<IndexMeta>,
    loaded: bool,
}

impl IndexState {
    fn install(&mut self, entries: BTreeMap<String, DateIndexEntry>, meta: Option<IndexMeta>) {
        self.dates = entries.keys().rev().cloned().collect();
        self.entries = entries;
        self.meta = meta;
        self.loaded = true;
    }

    /// Loaded and holding at least one date; an empty index answers queries
    /// but never reports ready.
    fn ready(&self) -> bool {
        self.loaded && !self.entries.is_empty()
    }

    fn race_count(&self) -> usize {
        self.meta.as_ref().map_or_else(|| count_races(&self.entries), |meta| meta.race_count)
    }
}

/// Thread-safe index service over one dataset root and one cache directory.
#[derive(Debug)]
pub struct RaceDayIndex {
    data_root: Utf8PathBuf,
    store: IndexStore,
    bands: PaceBands,
    now: fn() -> DateTime<Utc>,
    state: RwLock<IndexState>,
    build_in_progress: AtomicBool,
    builds_performed: AtomicU64,
}

impl RaceDayIndex {
    #[must_use]
    pub fn new(data_root: Utf8PathBuf, cache_dir: Utf8PathBuf, bands: PaceBands) -> Self {
        Self::with_clock(data_root, cache_dir, bands, Utc::now)
    }

    /// Like [`new`](Self::new), with an injectable clock for the metadata
    /// timestamp.
    #[must_use]
    pub fn with_clock(
        data_root: Utf8PathBuf,
        cache_dir: Utf8PathBuf,
        bands: PaceBands,
        now: fn() -> DateTime<Utc>,
    ) -> Self {
        Self {
            data_root,
            store: IndexStore::new(cache_dir),
            bands,
            now,
            state: RwLock::new(IndexState::default()),
            build_in_progress: AtomicBool::new(false),
            builds_performed: AtomicU64::new(0),
        }
    }

    /// All indexed date keys, most recent first.
    #[must_use]
    pub fn available_dates(&self) -> Vec<String> {
        self.ensure_loaded();
        self.read_state().dates.clone()
    }

    /// The full per-venue listing for one `YYYY-MM-DD` date key.
    #[must_use]
    pub fn races_for_date(&self, date: &str) -> Option<DateIndexEntry> {
        self.ensure_loaded();
        self.read_state().entries.get(date).cloned()
    }

    /// Whether a non-empty index is resident in memory.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ensure_loaded();
        self.read_state().ready()
    }

    #[must_use]
    pub fn status(&self) -> IndexStatus {
        self.ensure_loaded();
        let state = self.read_state();

        IndexStatus {
            ready: state.ready(),
            date_count: state.entries.len(),
            race_count: state.race_count(),
            built_at: state.meta.as_ref().map(|meta| meta.built_at),
            schema_version: state.meta.as_ref().map(|meta| meta.version),
            builds_performed: self.builds_performed.load(Ordering::Relaxed),
        }
    }

    /// Drop the in-memory index and delete the persisted artifacts. The next
    /// query starts cold.
    pub fn invalidate(&self) {
        let mut state = self.write_state();
        *state = IndexState::default();
        drop(state);

        self.store.clear();
        log::info!(target: LOG_TARGET, "index invalidated");
    }

    /// Bring the index up to date.
    ///
    /// A cold service first tries the persisted index and reports
    /// [`BuildReport::Reloaded`] when it suffices. Otherwise the dataset is
    /// scanned, persisted, and swapped in atomically. Concurrent callers do
    /// not stack: whoever loses the guard race gets
    /// [`BuildReport::SkippedInProgress`] while the winner's build proceeds.
    ///
    /// A failure to persist is logged and tolerated; the freshly built index
    /// still serves from memory.
    #[must_use]
    pub fn rebuild(&self) -> BuildReport {
        let Some(_guard) = BuildGuard::acquire(&self.build_in_progress) else {
            log::info!(target: LOG_TARGET, "a build is already in progress, skipping");
            return BuildReport::SkippedInProgress;
        };

        let cold = !self.read_state().loaded;
        if cold && let Some(loaded) = self.store.load() {
            let dates = loaded.entries.len();
            let races = loaded.meta.as_ref().map_or_else(|| count_races(&loaded.entries), |meta| meta.race_count);
            self.write_state().install(loaded.entries, loaded.meta);
            log::info!(target: LOG_TARGET, "reusing persisted index with {dates} dates");
            return BuildReport::Reloaded { dates, races };
        }

        let started = Instant::now();
        let built = build_index(&self.data_root, self.bands);
        let dates = built.entries.len();
        let races = built.race_count;

        let meta = IndexMeta::new((self.now)(), dates, races);
        if let Err(e) = self.store.save(&built.entries, &meta) {
            log::warn!(target: LOG_TARGET, "index built but not persisted: {e:#}");
        }

        self.write_state().install(built.entries, Some(meta));
        let _ = self.builds_performed.fetch_add(1, Ordering::Relaxed);
        log::info!(
            target: LOG_TARGET,
            "indexed {dates} dates with {races} races in {:.2?}",
            started.elapsed()
        );

        BuildReport::Built { dates, races }
    }

    /// Load the persisted index on first use. Called from every query, so a
    /// cache that appears later is still picked up.
    fn ensure_loaded(&self) {
        if self.read_state().loaded {
            return;
        }

        let mut state = self.write_state();
        if state.loaded {
            return;
        }
        if let Some(loaded) = self.store.load() {
            state.install(loaded.entries, loaded.meta);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, IndexState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn count_races(entries: &BTreeMap<String, DateIndexEntry>) -> usize {
    entries.values().flat_map(|entry| &entry.tracks).map(|track| track.races.len()).sum()
}

/// Holds the single-flight rebuild flag, releasing it on drop so a panicking
/// build cannot wedge the service.
struct BuildGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BuildGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
