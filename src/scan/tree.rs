//! Dataset tree traversal.
//!
//! Race data lives under `<root>/<year>/<month>/<day>/`, with four-digit
//! years and zero-padded two-digit months and days. Anything else at those
//! depths is operator clutter (backups, notes) and is pruned without
//! descending.

use crate::index::{DateIndexEntry, PaceBands, RaceDay};
use crate::scan::day::scan_day;
use camino::Utf8Path;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::{DirEntry, WalkDir};

const LOG_TARGET: &str = "     tree";

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").expect("invalid regex"));
static MONTH_DAY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}$").expect("invalid regex"));

/// Every indexed date keyed by `YYYY-MM-DD`, plus the total race count
/// across all of them.
#[derive(Debug, Default, PartialEq)]
pub struct BuiltIndex {
    pub entries: BTreeMap<String, DateIndexEntry>,
    pub race_count: usize,
}

/// Walk the dataset root and index every day that yields at least one race.
///
/// A missing root is an empty dataset, not an error.
#[must_use]
pub fn build_index(root: &Utf8Path, bands: PaceBands) -> BuiltIndex {
    if !root.is_dir() {
        log::info!(target: LOG_TARGET, "dataset root '{root}' does not exist, producing an empty index");
        return BuiltIndex::default();
    }

    log::info!(target: LOG_TARGET, "scanning dataset root '{root}'");

    let mut built = BuiltIndex::default();
    let walker = WalkDir::new(root)
        .follow_links(false) // Don't follow symlinks to prevent loops
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(keep_entry) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "walk error under '{root}': {e:#}");
                continue;
            }
        };

        let Some(day) = race_day_from_path(entry.path()) else {
            continue;
        };
        let Some(day_dir) = Utf8Path::from_path(entry.path()) else {
            continue;
        };
        let Some(date_entry) = scan_day(day_dir, day, bands) else {
            continue;
        };

        built.race_count += date_entry.tracks.iter().map(|track| track.races.len()).sum::<usize>();
        let _ = built.entries.insert(date_entry.date.clone(), date_entry);
    }

    built
}

/// Prune anything that does not look like a `year/month/day` directory
/// component. The root itself always passes.
fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if !entry.file_type().is_dir() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };

    if entry.depth() == 1 { YEAR_REGEX.is_match(name) } else { MONTH_DAY_REGEX.is_match(name) }
}

fn race_day_from_path(path: &Path) -> Option<RaceDay> {
    let day = path.file_name()?.to_str()?;
    let month_dir = path.parent()?;
    let month = month_dir.file_name()?.to_str()?;
    let year = month_dir.parent()?.file_name()?.to_str()?;
    RaceDay::from_components(year, month, day)
}
