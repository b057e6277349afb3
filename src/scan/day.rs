//! Per-day scan combining the structured day card with the markdown
//! fallback.
//!
//! `race_info.json` is authoritative when it parses: its races are the day's
//! races and the per-venue directories are not consulted, even when the file
//! lists none. Only a missing or unreadable file sends the scan into the
//! directory fallback, where each canonical venue directory is searched for
//! `<race_id>.md` cards. Races from either source get pace figures attached
//! when a result record exists.

use crate::index::{DateIndexEntry, PaceBands, RaceDay, RaceIndexEntry, TrackIndexEntry, Venue};
use crate::scan::pace::extract_pace;
use crate::scan::race_info::load_day_card;
use crate::scan::race_md::parse_race_md;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, HashSet};
use std::fs;

const LOG_TARGET: &str = "      day";

/// Assemble the index entry for one day directory, `None` when the day has
/// no races at all.
#[must_use]
pub fn scan_day(day_dir: &Utf8Path, day: RaceDay, bands: PaceBands) -> Option<DateIndexEntry> {
    let venues = load_day_card(day_dir).unwrap_or_else(|| scan_venue_dirs(day_dir));

    let mut tracks = Vec::new();
    for (venue, mut races) in venues {
        finalize(&mut races);
        if races.is_empty() {
            continue;
        }

        for race in &mut races {
            if let Some(figures) = extract_pace(day_dir, &race.id, bands) {
                race.set_pace(figures);
            }
        }

        tracks.push(TrackIndexEntry { track: venue, races });
    }

    if tracks.is_empty() {
        log::debug!(target: LOG_TARGET, "no races under '{day_dir}'");
        return None;
    }

    Some(DateIndexEntry {
        date: day.key(),
        display_date: day.display(),
        tracks,
    })
}

/// Drop duplicate identifiers, order by race number, then drop duplicate
/// race numbers. First occurrence wins in both passes.
fn finalize(races: &mut Vec<RaceIndexEntry>) {
    let mut seen = HashSet::new();
    races.retain(|race| seen.insert(race.id.clone()));
    races.sort_by_key(|race| race.race_number);
    races.dedup_by_key(|race| race.race_number);
}

/// Fallback discovery: every directory named after a canonical venue is
/// searched for markdown race cards.
fn scan_venue_dirs(day_dir: &Utf8Path) -> BTreeMap<Venue, Vec<RaceIndexEntry>> {
    let mut venues = BTreeMap::new();
    let Ok(read_dir) = fs::read_dir(day_dir) else {
        return venues;
    };

    for entry in read_dir.flatten() {
        if !entry.file_type().is_ok_and(|kind| kind.is_dir()) {
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(venue) = Venue::from_name(name) else {
            continue;
        };

        let _ = venues.insert(venue, scan_md_files(&day_dir.join(name)));
    }

    venues
}

fn scan_md_files(venue_dir: &Utf8Path) -> Vec<RaceIndexEntry> {
    let Ok(read_dir) = fs::read_dir(venue_dir) else {
        return Vec::new();
    };

    // read_dir order is platform-dependent; sort for a deterministic
    // dedup tie-break.
    let mut paths: Vec<Utf8PathBuf> = read_dir
        .flatten()
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
        .filter(|path| path.extension() == Some("md"))
        .collect();
    paths.sort_unstable();

    let mut races = Vec::new();
    for path in paths {
        let Some(race_id) = path.file_stem() else {
            continue;
        };

        match fs::read_to_string(&path) {
            Ok(content) => races.push(parse_race_md(race_id, &content)),
            Err(e) => log::debug!(target: LOG_TARGET, "unreadable race card '{path}': {e:#}"),
        }
    }

    races
}
