//! Structured per-day metadata parsing.
//!
//! A day's `race_info.json` maps meeting keys of the form
//! `<kai>回<venue><nichi>日` to lists of race stubs. This is the preferred
//! source for a day: when it parses, it alone decides which races exist that
//! day and what their descriptive fields are.

use crate::index::{RaceIndexEntry, Venue};
use camino::Utf8Path;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::LazyLock;

const LOG_TARGET: &str = "race_info";

const RACE_INFO_FILE: &str = "race_info.json";

static MEETING_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)回([^\d]+)(\d+)日").expect("invalid regex"));

/// Class patterns in priority order; the first one found anywhere in the
/// race name wins.
static CLASS_PATTERNS: LazyLock<[Regex; 7]> = LazyLock::new(|| {
    ["G[123]", "オープン", "3勝クラス", "2勝クラス", "1勝クラス", "未勝利", "新馬"]
        .map(|pattern| Regex::new(pattern).expect("invalid regex"))
});

/// A parsed `<kai>回<venue><nichi>日` meeting key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingKey {
    pub kai: u32,
    pub venue: Venue,
    pub nichi: u32,
}

impl MeetingKey {
    /// Parse a meeting key, `None` when it does not match the pattern or
    /// names a venue outside the canonical set.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let captures = MEETING_KEY_REGEX.captures(key)?;
        Some(Self {
            kai: captures.get(1)?.as_str().parse().ok()?,
            venue: Venue::from_name(captures.get(2)?.as_str())?,
            nichi: captures.get(3)?.as_str().parse().ok()?,
        })
    }
}

#[derive(Deserialize, Debug)]
struct RaceInfoFile {
    #[serde(default)]
    kaisai_data: BTreeMap<String, Vec<RaceStub>>,
}

#[derive(Deserialize, Debug)]
struct RaceStub {
    #[serde(default)]
    race_id: Option<String>,
    #[serde(default)]
    race_no: Option<String>,
    #[serde(default)]
    race_name: Option<String>,
    #[serde(default)]
    course: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
}

impl RaceStub {
    /// Turn a stub into an index entry, `None` when it lacks a race
    /// identifier.
    fn into_entry(self, meeting: MeetingKey) -> Option<RaceIndexEntry> {
        let id = self.race_id.filter(|id| !id.is_empty())?;
        let race_number = leading_number(self.race_no.as_deref().unwrap_or_default());
        let raw_name = self.race_name.unwrap_or_default();
        let class_name = extract_class_name(&raw_name);
        let race_name = if raw_name.is_empty() { format!("{race_number}R") } else { raw_name };

        Some(RaceIndexEntry {
            id,
            race_number,
            race_name,
            class_name,
            distance: self.course.unwrap_or_default(),
            start_time: self.start_time.unwrap_or_default(),
            kai: Some(meeting.kai),
            nichi: Some(meeting.nichi),
            pace_type: None,
            winner_first3f: None,
            winner_last3f: None,
            pace_diff: None,
            rpci: None,
        })
    }
}

/// Parse a day's `race_info.json` into races grouped by venue.
///
/// `None` means the file is missing or unreadable, in which case the caller
/// falls back to the per-venue directory scan. `Some` carries every race
/// found under a valid meeting key; meeting keys that do not match the
/// pattern, venues outside the canonical set, and stubs without a race
/// identifier are skipped without failing the day.
#[must_use]
pub fn load_day_card(day_dir: &Utf8Path) -> Option<BTreeMap<Venue, Vec<RaceIndexEntry>>> {
    let path = day_dir.join(RACE_INFO_FILE);
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "no day metadata at '{path}': {e:#}");
            return None;
        }
    };

    let reader = BufReader::new(file);
    let parsed: RaceInfoFile = match serde_json::from_reader(reader) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "unreadable day metadata at '{path}': {e:#}");
            return None;
        }
    };

    let mut races: BTreeMap<Venue, Vec<RaceIndexEntry>> = BTreeMap::new();
    for (key, stubs) in parsed.kaisai_data {
        let Some(meeting) = MeetingKey::parse(&key) else {
            log::debug!(target: LOG_TARGET, "skipping unrecognized meeting key '{key}' in '{path}'");
            continue;
        };

        for stub in stubs {
            if let Some(entry) = stub.into_entry(meeting) {
                races.entry(meeting.venue).or_default().push(entry);
            }
        }
    }

    Some(races)
}

/// Derive the class label from a race name: first matching pattern wins,
/// empty string when none match.
#[must_use]
pub fn extract_class_name(race_name: &str) -> String {
    CLASS_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(race_name))
        .map(|found| found.as_str().to_string())
        .unwrap_or_default()
}

/// Integer value of the leading ASCII digits, 0 when there are none or they
/// overflow. Race numbers arrive as text such as `"11R"`.
#[must_use]
pub(crate) fn leading_number(text: &str) -> u32 {
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
