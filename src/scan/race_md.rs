//! Fallback parsing of per-race markdown documents.
//!
//! When a day has no usable structured metadata, each race is described only
//! by a loosely-formatted markdown export. Parsing is best effort by design:
//! whatever the document does not yield is left blank, and the race still
//! counts as discovered.

use crate::index::RaceIndexEntry;
use crate::scan::race_info::leading_number;
use regex::Regex;
use std::sync::LazyLock;

static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new("(?m)^# (.+)$").expect("invalid regex"));

/// Title layout: race number, optional parenthesized class token, free-text
/// name, e.g. `11R (G2) 日経新春杯`.
static TITLE_PARTS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+R\s*(?:\(([^)]+)\))?\s*(.+)?").expect("invalid regex"));

static DISTANCE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"競馬場[:\s]*\S+\s+(\S+)").expect("invalid regex"));

static START_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"発走予定\**[:\s]*(\d{1,2}:\d{2})").expect("invalid regex"));

/// Parse one race's markdown document into a best-effort entry.
///
/// The race number comes from the identifier's trailing two characters, the
/// remaining fields from loose patterns over the document text. Never fails.
#[must_use]
pub fn parse_race_md(race_id: &str, content: &str) -> RaceIndexEntry {
    let race_number = race_number_from_id(race_id);

    let mut class_name = String::new();
    let mut race_name = String::new();

    if let Some(title) = TITLE_REGEX.captures(content).and_then(|captures| captures.get(1))
        && let Some(parts) = TITLE_PARTS_REGEX.captures(title.as_str())
    {
        if let Some(class) = parts.get(1) {
            class_name = class.as_str().to_string();
        }
        if let Some(name) = parts.get(2) {
            race_name = name.as_str().trim().to_string();
        }
    }

    if race_name.is_empty() {
        race_name = format!("{race_number}R");
    }

    let distance = capture_text(&DISTANCE_REGEX, content);
    let start_time = capture_text(&START_TIME_REGEX, content);

    RaceIndexEntry {
        id: race_id.to_string(),
        race_number,
        race_name,
        class_name,
        distance,
        start_time,
        kai: None,
        nichi: None,
        pace_type: None,
        winner_first3f: None,
        winner_last3f: None,
        pace_diff: None,
        rpci: None,
    }
}

/// Race number encoded in the identifier's trailing two characters, 0 when
/// they carry no digits.
fn race_number_from_id(race_id: &str) -> u32 {
    let tail_start = race_id.len().saturating_sub(2);
    race_id.get(tail_start..).map_or(0, leading_number)
}

fn capture_text(regex: &Regex, content: &str) -> String {
    regex
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str().to_string())
        .unwrap_or_default()
}
