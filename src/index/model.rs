//! Index data model.
//!
//! These types define both the in-memory index and its persisted JSON shape.
//! Field names serialize in the `camelCase` form the surrounding system has
//! always consumed, so artifacts written here remain interchangeable with
//! older builds.

use crate::index::Venue;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Race shape classification derived from RPCI.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaceType {
    /// Slow early, fast late (RPCI at or above the sprint threshold).
    Sprint,
    /// Neither threshold reached.
    Average,
    /// Fast early, slow late (RPCI at or below the stamina threshold).
    Stamina,
}

const fn default_sprint_min() -> f64 {
    51.0
}

const fn default_stamina_max() -> f64 {
    48.0
}

/// RPCI thresholds for pace classification.
///
/// This threshold pair is a contract shared with every other component that
/// classifies pace from RPCI; override it through configuration, never at a
/// call site.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PaceBands {
    /// RPCI at or above this value classifies as `sprint`.
    #[serde(default = "default_sprint_min")]
    pub sprint_min_rpci: f64,

    /// RPCI at or below this value classifies as `stamina`.
    #[serde(default = "default_stamina_max")]
    pub stamina_max_rpci: f64,
}

impl Default for PaceBands {
    fn default() -> Self {
        Self {
            sprint_min_rpci: default_sprint_min(),
            stamina_max_rpci: default_stamina_max(),
        }
    }
}

impl PaceBands {
    /// Classify an RPCI value into a pace type.
    #[must_use]
    pub const fn classify(&self, rpci: f64) -> PaceType {
        if rpci >= self.sprint_min_rpci {
            PaceType::Sprint
        } else if rpci <= self.stamina_max_rpci {
            PaceType::Stamina
        } else {
            PaceType::Average
        }
    }
}

/// Derived pace figures for a race, taken from its winner's split times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaceFigures {
    pub pace_type: PaceType,
    pub winner_first3f: f64,
    pub winner_last3f: f64,
    pub pace_diff: f64,
    pub rpci: f64,
}

/// One race within a day's index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RaceIndexEntry {
    /// Unique race identifier; the join key consumers rely on.
    pub id: String,

    /// Race number within the venue's card, ascending sort key.
    pub race_number: u32,

    pub race_name: String,

    /// Derived class label such as `G1` or `未勝利`; empty when none matched.
    pub class_name: String,

    /// Course descriptor; blank when unknown.
    pub distance: String,

    /// Post time as `HH:MM` text; blank when unknown.
    pub start_time: String,

    /// Meeting counter; only the structured source carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kai: Option<u32>,

    /// Day-within-meeting counter; only the structured source carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nichi: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_type: Option<PaceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_first3f: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_last3f: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_diff: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpci: Option<f64>,
}

impl RaceIndexEntry {
    /// Attach derived pace figures to this race.
    pub const fn set_pace(&mut self, figures: PaceFigures) {
        self.pace_type = Some(figures.pace_type);
        self.winner_first3f = Some(figures.winner_first3f);
        self.winner_last3f = Some(figures.winner_last3f);
        self.pace_diff = Some(figures.pace_diff);
        self.rpci = Some(figures.rpci);
    }
}

/// One venue active on a given date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackIndexEntry {
    pub track: Venue,

    /// Strictly ascending by race number.
    pub races: Vec<RaceIndexEntry>,
}

/// One calendar date with at least one discoverable race.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateIndexEntry {
    /// Canonical `YYYY-MM-DD` key.
    pub date: String,

    /// Locale label such as `2025年1月5日`; derived, not authoritative.
    pub display_date: String,

    /// Ordered by the canonical venue enumeration.
    pub tracks: Vec<TrackIndexEntry>,
}

/// One calendar day of the dataset, identified by its `year/month/day`
/// directory components. Purely positional; no calendar validation is
/// applied beyond the digit patterns the tree walker enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceDay {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl RaceDay {
    /// Build from directory name components, `None` when any is non-numeric.
    #[must_use]
    pub fn from_components(year: &str, month: &str, day: &str) -> Option<Self> {
        Some(Self {
            year: year.parse().ok()?,
            month: month.parse().ok()?,
            day: day.parse().ok()?,
        })
    }

    /// The canonical zero-padded `YYYY-MM-DD` index key.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// The display label, month and day without leading zeros.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}年{}月{}日", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_entry() -> RaceIndexEntry {
        RaceIndexEntry {
            id: "202501050611".to_string(),
            race_number: 11,
            race_name: "日経新春杯".to_string(),
            class_name: "G2".to_string(),
            distance: "芝2200m".to_string(),
            start_time: "15:35".to_string(),
            kai: Some(1),
            nichi: Some(5),
            pace_type: None,
            winner_first3f: None,
            winner_last3f: None,
            pace_diff: None,
            rpci: None,
        }
    }

    #[test]
    fn test_classify_default_bands() {
        let bands = PaceBands::default();
        assert_eq!(bands.classify(53.0), PaceType::Sprint);
        assert_eq!(bands.classify(51.0), PaceType::Sprint);
        assert_eq!(bands.classify(50.9), PaceType::Average);
        assert_eq!(bands.classify(49.6), PaceType::Average);
        assert_eq!(bands.classify(48.1), PaceType::Average);
        assert_eq!(bands.classify(48.0), PaceType::Stamina);
        assert_eq!(bands.classify(47.1), PaceType::Stamina);
    }

    #[test]
    fn test_classify_custom_bands() {
        let bands = PaceBands {
            sprint_min_rpci: 55.0,
            stamina_max_rpci: 45.0,
        };
        assert_eq!(bands.classify(53.0), PaceType::Average);
        assert_eq!(bands.classify(55.0), PaceType::Sprint);
        assert_eq!(bands.classify(44.9), PaceType::Stamina);
    }

    #[test]
    fn test_pace_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PaceType::Sprint).unwrap(), r#""sprint""#);
        assert_eq!(PaceType::Stamina.to_string(), "stamina");
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let value = serde_json::to_value(bare_entry()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["raceNumber"], 11);
        assert_eq!(obj["raceName"], "日経新春杯");
        assert_eq!(obj["className"], "G2");
        assert_eq!(obj["startTime"], "15:35");
        assert_eq!(obj["kai"], 1);
        assert_eq!(obj["nichi"], 5);
    }

    #[test]
    fn test_absent_options_are_omitted() {
        let mut entry = bare_entry();
        entry.kai = None;
        entry.nichi = None;
        let value = serde_json::to_value(entry).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("kai"));
        assert!(!obj.contains_key("nichi"));
        assert!(!obj.contains_key("paceType"));
        assert!(!obj.contains_key("winnerFirst3f"));
        assert!(!obj.contains_key("rpci"));
    }

    #[test]
    fn test_set_pace_fills_all_fields() {
        let mut entry = bare_entry();
        entry.set_pace(PaceFigures {
            pace_type: PaceType::Sprint,
            winner_first3f: 35.0,
            winner_last3f: 33.0,
            pace_diff: 2.0,
            rpci: 53.0,
        });
        let value = serde_json::to_value(entry).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["paceType"], "sprint");
        assert_eq!(obj["winnerFirst3f"], 35.0);
        assert_eq!(obj["winnerLast3f"], 33.0);
        assert_eq!(obj["paceDiff"], 2.0);
        assert_eq!(obj["rpci"], 53.0);
    }

    #[test]
    fn test_entry_deserializes_without_optionals() {
        let json = r#"{
            "id": "202501050101",
            "raceNumber": 1,
            "raceName": "3歳未勝利",
            "className": "未勝利",
            "distance": "ダ1200m",
            "startTime": "10:05"
        }"#;
        let entry: RaceIndexEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.race_number, 1);
        assert_eq!(entry.kai, None);
        assert_eq!(entry.pace_type, None);
    }

    #[test]
    fn test_race_day_key_and_display() {
        let day = RaceDay::from_components("2025", "01", "05").unwrap();
        assert_eq!(day.key(), "2025-01-05");
        assert_eq!(day.display(), "2025年1月5日");

        let day = RaceDay::from_components("2024", "12", "28").unwrap();
        assert_eq!(day.key(), "2024-12-28");
        assert_eq!(day.display(), "2024年12月28日");
    }

    #[test]
    fn test_race_day_rejects_non_numeric() {
        assert_eq!(RaceDay::from_components("2025", "ab", "05"), None);
        assert_eq!(RaceDay::from_components("", "01", "05"), None);
    }

    #[test]
    fn test_date_entry_roundtrip() {
        let entry = DateIndexEntry {
            date: "2025-01-05".to_string(),
            display_date: "2025年1月5日".to_string(),
            tracks: vec![TrackIndexEntry {
                track: Venue::Nakayama,
                races: vec![bare_entry()],
            }],
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""displayDate":"2025年1月5日""#));
        assert!(json.contains(r#""track":"中山""#));

        let back: DateIndexEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
