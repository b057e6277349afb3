//! Pace analytics extraction from result records.
//!
//! A day's `temp/` directory may hold one result record per race, written by
//! an upstream integrator under two possible names. From the winner's
//! first-half and closing 3-furlong splits we derive the pace difference,
//! RPCI, and a pace classification. The record shape varies across producer
//! versions, so the split times are looked up through an ordered list of
//! candidate fields.

use crate::index::{PaceBands, PaceFigures};
use camino::Utf8Path;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;

const LOG_TARGET: &str = "     pace";

const RESULT_DIR: &str = "temp";

/// Candidate file name prefixes, probed in order; the first existing file
/// wins even when it later fails to parse.
const RESULT_FILE_PREFIXES: [&str; 2] = ["integrated_", "seiseki_"];

/// Raw-data fallbacks for the first-half split, tried after `first_3f`.
const FIRST3F_RAW_FIELDS: [&str; 1] = ["前半3F"];

/// Raw-data fallbacks for the closing split, tried after `last_3f`.
const LAST3F_RAW_FIELDS: [&str; 2] = ["上り3F", "上がり"];

const FINISH_RAW_FIELD: &str = "着順";

#[derive(Deserialize, Debug)]
struct ResultRecord {
    #[serde(default)]
    entries: Vec<EntryRecord>,
}

#[derive(Deserialize, Debug)]
struct EntryRecord {
    #[serde(default)]
    result: Option<HorseResult>,
}

#[derive(Deserialize, Debug, Default)]
struct HorseResult {
    #[serde(default)]
    finish_position: Option<Value>,
    #[serde(default)]
    first_3f: Option<Value>,
    #[serde(default)]
    last_3f: Option<Value>,
    #[serde(default)]
    raw_data: Map<String, Value>,
}

/// Locate a race's result record and derive pace figures from its winner.
///
/// Any missing file, malformed record, absent winner, or non-numeric split
/// yields `None`; a race without pace figures is a normal outcome, never an
/// error.
#[must_use]
pub fn extract_pace(day_dir: &Utf8Path, race_id: &str, bands: PaceBands) -> Option<PaceFigures> {
    let record = load_result_record(day_dir, race_id)?;
    let winner = record
        .entries
        .iter()
        .filter_map(|entry| entry.result.as_ref())
        .find(|result| is_winner(result))?;

    let first3f = numeric_candidate(winner.first_3f.as_ref(), &winner.raw_data, &FIRST3F_RAW_FIELDS)?;
    let last3f = numeric_candidate(winner.last_3f.as_ref(), &winner.raw_data, &LAST3F_RAW_FIELDS)?;

    let rpci = first3f / last3f * 50.0;
    if !rpci.is_finite() {
        return None;
    }
    let rpci = round1(rpci);

    Some(PaceFigures {
        pace_type: bands.classify(rpci),
        winner_first3f: first3f,
        winner_last3f: last3f,
        pace_diff: round1(first3f - last3f),
        rpci,
    })
}

fn load_result_record(day_dir: &Utf8Path, race_id: &str) -> Option<ResultRecord> {
    for prefix in RESULT_FILE_PREFIXES {
        let path = day_dir.join(RESULT_DIR).join(format!("{prefix}{race_id}.json"));
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(_) => continue,
        };

        let reader = BufReader::new(file);
        return match serde_json::from_reader(reader) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "unreadable result record '{path}': {e:#}");
                None
            }
        };
    }

    None
}

/// The winning entry has finish position 1, as a number or as text; the
/// first one found in record order wins.
fn is_winner(result: &HorseResult) -> bool {
    result
        .finish_position
        .as_ref()
        .or_else(|| result.raw_data.get(FINISH_RAW_FIELD))
        .is_some_and(value_is_one)
}

fn value_is_one(value: &Value) -> bool {
    match value {
        Value::String(text) => text == "1",
        Value::Number(number) => number.as_i64() == Some(1),
        _ => false,
    }
}

/// Try the primary field, then the raw-data fallbacks, until one parses as a
/// finite number.
fn numeric_candidate(primary: Option<&Value>, raw_data: &Map<String, Value>, raw_fields: &[&str]) -> Option<f64> {
    primary
        .into_iter()
        .chain(raw_fields.iter().filter_map(|field| raw_data.get(*field)))
        .find_map(value_as_f64)
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|parsed| parsed.is_finite()),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|parsed| parsed.is_finite()),
        _ => None,
    }
}

const fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PaceType;
    use camino::Utf8PathBuf;
    use std::fs;

    fn day_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
        let day_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(day_dir.join(RESULT_DIR)).unwrap();
        day_dir
    }

    fn write_record(day_dir: &Utf8Path, file_name: &str, contents: &str) {
        fs::write(day_dir.join(RESULT_DIR).join(file_name), contents).unwrap();
    }

    fn integrated(first3f: &str, last3f: &str) -> String {
        format!(
            r#"{{
                "entries": [
                    {{"result": {{"finish_position": "3", "first_3f": "99.9", "last_3f": "99.9"}}}},
                    {{"result": {{"finish_position": "1", "first_3f": "{first3f}", "last_3f": "{last3f}"}}}}
                ]
            }}"#
        )
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_rpci_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);
        let bands = PaceBands::default();

        write_record(&day, "integrated_a.json", &integrated("35.0", "33.0"));
        let figures = extract_pace(&day, "a", bands).unwrap();
        assert_eq!(figures.rpci, 53.0);
        assert_eq!(figures.pace_type, PaceType::Sprint);
        assert_eq!(figures.pace_diff, 2.0);

        write_record(&day, "integrated_b.json", &integrated("33.0", "35.0"));
        let figures = extract_pace(&day, "b", bands).unwrap();
        assert_eq!(figures.rpci, 47.1);
        assert_eq!(figures.pace_type, PaceType::Stamina);
        assert_eq!(figures.pace_diff, -2.0);

        write_record(&day, "integrated_c.json", &integrated("34.0", "34.3"));
        let figures = extract_pace(&day, "c", bands).unwrap();
        assert_eq!(figures.rpci, 49.6);
        assert_eq!(figures.pace_type, PaceType::Average);
        assert_eq!(figures.winner_first3f, 34.0);
        assert_eq!(figures.winner_last3f, 34.3);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_prefers_integrated_over_seiseki() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);

        write_record(&day, "integrated_x.json", &integrated("35.0", "33.0"));
        write_record(&day, "seiseki_x.json", &integrated("33.0", "35.0"));

        let figures = extract_pace(&day, "x", PaceBands::default()).unwrap();
        assert_eq!(figures.pace_type, PaceType::Sprint);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_falls_back_to_seiseki() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);
        write_record(&day, "seiseki_x.json", &integrated("33.0", "35.0"));

        let figures = extract_pace(&day, "x", PaceBands::default()).unwrap();
        assert_eq!(figures.pace_type, PaceType::Stamina);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_numeric_finish_position_and_raw_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);
        write_record(
            &day,
            "integrated_x.json",
            r#"{
                "entries": [
                    {"result": {"finish_position": 1, "first_3f": "", "raw_data": {"前半3F": "35.0", "上り3F": "33.0"}}}
                ]
            }"#,
        );

        let figures = extract_pace(&day, "x", PaceBands::default()).unwrap();
        assert_eq!(figures.winner_first3f, 35.0);
        assert_eq!(figures.winner_last3f, 33.0);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_winner_via_raw_finish_field_and_agari_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);
        write_record(
            &day,
            "seiseki_x.json",
            r#"{
                "entries": [
                    {"result": {"raw_data": {"着順": "2", "前半3F": "34.0", "上がり": "34.0"}}},
                    {"result": {"raw_data": {"着順": "1", "前半3F": "34.0", "上がり": "34.3"}}}
                ]
            }"#,
        );

        let figures = extract_pace(&day, "x", PaceBands::default()).unwrap();
        assert_eq!(figures.rpci, 49.6);
        assert_eq!(figures.winner_last3f, 34.3);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_no_winner_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);
        write_record(
            &day,
            "integrated_x.json",
            r#"{"entries": [{"result": {"finish_position": "2", "first_3f": "35.0", "last_3f": "33.0"}}]}"#,
        );

        assert_eq!(extract_pace(&day, "x", PaceBands::default()), None);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_non_numeric_splits_yield_none() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);
        write_record(
            &day,
            "integrated_x.json",
            r#"{"entries": [{"result": {"finish_position": "1", "first_3f": "---", "last_3f": "33.0"}}]}"#,
        );

        assert_eq!(extract_pace(&day, "x", PaceBands::default()), None);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_zero_closing_split_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);
        write_record(&day, "integrated_x.json", &integrated("35.0", "0"));

        assert_eq!(extract_pace(&day, "x", PaceBands::default()), None);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_missing_and_malformed_records_yield_none() {
        let dir = tempfile::tempdir().unwrap();
        let day = day_dir(&dir);
        assert_eq!(extract_pace(&day, "nothing", PaceBands::default()), None);

        write_record(&day, "integrated_bad.json", "not json");
        assert_eq!(extract_pace(&day, "bad", PaceBands::default()), None);
    }

    #[test]
    fn test_round1_behavior() {
        assert_eq!(round1(53.0303), 53.0);
        assert_eq!(round1(47.142_857), 47.1);
        assert_eq!(round1(49.562_682), 49.6);
        assert_eq!(round1(-2.0), -2.0);
        assert_eq!(round1(0.25), 0.3);
    }
}
