//! Dataset scanning
//!
//! Everything that reads the raw dataset lives here. The dataset is a
//! `root/<year>/<month>/<day>/` tree; each day directory carries either a
//! structured `race_info.json` covering every meeting that day, or one
//! markdown document per race under per-venue subdirectories, plus optional
//! result records under `temp/` that feed the pace analytics.
//!
//! Every parse boundary in this module returns result-or-absent values:
//! a missing or malformed unit (day, race, result record) produces "no data
//! for this unit" and a debug log line, never an error that could abort the
//! surrounding walk.

mod day;
mod pace;
mod race_info;
mod race_md;
mod tree;

pub use day::scan_day;
pub use pace::extract_pace;
pub use race_info::{MeetingKey, extract_class_name, load_day_card};
pub use race_md::parse_race_md;
pub use tree::{BuiltIndex, build_index};
