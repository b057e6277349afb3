//! A tool to index date-partitioned horse racing datasets and answer race
//! card queries from a persisted cache.
//!
//! # Overview
//!
//! `raceday` walks a keibabook-style dataset laid out as
//! `<root>/<year>/<month>/<day>/`, builds an index of every race day it
//! finds, and persists that index next to the dataset. Queries (which dates
//! exist, what ran on a given date) are answered from the persisted index
//! without touching the dataset again, so they stay fast even when the
//! dataset spans years.
//!
//! # Dataset Layout
//!
//! Each day directory can describe its races in two ways:
//!
//! - **Structured**: a `race_info.json` file with a `kaisai_data` object
//!   whose keys name the meeting (for example `1回中山5日`) and whose values
//!   list the races of that meeting. When this file parses it is
//!   authoritative for the day.
//! - **Markdown fallback**: one directory per venue (`東京`, `中山`, ...)
//!   holding a `<race_id>.md` card per race. Used only when
//!   `race_info.json` is missing or unreadable.
//!
//! Either way, a day's `temp/` directory may hold per-race result records
//! (`integrated_<race_id>.json` or `seiseki_<race_id>.json`). When the
//! winner's 3-furlong splits are present, the index also carries derived
//! pace figures for the race.
//!
//! # Quick Start
//!
//! Build the index, then query it:
//!
//! ```bash
//! raceday build --data-root /srv/keibabook/data
//! raceday dates --data-root /srv/keibabook/data --limit 5
//! raceday races 2025-01-05 --data-root /srv/keibabook/data
//! ```
//!
//! Set the dataset root once via the environment to drop the flag:
//!
//! ```bash
//! export RACEDAY_DATA_ROOT=/srv/keibabook/data
//! raceday build
//! raceday races 2025-01-05
//! ```
//!
//! # Commands
//!
//! **Build or refresh the index:**
//! ```bash
//! raceday build            # scan, persist, and swap in a fresh index
//! raceday build --force    # discard the persisted index first
//! ```
//!
//! A cold `build` that finds a usable persisted index reuses it instead of
//! scanning. Only one build runs at a time; a second invocation while one is
//! underway reports that and exits without doing anything.
//!
//! **List indexed dates, most recent first:**
//! ```bash
//! raceday dates
//! raceday dates --limit 10
//! ```
//!
//! **Show the race card for one date:**
//! ```bash
//! raceday races 2025-01-05
//! # 2025年1月5日 (2025-01-05)
//! #
//! # 中山
//! #    1R 3歳新馬 ダ1200m 10:05
//! #   11R 日経新春杯 [G2] 芝2200m 15:35  rpci 53 (sprint)
//! ```
//!
//! **Inspect index freshness:**
//! ```bash
//! raceday status
//! ```
//!
//! **Delete the persisted index:**
//! ```bash
//! raceday clear
//! ```
//!
//! # Pace Figures
//!
//! For each race with a result record, the winner's first-half and closing
//! 3-furlong times produce:
//!
//! - `paceDiff`: first half minus closing, in seconds. Positive means the
//!   field went out hard; negative means the race finished faster than it
//!   started.
//! - `rpci`: `firstHalf / closing * 50`, rounded to one decimal. Values at
//!   or above 51 classify as `sprint`, at or below 48 as `stamina`, and
//!   anything between as `average`.
//!
//! The thresholds are configurable; see below.
//!
//! # Configuration
//!
//! `raceday` reads `raceday.toml` from the working directory when present,
//! or the file named by `--config`:
//!
//! ```toml
//! data_root = "/srv/keibabook/data"
//!
//! # Where the persisted index lives. Defaults to `cache` under data_root.
//! cache_dir = "/srv/keibabook/cache"
//!
//! [pace]
//! sprint_min_rpci = 51.0
//! stamina_max_rpci = 48.0
//! ```
//!
//! Command-line flags override configuration values, and
//! `RACEDAY_DATA_ROOT` can stand in for `--data-root`.
//!
//! # Persisted Index
//!
//! The index is two JSON files in the cache directory:
//!
//! - `race_date_index.json`: every indexed date with its full race card
//! - `race_date_index_meta.json`: build timestamp, counts, and a schema
//!   version
//!
//! An index written by an older schema version is ignored and rebuilt on
//! the next `build`; queries treat it as absent. The files are plain JSON,
//! safe to inspect or delete by hand (`raceday clear` does the same).
//!
//! # Troubleshooting
//!
//! ## Queries return nothing
//!
//! Queries never scan the dataset. If `dates` prints nothing, run
//! `raceday build` first, and check that the dataset root is the directory
//! containing the `<year>` directories.
//!
//! ## A day is missing from the index
//!
//! Day directories must be `<year>/<month>/<day>` with a four-digit year
//! and zero-padded two-digit month and day (`2025/01/05`, not `2025/1/5`).
//! A day whose `race_info.json` parses but lists no races is deliberately
//! absent, even when venue directories exist alongside it.
//!
//! ## Races have no pace figures
//!
//! Pace figures need a result record in the day's `temp/` directory with
//! the winner's two split times. Races without one, or with unparseable
//! splits, are indexed without figures; that is normal for future race
//! days.
//!
//! ## Diagnosing a scan
//!
//! Rerun with logging to see what the scanner skipped and why:
//!
//! ```bash
//! raceday build --log-level debug
//! ```

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use raceday::Result;

mod commands;

use crate::commands::{
    BuildArgs, ClearArgs, DatesArgs, RacesArgs, StatusArgs, clear_index, list_dates, rebuild_index, show_races, show_status,
};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "raceday", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build or refresh the race date index
    Build(BuildArgs),
    /// List indexed dates, most recent first
    Dates(DatesArgs),
    /// Show the race card for one date
    Races(RacesArgs),
    /// Show index freshness and counts
    Status(StatusArgs),
    /// Delete the persisted index
    Clear(ClearArgs),
}

fn main() -> Result<()> {
    match &Cli::parse().command {
        Command::Build(args) => rebuild_index(args),
        Command::Dates(args) => list_dates(args),
        Command::Races(args) => show_races(args),
        Command::Status(args) => show_status(args),
        Command::Clear(args) => clear_index(args),
    }
}
