//! Command-line interface for the raceday tool.
//!
//! Each subcommand pairs a clap argument struct with a small handler
//! function. The `common` module resolves flags, environment, and the
//! configuration file into a ready [`raceday::index::RaceDayIndex`], so the
//! handlers themselves stay thin: build delegates to the service's rebuild,
//! dates and races are plain queries, status and clear are operator
//! conveniences over the same service.

mod build;
mod clear;
mod common;
mod dates;
mod races;
mod status;

pub use build::{BuildArgs, rebuild_index};
pub use clear::{ClearArgs, clear_index};
pub use dates::{DatesArgs, list_dates};
pub use races::{RacesArgs, show_races};
pub use status::{StatusArgs, show_status};
