//! The date-keyed race index
//!
//! This module owns everything downstream of a dataset scan: the index data
//! model ([`DateIndexEntry`] and friends), the persisted cache artifacts
//! ([`IndexStore`]), and the process-wide query service ([`RaceDayIndex`])
//! that loads, rebuilds, and answers questions about the index.
//!
//! The index maps canonical `YYYY-MM-DD` date keys to per-day entries. Each
//! entry lists the venues active that day in canonical venue order, and each
//! venue lists its races ascending by race number. Days with no discoverable
//! races are absent from the index rather than present with empty venues.

mod model;
mod service;
mod store;
mod venue;

pub use model::{DateIndexEntry, PaceBands, PaceFigures, PaceType, RaceDay, RaceIndexEntry, TrackIndexEntry};
pub use service::{BuildReport, IndexStatus, RaceDayIndex};
pub use store::{INDEX_SCHEMA_VERSION, IndexMeta, IndexStore, LoadedIndex};
pub use venue::Venue;
