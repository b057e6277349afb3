//! Racecourse venue type.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One of the ten racecourses appearing in the dataset.
///
/// Declaration order follows the racing authority's two-digit venue codes,
/// ascending, and is the canonical ordering used everywhere in the index;
/// the derived `Ord` sorts venues canonically. Venues serialize as their
/// Japanese names, matching both the dataset and the persisted index.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString)]
pub enum Venue {
    #[serde(rename = "札幌")]
    #[strum(serialize = "札幌")]
    Sapporo,

    #[serde(rename = "函館")]
    #[strum(serialize = "函館")]
    Hakodate,

    #[serde(rename = "福島")]
    #[strum(serialize = "福島")]
    Fukushima,

    #[serde(rename = "新潟")]
    #[strum(serialize = "新潟")]
    Niigata,

    #[serde(rename = "東京")]
    #[strum(serialize = "東京")]
    Tokyo,

    #[serde(rename = "中山")]
    #[strum(serialize = "中山")]
    Nakayama,

    #[serde(rename = "中京")]
    #[strum(serialize = "中京")]
    Chukyo,

    #[serde(rename = "京都")]
    #[strum(serialize = "京都")]
    Kyoto,

    #[serde(rename = "阪神")]
    #[strum(serialize = "阪神")]
    Hanshin,

    #[serde(rename = "小倉")]
    #[strum(serialize = "小倉")]
    Kokura,
}

impl Venue {
    /// The two-digit venue code embedded in race identifiers.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sapporo => "01",
            Self::Hakodate => "02",
            Self::Fukushima => "03",
            Self::Niigata => "04",
            Self::Tokyo => "05",
            Self::Nakayama => "06",
            Self::Chukyo => "07",
            Self::Kyoto => "08",
            Self::Hanshin => "09",
            Self::Kokura => "10",
        }
    }

    /// Resolve a venue from its Japanese name, `None` when unrecognized.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}
