use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Primary sort key selected by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SortOption {
    /// Catalog order, which upstream delivers newest-first.
    Newest,
    TopRated,
    PriceLow,
    #[default]
    PriceHigh,
}

impl SortOption {
    pub fn all() -> &'static [SortOption] {
        use SortOption::*;
        &[Newest, TopRated, PriceLow, PriceHigh]
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::TopRated => "top-rated",
            SortOption::PriceLow => "price-low",
            SortOption::PriceHigh => "price-high",
        }
    }

    /// Lenient parse used for query-string input: unknown values fall back
    /// to the default order.
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for SortOption {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SortOption::all()
            .iter()
            .copied()
            .find(|option| option.api_name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ModelError::UnknownSortOption(needle.to_owned()))
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}
