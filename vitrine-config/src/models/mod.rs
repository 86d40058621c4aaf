//! Feed tuning model.
//!
//! Every section is `#[serde(default)]`, so a config file only needs to
//! name the knobs it overrides.

mod layout;
mod motion;

pub use layout::{ColumnBreakpoint, LayoutSettings};
pub use motion::{MotionSettings, SpeedMode};

use serde::{Deserialize, Serialize};

/// Top-level feed configuration consumed by `vitrine-core`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct FeedConfig {
    pub motion: MotionSettings,
    pub lifecycle: LifecycleSettings,
    pub layout: LayoutSettings,
    pub sponsored: SponsoredSettings,
    pub scoring: ScoringSettings,
}

/// Finite-deck completion thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleSettings {
    /// When false the columns loop forever and never report progress.
    pub finite: bool,
    /// Fraction of one deck cycle after which a column counts as being in
    /// its end zone. Must be in `(0, 1]`.
    pub end_zone_ratio: f64,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            finite: true,
            end_zone_ratio: 0.85,
        }
    }
}

/// Cadence for reinserting sponsored products into the organic feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SponsoredSettings {
    /// Upper bound on sponsored products shown per feed.
    pub max_sponsored: usize,
    /// One sponsored slot after this many organic products.
    pub interval: usize,
}

impl Default for SponsoredSettings {
    fn default() -> Self {
        Self {
            max_sponsored: 3,
            interval: 8,
        }
    }
}

/// Weights used by the ranking. The recency multipliers and tag cap define
/// the base formula; the remaining fields tune the pluggable terms.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub category_recency_weight: f64,
    pub sub_category_recency_weight: f64,
    pub tag_recency_weight: f64,
    /// Cap on the summed tag contribution of a single product.
    pub tag_score_cap: f64,
    /// Full-scale contribution of a maxed-out taste weight.
    pub taste_term_scale: f64,
    pub preferred_category_boost: f64,
    pub list_member_boost: f64,
    pub list_category_boost: f64,
    pub list_tag_boost: f64,
    pub list_tag_cap: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            category_recency_weight: 3.0,
            sub_category_recency_weight: 2.0,
            tag_recency_weight: 1.0,
            tag_score_cap: 3.0,
            taste_term_scale: 2.0,
            preferred_category_boost: 1.5,
            list_member_boost: 2.0,
            list_category_boost: 0.75,
            list_tag_boost: 0.25,
            list_tag_cap: 0.5,
        }
    }
}
