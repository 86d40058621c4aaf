//! Core data model definitions shared across Vitrine crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod product;
pub mod signals;
pub mod slug;
pub mod sort_option;

// Intentionally curated re-exports for downstream consumers.
pub use error::ModelError;
pub use ids::ProductId;
pub use product::Product;
pub use signals::{
    FeedSignals, Hydration, RECENTLY_VIEWED_LIMIT, RecentlyViewed,
    TASTE_WEIGHT_LIMIT, TasteProfile, clamp_taste_weight,
};
pub use slug::slugify;
pub use sort_option::SortOption;
