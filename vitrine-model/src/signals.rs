//! Behavioral signals consumed by the feed ranking.
//!
//! Every signal here is sourced and persisted by the host application. The
//! feed keeps its own copy and never writes back to the host; the mutators
//! below apply the same bounds the ranking assumes.

use crate::{ids::ProductId, product::Product, slug::slugify};
use std::collections::{BTreeMap, BTreeSet};

/// Symmetric bound applied to every taste-profile weight.
pub const TASTE_WEIGHT_LIMIT: f32 = 24.0;

/// Maximum number of ids retained in the recently-viewed history.
pub const RECENTLY_VIEWED_LIMIT: usize = 24;

/// Clamp a taste weight into `[-TASTE_WEIGHT_LIMIT, TASTE_WEIGHT_LIMIT]`.
/// Non-finite weights collapse to 0.
pub fn clamp_taste_weight(weight: f32) -> f32 {
    if weight.is_finite() {
        weight.clamp(-TASTE_WEIGHT_LIMIT, TASTE_WEIGHT_LIMIT)
    } else {
        0.0
    }
}

/// Signal whose value is loaded asynchronously after the feed mounts.
///
/// `Pending` is deliberately distinct from `Loaded(empty)`: a ranking pass
/// that runs before hydration finishes must not be mistaken for "this viewer
/// has no history".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Hydration<T> {
    #[default]
    Pending,
    Loaded(T),
}

impl<T> Hydration<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Hydration::Loaded(value) => Some(value),
            Hydration::Pending => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Hydration::Loaded(value) => Some(value),
            Hydration::Pending => None,
        }
    }
}

impl<T> From<T> for Hydration<T> {
    fn from(value: T) -> Self {
        Hydration::Loaded(value)
    }
}

/// Viewer-tuned category and tag weights.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TasteProfile {
    /// Master switch for personalization as a whole.
    pub enabled: bool,
    categories: BTreeMap<String, f32>,
    tags: BTreeMap<String, f32>,
}

impl Default for TasteProfile {
    fn default() -> Self {
        Self {
            enabled: true,
            categories: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }
}

impl TasteProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: &str, weight: f32) -> Self {
        self.set_category(category, weight);
        self
    }

    pub fn with_tag(mut self, tag: &str, weight: f32) -> Self {
        self.set_tag(tag, weight);
        self
    }

    pub fn set_category(&mut self, category: &str, weight: f32) {
        set_weight(&mut self.categories, category, weight);
    }

    pub fn set_tag(&mut self, tag: &str, weight: f32) {
        set_weight(&mut self.tags, tag, weight);
    }

    /// Shift a category weight by `delta`, keeping it inside the bound.
    pub fn nudge_category(&mut self, category: &str, delta: f32) {
        nudge_weight(&mut self.categories, category, delta);
    }

    /// Shift a tag weight by `delta`, keeping it inside the bound.
    pub fn nudge_tag(&mut self, tag: &str, delta: f32) {
        nudge_weight(&mut self.tags, tag, delta);
    }

    /// Apply the same nudge to a product's category and every tag it has.
    pub fn nudge_from_product(&mut self, product: &Product, delta: f32) {
        self.nudge_category(&product.category, delta);
        for tag in product.tag_slugs() {
            self.nudge_tag(&tag, delta);
        }
    }

    pub fn category_weight(&self, slug: &str) -> f32 {
        self.categories
            .get(slug)
            .copied()
            .map(clamp_taste_weight)
            .unwrap_or(0.0)
    }

    pub fn tag_weight(&self, slug: &str) -> f32 {
        self.tags
            .get(slug)
            .copied()
            .map(clamp_taste_weight)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.tags.is_empty()
    }
}

fn set_weight(map: &mut BTreeMap<String, f32>, key: &str, weight: f32) {
    let slug = slugify(key);
    if slug.is_empty() {
        return;
    }
    map.insert(slug, clamp_taste_weight(weight));
}

fn nudge_weight(map: &mut BTreeMap<String, f32>, key: &str, delta: f32) {
    if !delta.is_finite() {
        return;
    }
    let slug = slugify(key);
    if slug.is_empty() {
        return;
    }
    let entry = map.entry(slug).or_insert(0.0);
    *entry = clamp_taste_weight(*entry + delta);
}

/// Most-recent-first product view history.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RecentlyViewed(Vec<ProductId>);

impl RecentlyViewed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an already ordered history, dropping repeats and anything
    /// past the retention bound.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut out: Vec<ProductId> = Vec::new();
        for id in ids {
            if out.len() == RECENTLY_VIEWED_LIMIT {
                break;
            }
            if !out.contains(&id) {
                out.push(id);
            }
        }
        RecentlyViewed(out)
    }

    /// Record a fresh view: the id moves to the front and the oldest entry
    /// falls off once the bound is reached.
    pub fn record(&mut self, id: ProductId) {
        self.0.retain(|existing| existing != &id);
        self.0.insert(0, id);
        self.0.truncate(RECENTLY_VIEWED_LIMIT);
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything the ranking reads about the current viewer for one render.
#[derive(Debug, Clone, Default)]
pub struct FeedSignals {
    pub recently_viewed: Hydration<RecentlyViewed>,
    pub taste: Hydration<TasteProfile>,
    /// Category slugs the viewer picked explicitly.
    pub preferred_categories: BTreeSet<String>,
    /// Ids from the viewer's named recommendation list.
    pub recommendation_list: BTreeSet<ProductId>,
}

impl FeedSignals {
    /// Signals for a viewer whose storage reads have all completed.
    pub fn loaded(history: RecentlyViewed, taste: TasteProfile) -> Self {
        Self {
            recently_viewed: Hydration::Loaded(history),
            taste: Hydration::Loaded(taste),
            ..Self::default()
        }
    }

    pub fn with_preferred_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.preferred_categories = categories
            .into_iter()
            .map(|c| slugify(c.as_ref()))
            .filter(|slug| !slug.is_empty())
            .collect();
        self
    }

    pub fn with_recommendation_list<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ProductId>,
    {
        self.recommendation_list = ids.into_iter().collect();
        self
    }

    /// Whether the viewer left personalization switched on. A profile that
    /// has not loaded yet counts as enabled; the pending state is reported
    /// separately by the ranking.
    pub fn personalization_enabled(&self) -> bool {
        self.taste.loaded().is_none_or(|taste| taste.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    #[test]
    fn taste_weights_are_clamped() {
        let mut taste = TasteProfile::new().with_category("Tech", 40.0);
        assert_eq!(taste.category_weight("tech"), TASTE_WEIGHT_LIMIT);

        taste.nudge_category("Tech", -100.0);
        assert_eq!(taste.category_weight("tech"), -TASTE_WEIGHT_LIMIT);

        taste.nudge_tag("Dogs", f32::NAN);
        assert_eq!(taste.tag_weight("dogs"), 0.0);
    }

    #[test]
    fn record_moves_existing_id_to_front() {
        let mut history = RecentlyViewed::from_ids([id("a"), id("b"), id("c")]);
        history.record(id("c"));
        assert_eq!(history.ids(), &[id("c"), id("a"), id("b")]);
    }

    #[test]
    fn history_is_bounded() {
        let mut history = RecentlyViewed::new();
        for n in 0..(RECENTLY_VIEWED_LIMIT + 5) {
            history.record(id(&format!("p{n}")));
        }
        assert_eq!(history.len(), RECENTLY_VIEWED_LIMIT);
        assert_eq!(
            history.ids()[0],
            id(&format!("p{}", RECENTLY_VIEWED_LIMIT + 4))
        );
    }

    #[test]
    fn pending_taste_counts_as_enabled() {
        let signals = FeedSignals::default();
        assert!(signals.personalization_enabled());

        let signals = FeedSignals::loaded(
            RecentlyViewed::new(),
            TasteProfile::disabled(),
        );
        assert!(!signals.personalization_enabled());
    }
}
