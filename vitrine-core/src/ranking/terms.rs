//! Pluggable scoring terms layered on top of the recency formula.
//!
//! Terms only run on the personalized path, so they can never break the
//! identity guarantee of a disabled or history-less ranking. Their outputs
//! are summed into the same score and share its tie-break.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use vitrine_config::ScoringSettings;
use vitrine_model::{FeedSignals, Product, ProductId, TASTE_WEIGHT_LIMIT};

/// Inputs shared by every term for one ranking pass.
#[derive(Debug)]
pub struct TermContext<'a> {
    pub signals: &'a FeedSignals,
    pub settings: &'a ScoringSettings,
    pub list: &'a ListProfile,
}

/// Additive score contribution. Non-finite results are treated as 0.
pub trait ScoringTerm: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, product: &Product, ctx: &TermContext<'_>) -> f64;
}

/// Categories and tags of the products on the viewer's recommendation list
/// that are present in the current catalog.
#[derive(Debug, Clone, Default)]
pub struct ListProfile {
    members: HashSet<ProductId>,
    categories: HashSet<String>,
    tags: HashSet<String>,
}

impl ListProfile {
    pub fn from_catalog(
        catalog: &[Product],
        list: &BTreeSet<ProductId>,
    ) -> Self {
        let mut profile = Self::default();
        if list.is_empty() {
            return profile;
        }
        for product in catalog.iter().filter(|p| list.contains(&p.id)) {
            profile.members.insert(product.id.clone());
            profile.categories.insert(product.category_slug());
            profile.tags.extend(product.tag_slugs());
        }
        profile
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.members.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Viewer taste weights, scaled so a maxed-out category plus maxed-out tags
/// contribute `2 * taste_term_scale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TasteProfileTerm;

impl ScoringTerm for TasteProfileTerm {
    fn name(&self) -> &'static str {
        "taste-profile"
    }

    fn score(&self, product: &Product, ctx: &TermContext<'_>) -> f64 {
        let Some(taste) = ctx.signals.taste.loaded() else {
            return 0.0;
        };
        if !taste.enabled || taste.is_empty() {
            return 0.0;
        }

        let limit = TASTE_WEIGHT_LIMIT as f64;
        let category = taste.category_weight(&product.category_slug()) as f64;
        let tags: f64 = product
            .tag_slugs()
            .iter()
            .map(|slug| taste.tag_weight(slug) as f64)
            .sum();

        (category + tags.clamp(-limit, limit)) / limit
            * ctx.settings.taste_term_scale
    }
}

/// Flat boost for categories the viewer picked explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferredCategoryTerm;

impl ScoringTerm for PreferredCategoryTerm {
    fn name(&self) -> &'static str {
        "preferred-category"
    }

    fn score(&self, product: &Product, ctx: &TermContext<'_>) -> f64 {
        if ctx
            .signals
            .preferred_categories
            .contains(&product.category_slug())
        {
            ctx.settings.preferred_category_boost
        } else {
            0.0
        }
    }
}

/// Bias toward the viewer's recommendation list: members get the full
/// boost, other products earn partial credit for resembling members.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationListTerm;

impl ScoringTerm for RecommendationListTerm {
    fn name(&self) -> &'static str {
        "recommendation-list"
    }

    fn score(&self, product: &Product, ctx: &TermContext<'_>) -> f64 {
        let list = ctx.list;
        if list.is_empty() {
            return 0.0;
        }
        if list.contains(&product.id) {
            return ctx.settings.list_member_boost;
        }

        let category = if list.categories.contains(&product.category_slug())
        {
            ctx.settings.list_category_boost
        } else {
            0.0
        };
        let shared_tags = product
            .tag_slugs()
            .iter()
            .filter(|slug| list.tags.contains(*slug))
            .count();
        let tags = (shared_tags as f64 * ctx.settings.list_tag_boost)
            .min(ctx.settings.list_tag_cap);

        category + tags
    }
}
