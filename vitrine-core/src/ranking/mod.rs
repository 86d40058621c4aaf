//! Per-viewer personalization of the catalog order.
//!
//! The base score of a product comes from the viewer's recently-viewed
//! history: every viewed product lends a recency boost `(N - i) / N` to its
//! category (x3), subcategory (x2) and each of its tags (x1). Additional
//! [`ScoringTerm`]s (taste profile, preferred categories, recommendation
//! list) are summed on top. Ordering is by descending score with the
//! original catalog index as tie-break, so equal inputs always produce the
//! same order.
//!
//! Personalization never overrides an order it was not asked to touch: when
//! it is switched off, when the history is empty, or when the history has
//! not been hydrated yet, the catalog comes back unchanged.

mod recency;
pub mod terms;

pub use recency::RecencyWeights;
pub use terms::{
    ListProfile, PreferredCategoryTerm, RecommendationListTerm, ScoringTerm,
    TasteProfileTerm, TermContext,
};

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use tracing::{debug, trace};
use vitrine_config::ScoringSettings;
use vitrine_model::{FeedSignals, Hydration, Product, ProductId};

/// Which path the ranking took for a given render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOutcome {
    /// The viewer switched personalization off.
    Disabled,
    /// History loaded but empty.
    NoHistory,
    /// History not hydrated yet; the catalog order is provisional.
    Pending,
    /// Scores were computed and applied.
    Personalized,
}

impl RankOutcome {
    pub fn is_personalized(self) -> bool {
        matches!(self, RankOutcome::Personalized)
    }
}

/// Transient score of one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry<'a> {
    pub product: &'a Product,
    pub score: f64,
    pub original_index: usize,
}

/// Ranked catalog plus the path that produced it.
#[derive(Debug, Clone)]
pub struct Ranked {
    pub products: Vec<Product>,
    pub outcome: RankOutcome,
}

/// Scores and orders catalogs for one viewer context.
#[derive(Debug)]
pub struct Ranker {
    settings: ScoringSettings,
    terms: Vec<Box<dyn ScoringTerm>>,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(ScoringSettings::default())
    }
}

impl Ranker {
    /// Ranker with the built-in taste, preferred-category and
    /// recommendation-list terms.
    pub fn new(settings: ScoringSettings) -> Self {
        Self::without_terms(settings)
            .with_term(TasteProfileTerm)
            .with_term(PreferredCategoryTerm)
            .with_term(RecommendationListTerm)
    }

    /// Ranker that only applies the recency formula.
    pub fn without_terms(settings: ScoringSettings) -> Self {
        Self {
            settings,
            terms: Vec::new(),
        }
    }

    pub fn with_term(mut self, term: impl ScoringTerm + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Rank using everything the host knows about the viewer.
    pub fn rank(
        &self,
        products: Vec<Product>,
        signals: &FeedSignals,
    ) -> Ranked {
        let outcome = if !signals.personalization_enabled() {
            RankOutcome::Disabled
        } else {
            match &signals.recently_viewed {
                Hydration::Pending => RankOutcome::Pending,
                Hydration::Loaded(history) if history.is_empty() => {
                    RankOutcome::NoHistory
                }
                Hydration::Loaded(_) => RankOutcome::Personalized,
            }
        };

        if !outcome.is_personalized() {
            debug!(?outcome, count = products.len(), "ranking skipped");
            return Ranked { products, outcome };
        }

        let history = signals
            .recently_viewed
            .loaded()
            .map(|h| h.ids())
            .unwrap_or_default();
        let products = self.score(products, history, true, signals);
        debug!(count = products.len(), "ranking applied");
        Ranked { products, outcome }
    }

    /// Order `products` for the given history.
    ///
    /// Returns the input untouched when personalization is disabled or the
    /// history is empty.
    pub fn score(
        &self,
        products: Vec<Product>,
        recently_viewed: &[ProductId],
        personalization_enabled: bool,
        signals: &FeedSignals,
    ) -> Vec<Product> {
        if !personalization_enabled || recently_viewed.is_empty() {
            return products;
        }

        let mut order: Vec<(usize, f64)> = self
            .score_entries(&products, recently_viewed, signals)
            .into_iter()
            .map(|entry| (entry.original_index, entry.score))
            .collect();
        order.sort_by(|a, b| compare_scored(a.1, a.0, b.1, b.0));

        let mut slots: Vec<Option<Product>> =
            products.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|(index, _)| slots[index].take())
            .collect()
    }

    /// Score every product without reordering.
    pub fn score_entries<'a>(
        &self,
        products: &'a [Product],
        recently_viewed: &[ProductId],
        signals: &FeedSignals,
    ) -> Vec<ScoredEntry<'a>> {
        let weights = RecencyWeights::from_history(
            products,
            recently_viewed,
            &self.settings,
        );
        let list =
            ListProfile::from_catalog(products, &signals.recommendation_list);
        let ctx = TermContext {
            signals,
            settings: &self.settings,
            list: &list,
        };

        products
            .iter()
            .enumerate()
            .map(|(original_index, product)| {
                let base = weights.score(product, &self.settings);
                let extra: f64 = self
                    .terms
                    .iter()
                    .map(|term| finite_or_zero(term.score(product, &ctx)))
                    .sum();
                let score = finite_or_zero(base + extra);
                trace!(id = %product.id, score, "scored product");
                ScoredEntry {
                    product,
                    score,
                    original_index,
                }
            })
            .collect()
    }
}

/// Descending by score, ascending by original index on ties.
fn compare_scored(
    a_score: f64,
    a_index: usize,
    b_score: f64,
    b_index: usize,
) -> Ordering {
    OrderedFloat(b_score)
        .cmp(&OrderedFloat(a_score))
        .then_with(|| a_index.cmp(&b_index))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_model::{RecentlyViewed, TasteProfile};

    fn id(raw: &str) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    fn product(raw: &str, category: &str) -> Product {
        Product::new(id(raw), raw.to_uppercase(), category, 10.0)
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn signals_with_history(history: &[&str]) -> FeedSignals {
        FeedSignals::loaded(
            RecentlyViewed::from_ids(history.iter().map(|raw| id(raw))),
            TasteProfile::new(),
        )
    }

    /// Ten products: p3 and p7 are the viewed Tech/Pets anchors.
    fn ten_products() -> Vec<Product> {
        (0..10)
            .map(|n| {
                let category = match n {
                    3 | 1 => "Tech",
                    7 | 5 => "Pets",
                    _ => "Home",
                };
                product(&format!("p{n}"), category)
            })
            .collect()
    }

    #[test]
    fn recency_boost_weights_categories() {
        let catalog = ten_products();
        let history = [id("p3"), id("p7")];
        let weights = RecencyWeights::from_history(
            &catalog,
            &history,
            &ScoringSettings::default(),
        );
        assert_eq!(weights.category("tech"), 3.0);
        assert_eq!(weights.category("pets"), 1.5);
    }

    #[test]
    fn tech_outranks_pets_and_anchor_order_holds() {
        let ranker = Ranker::without_terms(ScoringSettings::default());
        let signals = signals_with_history(&["p3", "p7"]);
        let ranked = ranker.rank(ten_products(), &signals);

        assert_eq!(ranked.outcome, RankOutcome::Personalized);
        assert_eq!(
            ids(&ranked.products),
            vec!["p1", "p3", "p5", "p7", "p0", "p2", "p4", "p6", "p8", "p9"]
        );
    }

    #[test]
    fn disabled_profile_returns_catalog_unchanged() {
        let catalog = ten_products();
        let signals = FeedSignals::loaded(
            RecentlyViewed::from_ids([id("p3")]),
            TasteProfile::disabled(),
        );
        let ranked = Ranker::default().rank(catalog.clone(), &signals);
        assert_eq!(ranked.outcome, RankOutcome::Disabled);
        assert_eq!(ranked.products, catalog);
    }

    #[test]
    fn pending_history_is_distinct_from_empty_history() {
        let catalog = ten_products();
        let pending =
            Ranker::default().rank(catalog.clone(), &FeedSignals::default());
        assert_eq!(pending.outcome, RankOutcome::Pending);
        assert_eq!(pending.products, catalog);

        let empty = Ranker::default()
            .rank(catalog.clone(), &signals_with_history(&[]));
        assert_eq!(empty.outcome, RankOutcome::NoHistory);
        assert_eq!(empty.products, catalog);
    }

    #[test]
    fn unknown_history_ids_are_skipped() {
        let catalog = ten_products();
        let signals = signals_with_history(&["ghost", "p7"]);
        let ranked = Ranker::without_terms(ScoringSettings::default())
            .rank(catalog, &signals);
        // Only p7 contributes: Pets first, everything else keeps its order.
        assert_eq!(
            ids(&ranked.products)[..3],
            ["p5", "p7", "p0"]
        );
    }

    #[test]
    fn tag_contribution_is_capped() {
        let tags = ["a", "b", "c", "d", "e"];
        let viewed = Product::new(id("v"), "V", "Misc", 1.0).with_tags(tags);
        let tag_heavy =
            Product::new(id("t"), "T", "Other", 1.0).with_tags(tags);
        let catalog = vec![viewed, tag_heavy];

        let history = [id("v")];
        let settings = ScoringSettings::default();
        let weights =
            RecencyWeights::from_history(&catalog, &history, &settings);
        // Five shared tags at boost 1.0 would be 5.0 without the cap.
        assert_eq!(weights.score(&catalog[1], &settings), 3.0);
    }

    #[test]
    fn subcategory_adds_double_recency() {
        let viewed = product("v", "Home").with_sub_category("Lamps");
        let sibling = product("s", "Garden").with_sub_category("lamps");
        let catalog = vec![viewed, sibling];
        let settings = ScoringSettings::default();
        let weights =
            RecencyWeights::from_history(&catalog, &[id("v")], &settings);
        assert_eq!(weights.score(&catalog[1], &settings), 2.0);
    }

    #[test]
    fn repeated_scoring_is_deterministic() {
        let ranker = Ranker::default();
        let signals = signals_with_history(&["p7", "p3", "p0"])
            .with_preferred_categories(["Home"]);
        let first = ranker.rank(ten_products(), &signals).products;
        for _ in 0..5 {
            assert_eq!(ranker.rank(ten_products(), &signals).products, first);
        }
    }

    #[test]
    fn non_finite_term_output_is_neutralized() {
        #[derive(Debug)]
        struct Broken;
        impl ScoringTerm for Broken {
            fn name(&self) -> &'static str {
                "broken"
            }
            fn score(&self, _: &Product, _: &TermContext<'_>) -> f64 {
                f64::NAN
            }
        }

        let ranker = Ranker::without_terms(ScoringSettings::default())
            .with_term(Broken);
        let catalog = ten_products();
        let signals = signals_with_history(&["p3"]);
        let entries = ranker.score_entries(&catalog, &[id("p3")], &signals);
        assert!(entries.iter().all(|entry| entry.score.is_finite()));
    }
}
