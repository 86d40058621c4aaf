use std::collections::HashMap;

use vitrine_config::ScoringSettings;
use vitrine_model::{Product, ProductId};

/// Category, subcategory and tag weights accumulated from view history.
#[derive(Debug, Clone, Default)]
pub struct RecencyWeights {
    categories: HashMap<String, f64>,
    sub_categories: HashMap<String, f64>,
    tags: HashMap<String, f64>,
}

impl RecencyWeights {
    /// Accumulate weights from a most-recent-first history. Ids that are not
    /// in `catalog` contribute nothing.
    pub fn from_history(
        catalog: &[Product],
        recently_viewed: &[ProductId],
        settings: &ScoringSettings,
    ) -> Self {
        let mut weights = Self::default();
        let total = recently_viewed.len();
        if total == 0 {
            return weights;
        }

        let by_id: HashMap<&str, &Product> = catalog
            .iter()
            .map(|product| (product.id.as_str(), product))
            .collect();

        for (index, viewed_id) in recently_viewed.iter().enumerate() {
            let Some(product) = by_id.get(viewed_id.as_str()) else {
                continue;
            };
            let boost = (total - index) as f64 / total as f64;

            *weights
                .categories
                .entry(product.category_slug())
                .or_default() += settings.category_recency_weight * boost;

            if let Some(sub) = product.sub_category_slug() {
                *weights.sub_categories.entry(sub).or_default() +=
                    settings.sub_category_recency_weight * boost;
            }

            for tag in product.tag_slugs() {
                *weights.tags.entry(tag).or_default() +=
                    settings.tag_recency_weight * boost;
            }
        }

        weights
    }

    pub fn category(&self, slug: &str) -> f64 {
        self.categories.get(slug).copied().unwrap_or(0.0)
    }

    pub fn sub_category(&self, slug: &str) -> f64 {
        self.sub_categories.get(slug).copied().unwrap_or(0.0)
    }

    pub fn tag(&self, slug: &str) -> f64 {
        self.tags.get(slug).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.sub_categories.is_empty()
            && self.tags.is_empty()
    }

    /// Base recency score of `product`: category + subcategory + capped
    /// tag sum.
    pub fn score(&self, product: &Product, settings: &ScoringSettings) -> f64 {
        let category = self.category(&product.category_slug());
        let sub_category = product
            .sub_category_slug()
            .map(|slug| self.sub_category(&slug))
            .unwrap_or(0.0);
        let tags: f64 = product
            .tag_slugs()
            .iter()
            .map(|slug| self.tag(slug))
            .sum();

        category + sub_category + tags.min(settings.tag_score_cap)
    }
}
