//! Filter, sort and sponsored-placement pipeline applied to the ranked
//! catalog before it is split into decks.
//!
//! Every stage is order-preserving where it can be: filtering keeps
//! relative order, sorts are stable (so a personalized order survives as
//! the tie-break of an explicit sort), and sponsored interleaving only
//! moves sponsored products.

mod filter;
mod sort;
mod sponsored;

pub use filter::{filter_products, matches_query};
pub use sort::{compare_products, sort_products};
pub use sponsored::interleave_sponsored;

use vitrine_config::SponsoredSettings;
use vitrine_model::{Product, SortOption, slugify};

/// Viewer-selected narrowing and ordering of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    /// Free-text search; blank means no constraint.
    pub text: String,
    /// Category label or slug; blank means no constraint.
    pub category: String,
    /// Subcategory label or slug; blank means no constraint.
    pub sub_category: String,
    pub sort: SortOption,
}

impl FeedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_sub_category(
        mut self,
        sub_category: impl Into<String>,
    ) -> Self {
        self.sub_category = sub_category.into();
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Lowercased, trimmed search needle, if any.
    pub fn needle(&self) -> Option<String> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    pub fn category_slug(&self) -> Option<String> {
        let slug = slugify(&self.category);
        (!slug.is_empty()).then_some(slug)
    }

    pub fn sub_category_slug(&self) -> Option<String> {
        let slug = slugify(&self.sub_category);
        (!slug.is_empty()).then_some(slug)
    }

    /// Filter, sort, then interleave sponsored products.
    pub fn apply(
        &self,
        products: Vec<Product>,
        sponsored: &SponsoredSettings,
    ) -> Vec<Product> {
        let mut products = filter_products(products, self);
        sort_products(&mut products, self.sort);
        interleave_sponsored(products, sponsored)
    }
}
