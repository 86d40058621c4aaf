use crate::{ids::ProductId, slug::slugify};

/// A catalog entry as consumed by the feed engine.
///
/// Products arrive validated from the catalog layer; the feed treats them
/// as read-only and never re-validates them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub sub_category: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    pub price: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub rating: Option<f32>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub rating_count: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sponsored: bool,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            sub_category: None,
            tags: Vec::new(),
            price,
            rating: None,
            rating_count: None,
            sponsored: false,
        }
    }

    pub fn with_sub_category(
        mut self,
        sub_category: impl Into<String>,
    ) -> Self {
        self.sub_category = Some(sub_category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rating(mut self, rating: f32, rating_count: u32) -> Self {
        self.rating = Some(rating);
        self.rating_count = Some(rating_count);
        self
    }

    pub fn with_sponsored(mut self, sponsored: bool) -> Self {
        self.sponsored = sponsored;
        self
    }

    pub fn category_slug(&self) -> String {
        slugify(&self.category)
    }

    pub fn sub_category_slug(&self) -> Option<String> {
        self.sub_category
            .as_deref()
            .map(slugify)
            .filter(|slug| !slug.is_empty())
    }

    /// Normalized, de-duplicated tag keys in first-seen order.
    pub fn tag_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let slug = slugify(tag);
            if !slug.is_empty() && !slugs.contains(&slug) {
                slugs.push(slug);
            }
        }
        slugs
    }
}
