use vitrine_model::Product;

use super::FeedQuery;

/// Keep the products matching every non-blank constraint of `query`.
pub fn filter_products(
    products: Vec<Product>,
    query: &FeedQuery,
) -> Vec<Product> {
    let needle = query.needle();
    let category = query.category_slug();
    let sub_category = query.sub_category_slug();

    if needle.is_none() && category.is_none() && sub_category.is_none() {
        return products;
    }

    products
        .into_iter()
        .filter(|product| {
            category
                .as_deref()
                .is_none_or(|slug| product.category_slug() == slug)
        })
        .filter(|product| {
            sub_category.as_deref().is_none_or(|slug| {
                product.sub_category_slug().as_deref() == Some(slug)
            })
        })
        .filter(|product| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_query(product, needle))
        })
        .collect()
}

/// Case-insensitive substring match across name, category, subcategory and
/// tags. `needle` must already be lowercased.
pub fn matches_query(product: &Product, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&product.name)
        || contains(&product.category)
        || product.sub_category.as_deref().is_some_and(contains)
        || product.tags.iter().any(|tag| contains(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_model::ProductId;

    fn catalog() -> Vec<Product> {
        let id = |raw: &str| ProductId::new(raw).unwrap();
        vec![
            Product::new(id("1"), "Walnut Desk Lamp", "Home & Garden", 40.0)
                .with_sub_category("Lighting")
                .with_tags(["Warm Light"]),
            Product::new(id("2"), "Chew Toy", "Pets", 8.0)
                .with_sub_category("Dog Toys")
                .with_tags(["rubber"]),
            Product::new(id("3"), "Mechanical Keyboard", "Tech", 120.0)
                .with_tags(["RGB", "desk setup"]),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn text_matches_any_field_case_insensitively() {
        let desk =
            filter_products(catalog(), &FeedQuery::new().with_text("DESK"));
        assert_eq!(ids(&desk), vec!["1", "3"]);

        let toys =
            filter_products(catalog(), &FeedQuery::new().with_text("dog"));
        assert_eq!(ids(&toys), vec!["2"]);
    }

    #[test]
    fn category_and_sub_category_match_by_slug() {
        let home = filter_products(
            catalog(),
            &FeedQuery::new().with_category("home-garden"),
        );
        assert_eq!(ids(&home), vec!["1"]);

        let toys = filter_products(
            catalog(),
            &FeedQuery::new()
                .with_category("Pets")
                .with_sub_category("dog_toys"),
        );
        assert_eq!(ids(&toys), vec!["2"]);
    }

    #[test]
    fn constraints_are_combined_with_and() {
        let none = filter_products(
            catalog(),
            &FeedQuery::new().with_text("lamp").with_category("tech"),
        );
        assert!(none.is_empty());
    }

    #[test]
    fn sub_category_filter_excludes_products_without_one() {
        let lit = filter_products(
            catalog(),
            &FeedQuery::new().with_sub_category("lighting"),
        );
        assert_eq!(ids(&lit), vec!["1"]);
    }
}
