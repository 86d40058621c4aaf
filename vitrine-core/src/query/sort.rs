use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use vitrine_model::{Product, SortOption};

/// Compare two products under `sort`. `Newest` compares everything equal so
/// catalog order is preserved.
pub fn compare_products(
    a: &Product,
    b: &Product,
    sort: SortOption,
) -> Ordering {
    match sort {
        SortOption::Newest => Ordering::Equal,
        SortOption::TopRated => rating_key(b)
            .cmp(&rating_key(a))
            .then_with(|| rating_count(b).cmp(&rating_count(a))),
        SortOption::PriceLow => {
            OrderedFloat(a.price).cmp(&OrderedFloat(b.price))
        }
        SortOption::PriceHigh => {
            OrderedFloat(b.price).cmp(&OrderedFloat(a.price))
        }
    }
}

/// Stable in-place sort; equal keys keep their incoming order.
pub fn sort_products(products: &mut [Product], sort: SortOption) {
    if sort == SortOption::Newest {
        return;
    }
    products.sort_by(|a, b| compare_products(a, b, sort));
}

fn rating_key(product: &Product) -> OrderedFloat<f32> {
    OrderedFloat(product.rating.unwrap_or(0.0))
}

fn rating_count(product: &Product) -> u32 {
    product.rating_count.unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_model::ProductId;

    fn product(raw: &str, price: f64) -> Product {
        Product::new(ProductId::new(raw).unwrap(), raw, "Tech", price)
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn newest_keeps_catalog_order() {
        let mut items = vec![product("b", 3.0), product("a", 1.0)];
        sort_products(&mut items, SortOption::Newest);
        assert_eq!(ids(&items), vec!["b", "a"]);
    }

    #[test]
    fn price_sorts_in_both_directions() {
        let mut items = vec![
            product("mid", 20.0),
            product("low", 5.0),
            product("high", 90.0),
        ];
        sort_products(&mut items, SortOption::PriceLow);
        assert_eq!(ids(&items), vec!["low", "mid", "high"]);

        sort_products(&mut items, SortOption::PriceHigh);
        assert_eq!(ids(&items), vec!["high", "mid", "low"]);
    }

    #[test]
    fn top_rated_breaks_ties_by_rating_count() {
        let mut items = vec![
            product("unrated", 1.0),
            product("few", 1.0).with_rating(4.5, 3),
            product("many", 1.0).with_rating(4.5, 300),
            product("best", 1.0).with_rating(4.9, 1),
        ];
        sort_products(&mut items, SortOption::TopRated);
        assert_eq!(ids(&items), vec!["best", "many", "few", "unrated"]);
    }

    #[test]
    fn equal_prices_keep_incoming_order() {
        let mut items = vec![
            product("first", 10.0),
            product("second", 10.0),
            product("cheap", 1.0),
        ];
        sort_products(&mut items, SortOption::PriceHigh);
        assert_eq!(ids(&items), vec!["first", "second", "cheap"]);
    }
}
