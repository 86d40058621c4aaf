use tracing::trace;
use vitrine_config::SponsoredSettings;
use vitrine_model::Product;

/// Pull sponsored products out of `products` and reinsert at most
/// `max_sponsored` of them, one after every `interval` organic products.
///
/// Sponsored products that do not fit the cadence are appended at the end;
/// sponsored products past the cap are dropped from the feed. With no
/// organic products the (capped) sponsored products are returned as-is.
pub fn interleave_sponsored(
    products: Vec<Product>,
    settings: &SponsoredSettings,
) -> Vec<Product> {
    if !products.iter().any(|p| p.sponsored) {
        return products;
    }

    let (sponsored, organic): (Vec<Product>, Vec<Product>) =
        products.into_iter().partition(|p| p.sponsored);
    let dropped = sponsored.len().saturating_sub(settings.max_sponsored);
    let mut sponsored = sponsored.into_iter().take(settings.max_sponsored);

    if organic.is_empty() {
        return sponsored.collect();
    }

    let interval = settings.interval.max(1);
    let mut out = Vec::with_capacity(organic.len() + settings.max_sponsored);
    for (index, product) in organic.into_iter().enumerate() {
        out.push(product);
        if (index + 1) % interval == 0
            && let Some(ad) = sponsored.next()
        {
            out.push(ad);
        }
    }
    out.extend(sponsored);

    if dropped > 0 {
        trace!(dropped, "sponsored products over the cap were left out");
    }
    out
}
