//! Splitting the ordered feed into per-column decks.

mod layout;
mod signature;

pub use layout::columns_for_width;
pub use signature::{DeckSignature, deck_signature};

use vitrine_model::Product;

/// Distribute `products` across `column_count` decks round-robin.
///
/// Product `i` lands in deck `i % column_count`, so the decks differ in
/// length by at most one and the extra items sit in the lowest columns.
/// Nothing is dropped or duplicated. An empty catalog yields
/// `column_count` empty decks; a column count of zero is treated as one.
pub fn build_decks(
    products: Vec<Product>,
    column_count: usize,
) -> Vec<Vec<Product>> {
    let column_count = column_count.max(1);
    let per_deck = products.len().div_ceil(column_count);
    let mut decks: Vec<Vec<Product>> = (0..column_count)
        .map(|_| Vec::with_capacity(per_deck))
        .collect();

    for (index, product) in products.into_iter().enumerate() {
        decks[index % column_count].push(product);
    }
    decks
}
