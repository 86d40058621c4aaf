use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use vitrine_model::Product;

/// Content identity of a deck layout.
///
/// Two layouts share a signature iff they have the same column count and
/// the same product ids in the same positions. Lifecycle state is keyed by
/// it, so a catalog or layout change starts from a clean slate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeckSignature(String);

impl DeckSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the signature of `decks`.
pub fn deck_signature(decks: &[Vec<Product>]) -> DeckSignature {
    let mut hasher = DefaultHasher::new();
    decks.len().hash(&mut hasher);
    for deck in decks {
        deck.len().hash(&mut hasher);
        for product in deck {
            product.id.hash(&mut hasher);
        }
    }
    DeckSignature(format!("{:016x}", hasher.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::build_decks;
    use vitrine_model::ProductId;

    fn products(raw: &[&str]) -> Vec<Product> {
        raw.iter()
            .map(|r| Product::new(ProductId::new(*r).unwrap(), *r, "Tech", 1.0))
            .collect()
    }

    #[test]
    fn signature_is_stable_for_equal_layouts() {
        let a = deck_signature(&build_decks(products(&["a", "b", "c"]), 2));
        let b = deck_signature(&build_decks(products(&["a", "b", "c"]), 2));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn signature_tracks_content_and_column_count() {
        let base = deck_signature(&build_decks(products(&["a", "b", "c"]), 2));
        let reordered =
            deck_signature(&build_decks(products(&["b", "a", "c"]), 2));
        let wider = deck_signature(&build_decks(products(&["a", "b", "c"]), 3));
        assert_ne!(base, reordered);
        assert_ne!(base, wider);
    }

    #[test]
    fn empty_layouts_differ_by_column_count() {
        assert_ne!(
            deck_signature(&build_decks(Vec::new(), 2)),
            deck_signature(&build_decks(Vec::new(), 3))
        );
    }
}
