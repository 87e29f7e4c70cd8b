//! Fuzzy selection of the listing whose name best matches a search term.

use crate::catalog::Listing;

/// Sørensen–Dice similarity over character bigrams, case-insensitive; whitespace is ignored.
///
/// Returns a value in `[0.0, 1.0]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
}

/// Index of the listing whose name is most similar to `term`.
///
/// There is no minimum score: any non-empty slice yields an index. Ties keep the earliest
/// listing, so marketplace relevance order breaks them.
pub fn best_match_index(term: &str, listings: &[Listing]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, listing) in listings.iter().enumerate() {
        let score = similarity(term, &listing.name);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// The best-matching listing, cloned out of `listings`.
pub fn best_match(term: &str, listings: &[Listing]) -> Option<Listing> {
    best_match_index(term, listings).map(|i| listings[i].clone())
}
