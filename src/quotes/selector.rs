//! Random quote selection
//!
//! Selection works on indices into the full collection so the caller can
//! record which entry was shown, independent of the active filter.

use super::types::Quote;
use rand::Rng;

/// Pick a uniformly random index among quotes matching `category`.
///
/// Returns `None` when no quote matches.
pub fn pick_index<R: Rng + ?Sized>(quotes: &[Quote], category: &str, rng: &mut R) -> Option<usize> {
    let candidates: Vec<usize> = quotes
        .iter()
        .enumerate()
        .filter(|(_, q)| q.matches_category(category))
        .map(|(i, _)| i)
        .collect();

    if candidates.is_empty() {
        return None;
    }

    Some(candidates[rng.gen_range(0..candidates.len())])
}

/// Interpret a stored last-viewed index against the current collection size.
pub fn parse_last_viewed(raw: Option<&str>, len: usize) -> Option<usize> {
    let index = raw?.trim().parse::<usize>().ok()?;
    (index < len).then_some(index)
}
