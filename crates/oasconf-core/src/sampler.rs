//! # Corpus Sampler
//!
//! Selects a random subset of the corpus so ordinary runs stay cheap while
//! full runs (`--all`, `--failedOnly`) cover everything.
//!
//! Selection is uniform without replacement via `rand::seq::index::sample`,
//! which always terminates regardless of how close the sample size is to
//! the corpus size. (A rejection-sampling re-draw loop would meet the same
//! distribution contract but risks unbounded looping near full coverage.)

use rand::Rng;

use crate::model::CorpusMap;

/// Select `floor(|entries| * percentage / 100)` distinct entries uniformly
/// at random, without replacement.
///
/// `percentage` is clamped to 0..=100. 100 is a fast path returning the
/// full map unchanged; 0 yields an empty map. The result keeps the corpus
/// map's sorted-by-name iteration order.
pub fn sample<R: Rng + ?Sized>(entries: &CorpusMap, percentage: u8, rng: &mut R) -> CorpusMap {
    let percentage = percentage.min(100);
    if percentage == 100 {
        return entries.clone();
    }

    let size = entries.len() * usize::from(percentage) / 100;
    if size == 0 {
        return CorpusMap::new();
    }

    let keys: Vec<&String> = entries.keys().collect();
    rand::seq::index::sample(rng, keys.len(), size)
        .into_iter()
        .map(|i| {
            let name = keys[i];
            (name.clone(), entries[name].clone())
        })
        .collect()
}
