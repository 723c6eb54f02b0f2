//! Weighted random selection over scored items.

use log::debug;
use rand::Rng;

/// Pick one entry from `scored` with probability proportional to its score.
///
/// Scores are shifted up by `max(0, -min)` so negative scores still yield
/// non-negative weights. When every shifted weight is zero the pick is
/// uniform over the whole slice. Returns `None` only for an empty slice.
///
/// The random source is supplied by the caller so draws can be replayed
/// from a seed.
///
/// # Examples
/// ```
/// use mealpick_recommender::select;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// assert_eq!(select(&[("ramen", 100)], &mut rng), Some(&"ramen"));
/// assert_eq!(select::<&str, _>(&[], &mut rng), None);
/// ```
pub fn select<'a, T, R>(scored: &'a [(T, i32)], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let min = scored.iter().map(|(_, score)| i64::from(*score)).min()?;
    let offset = (-min).max(0);
    let weight = |score: i32| i64::from(score) + offset;
    let total: i64 = scored.iter().map(|(_, score)| weight(*score)).sum();

    if total <= 0 {
        let index = rng.gen_range(0..scored.len());
        debug!(
            "all {} weights are zero; uniform draw picked index {index}",
            scored.len()
        );
        return scored.get(index).map(|(item, _)| item);
    }

    let draw = rng.gen_range(0..total);
    let mut cumulative = 0_i64;
    let position = scored.iter().position(|(_, score)| {
        cumulative += weight(*score);
        cumulative > draw
    });
    debug!("weighted draw {draw} of {total} (offset {offset}) picked index {position:?}");
    position
        .and_then(|index| scored.get(index))
        .map(|(item, _)| item)
}
