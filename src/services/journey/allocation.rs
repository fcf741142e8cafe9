use rand::{seq::SliceRandom, Rng};
use std::cmp::Reverse;

use crate::models::{Mood, MoodMap};

/// Splits `remaining` slots across the mood buckets.
///
/// A per-mood override gives every bucket the same count, otherwise slots
/// follow the weights with a floor of one per mood. The result never sums
/// past `remaining`.
pub fn allocate(remaining: usize, weights: &MoodMap<f64>, per_mood: Option<usize>) -> MoodMap<usize> {
    let mut alloc = match per_mood {
        Some(count) => MoodMap::from_fn(|_| count),
        None if remaining == 0 => MoodMap::default(),
        None => {
            let total: f64 = weights.values().sum();
            MoodMap::from_fn(|mood| {
                let share = remaining as f64 * weights[mood] / total;
                (share.floor() as usize).max(1)
            })
        }
    };
    fit_to_budget(&mut alloc, remaining, weights);
    alloc
}

fn fit_to_budget(alloc: &mut MoodMap<usize>, remaining: usize, weights: &MoodMap<f64>) {
    let mut total: usize = alloc.values().sum();

    // Shave the largest buckets first, on ties the earlier mood loses a slot
    while total > remaining {
        let largest = alloc
            .iter()
            .filter(|(_, count)| **count > 1)
            .min_by_key(|(_, count)| Reverse(**count))
            .map(|(mood, _)| mood);
        let Some(mood) = largest else { break };
        alloc[mood] -= 1;
        total -= 1;
    }

    // Every bucket is down to one track: drop the lightest moods, later moods first
    while total > remaining {
        let lightest = Mood::ALL
            .into_iter()
            .rev()
            .filter(|mood| alloc[*mood] > 0)
            .min_by(|a, b| weights[*a].total_cmp(&weights[*b]));
        let Some(mood) = lightest else { break };
        total -= alloc[mood];
        alloc[mood] = 0;
    }
}

/// Shuffles each bucket, takes its allocation and tops the result up to
/// `remaining` from a shuffled pool of the unused candidates.
///
/// Top-up tracks join their own mood group, so the output always follows the
/// canonical mood order.
pub fn assemble<T, R>(
    buckets: MoodMap<Vec<T>>,
    alloc: &MoodMap<usize>,
    remaining: usize,
    shuffle_passes: usize,
    rng: &mut R,
) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let mut picks: MoodMap<Vec<T>> = MoodMap::from_fn(|_| Vec::new());
    let mut pool: Vec<(Mood, T)> = Vec::new();

    for (mood, mut bucket) in Mood::ALL.into_iter().zip(buckets.into_values()) {
        for _ in 0..shuffle_passes.max(1) {
            bucket.shuffle(rng);
        }
        let unused = bucket.split_off(alloc[mood].min(bucket.len()));
        pool.extend(unused.into_iter().map(|track| (mood, track)));
        picks[mood] = bucket;
    }

    let picked: usize = picks.values().map(Vec::len).sum();
    let shortfall = remaining.saturating_sub(picked);
    if shortfall > 0 && !pool.is_empty() {
        pool.shuffle(rng);
        for (mood, track) in pool.into_iter().take(shortfall) {
            picks[mood].push(track);
        }
    }

    picks.into_values().flatten().collect()
}
