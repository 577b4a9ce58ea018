//! Uniform in-place shuffling.

use rand::Rng;

/// Shuffles `items` in place with the Fisher–Yates algorithm.
///
/// Walks from the last index down to 1 and swaps each slot with a
/// uniformly chosen index at or below it, so every permutation is equally
/// likely given a uniform `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Returns a shuffled copy of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle(&mut out, rng);
    out
}
