//! Shuffling that never hands back a solved arrangement.

use rand::{seq::SliceRandom, Rng};

/// Shuffles `items` with the thread-local generator. See [`shuffle_unsolved_with`].
pub fn shuffle_unsolved<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    shuffle_unsolved_with(items, key, &mut rand::thread_rng())
}

/// Returns a shuffled copy of `items` whose key sequence differs from the input's.
///
/// The shuffle is repeated until the order changes. When fewer than two distinct keys
/// exist no permutation can differ, so the input order is returned as-is.
pub fn shuffle_unsolved_with<T, K, F, R>(items: &[T], key: F, rng: &mut R) -> Vec<T>
where
    T: Clone,
    K: PartialEq,
    F: Fn(&T) -> K,
    R: Rng + ?Sized,
{
    let mut shuffled = items.to_vec();

    if !has_distinct_keys(items, &key) {
        return shuffled;
    }

    loop {
        shuffled.shuffle(rng);

        let unchanged = shuffled
            .iter()
            .zip(items)
            .all(|(a, b)| key(a) == key(b));

        if !unchanged {
            return shuffled;
        }
    }
}

fn has_distinct_keys<T, K, F>(items: &[T], key: &F) -> bool
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    match items.split_first() {
        Some((first, rest)) => {
            let first = key(first);
            rest.iter().any(|item| key(item) != first)
        }
        None => false,
    }
}
