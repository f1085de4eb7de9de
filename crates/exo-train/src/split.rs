//! Stratified train/test partitioning.

use exo_model::Label;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Row indices of each side of a split, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partition rows so both sides keep the class proportions of `labels`.
///
/// Each class contributes `round(count * test_fraction)` rows to the test
/// side. The same labels, fraction and seed always give the same split.
pub fn stratified_split(labels: &[Label], test_fraction: f64, seed: u64) -> SplitIndices {
    let mut non_planets: Vec<usize> = Vec::new();
    let mut planets: Vec<usize> = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        match label {
            Label::NonPlanet => non_planets.push(index),
            Label::Planet => planets.push(index),
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::with_capacity(labels.len());
    for class in [&mut non_planets, &mut planets] {
        class.shuffle(&mut rng);
        let held_out = ((class.len() as f64 * test_fraction).round() as usize).min(class.len());
        test.extend_from_slice(&class[..held_out]);
        train.extend_from_slice(&class[held_out..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    SplitIndices { train, test }
}

/// Copy out the selected elements in index order.
pub fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}
