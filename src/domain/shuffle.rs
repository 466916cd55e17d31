/// Random permutations for the hidden order and the starting tray.
///
/// Uses an in-place Fisher–Yates pass over a PCG stream, so every
/// permutation of the input is equally likely. A fixed seed makes a whole
/// session reproducible; otherwise the generator is seeded from the OS.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct Shuffler {
    rng: Pcg64Mcg,
}

impl Shuffler {
    pub fn from_seed(seed: u64) -> Self {
        Shuffler { rng: Pcg64Mcg::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Shuffler { rng: Pcg64Mcg::from_entropy() }
    }

    /// `Some(seed)` → deterministic, `None` → entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::from_seed(s),
            None => Self::from_entropy(),
        }
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        if items.len() <= 1 {
            return;
        }
        for i in (1..items.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            items.swap(i, j);
        }
    }

    /// A shuffled copy; the input is left untouched.
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        self.shuffle(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn shuffle_is_permutation() {
        let mut sh = Shuffler::from_seed(7);
        let input: Vec<u32> = (0..7).collect();
        for _ in 0..50 {
            let out = sh.shuffled(&input);
            assert_eq!(sorted(out), input);
        }
    }

    #[test]
    fn shuffle_keeps_duplicates() {
        let mut sh = Shuffler::from_seed(3);
        let input = vec![1, 1, 2, 2, 2, 3];
        let out = sh.shuffled(&input);
        assert_eq!(sorted(out), input);
    }

    #[test]
    fn same_seed_same_sequence() {
        let input: Vec<u32> = (0..6).collect();
        let mut a = Shuffler::from_seed(99);
        let mut b = Shuffler::from_seed(99);
        for _ in 0..10 {
            assert_eq!(a.shuffled(&input), b.shuffled(&input));
        }
    }

    #[test]
    fn tiny_inputs_unchanged() {
        let mut sh = Shuffler::from_seed(1);
        let mut empty: Vec<u32> = vec![];
        sh.shuffle(&mut empty);
        assert!(empty.is_empty());
        let mut one = vec![5];
        sh.shuffle(&mut one);
        assert_eq!(one, vec![5]);
    }

    #[test]
    fn every_permutation_reachable() {
        // 3 elements → 6 orders, each should show up with roughly 1/6 frequency
        let mut sh = Shuffler::from_seed(2024);
        let input = [0u32, 1, 2];
        let mut counts = std::collections::HashMap::new();
        let trials = 6000;
        for _ in 0..trials {
            *counts.entry(sh.shuffled(&input)).or_insert(0u32) += 1;
        }
        assert_eq!(counts.len(), 6);
        for &c in counts.values() {
            assert!(c > 800 && c < 1200, "skewed count {c}");
        }
    }
}
