//! Seedable pseudo-random number generator (xorshift64) with an unbiased shuffle.

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, fast, no-std compatible.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform integer in [0, upper_bound). Rejection sampling removes modulo bias.
    pub fn below(&mut self, upper_bound: u64) -> u64 {
        debug_assert!(upper_bound > 0);
        let zone = u64::MAX - (u64::MAX % upper_bound);
        loop {
            let x = self.next_u64();
            if x < zone {
                return x % upper_bound;
            }
        }
    }

    /// Fisher–Yates shuffle: every permutation equally likely.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_deterministic() {
        let mut rng1 = Rng::new(42);
        let mut rng2 = Rng::new(42);
        for _ in 0..10 {
            assert_eq!(rng1.below(1000), rng2.below(1000));
        }
    }

    #[test]
    fn rng_zero_seed_handled() {
        let mut rng = Rng::new(0);
        let _ = rng.below(100);
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = Rng::new(7);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_reaches_every_permutation_of_three() {
        let mut rng = Rng::new(99);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..6000 {
            let mut items = ['a', 'b', 'c'];
            rng.shuffle(&mut items);
            *counts.entry(items).or_insert(0u32) += 1;
        }
        assert_eq!(counts.len(), 6);
        for (perm, n) in counts {
            assert!((700..1300).contains(&n), "{:?} drawn {} times", perm, n);
        }
    }
}
