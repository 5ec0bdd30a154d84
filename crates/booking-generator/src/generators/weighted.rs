//! Categorical value selection.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// A table of `(value, relative weight)` pairs prepared for repeated sampling.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    values: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T: Copy> WeightedTable<T> {
    /// Fails if the table is empty or every weight is zero.
    pub fn new(table: &[(T, u32)]) -> Result<Self, WeightedError> {
        let index = WeightedIndex::new(table.iter().map(|(_, weight)| *weight))?;
        Ok(Self {
            values: table.iter().map(|(value, _)| *value).collect(),
            index,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)]
    }
}

/// Pick a value uniformly from a pool. Duplicates in the pool raise the
/// chance of that value, which the user id pool relies on.
///
/// # Panics
///
/// Panics if `pool` is empty.
pub fn pick_uniform<R: Rng + ?Sized, T: Copy>(rng: &mut R, pool: &[T]) -> T {
    *pool.choose(rng).expect("pool must not be empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_table_only_returns_table_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = WeightedTable::new(&[("a", 1), ("b", 5), ("c", 2)]).unwrap();

        for _ in 0..500 {
            let value = table.sample(&mut rng);
            assert!(["a", "b", "c"].contains(&value));
        }
    }

    #[test]
    fn test_table_skips_zero_weight() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = WeightedTable::new(&[("never", 0), ("always", 3)]).unwrap();

        for _ in 0..200 {
            assert_eq!(table.sample(&mut rng), "always");
        }
    }

    #[test]
    fn test_table_follows_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = WeightedTable::new(&[(0u8, 90), (1u8, 10)]).unwrap();

        let heavy = (0..10_000).filter(|_| table.sample(&mut rng) == 0).count();

        // 90% expected; a wide band keeps this robust to the seed.
        assert!((8_500..=9_500).contains(&heavy), "got {heavy}");
    }

    #[test]
    fn test_invalid_tables_rejected() {
        assert!(WeightedTable::<u8>::new(&[]).is_err());
        assert!(WeightedTable::new(&[(1u8, 0), (2u8, 0)]).is_err());
    }

    #[test]
    fn test_pick_uniform_deterministic() {
        let pool = [10, 20, 30, 40];
        let mut rng1 = StdRng::seed_from_u64(3);
        let mut rng2 = StdRng::seed_from_u64(3);

        let a: Vec<_> = (0..20).map(|_| pick_uniform(&mut rng1, &pool)).collect();
        let b: Vec<_> = (0..20).map(|_| pick_uniform(&mut rng2, &pool)).collect();

        assert_eq!(a, b);
        assert!(a.iter().all(|v| pool.contains(v)));
    }
}
