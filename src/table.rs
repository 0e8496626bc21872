use crate::config::BenchConfig;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::collections::TryReserveError;

/// Builds `[0, 1, ..., size-1]` as `u32`s.
///
/// This is both the data array (an identity permutation, so the value read
/// at the end of a chain equals the final index) and the starting point of
/// every lookup table level. Allocation is attempted up front; on failure
/// the error is returned before any element is written.
pub fn identity_sequence(size: usize) -> Result<Vec<u32>, TryReserveError> {
    let mut seq = Vec::new();
    seq.try_reserve_exact(size)?;
    seq.extend(0..size as u32);
    Ok(seq)
}

/// Single-pass shuffle: every position is swapped with a position drawn
/// from the full range.
///
/// This is deliberately the naive variant, not an unbiased Fisher-Yates:
/// the swap target is taken modulo the length each iteration, which keeps
/// the modulus bias of `rand() % size`. The bias is part of the access
/// pattern being measured, so it must not be "fixed".
pub fn shuffle_in_place(seq: &mut [u32], rng: &mut impl RngCore) {
    let Ok(len) = u32::try_from(seq.len()) else {
        panic!("sequence too long to shuffle")
    };
    if len == 0 {
        return;
    }
    for i in 0..seq.len() {
        let j = (rng.next_u32() % len) as usize;
        seq.swap(i, j);
    }
}

/// A stack of independent permutations of `[0, array_size)`.
///
/// One chain resolution passes through every level exactly once, from the
/// deepest to level 0, each lookup's index being the previous lookup's
/// value. Every stored value is a valid index into the data array, so a
/// chain can never leave bounds regardless of depth.
pub struct LookupTable {
    levels: Vec<Box<[u32]>>,
}

impl LookupTable {
    /// Generates `config.indirection_level` levels of `config.array_size`
    /// entries each. Every level starts as the identity and, unless
    /// `cache_optimized` is set, is shuffled with its own draws from a
    /// single RNG stream, so levels are uncorrelated with each other.
    pub fn generate(config: &BenchConfig) -> Result<Self, TryReserveError> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        let mut levels = Vec::new();
        levels.try_reserve_exact(config.indirection_level)?;
        for _ in 0..config.indirection_level {
            let mut level = identity_sequence(config.array_size)?;
            if !config.cache_optimized {
                shuffle_in_place(&mut level, &mut rng);
            }
            levels.push(level.into_boxed_slice());
        }
        Ok(LookupTable { levels })
    }

    /// Builds a table from explicit levels, e.g. a handcrafted access
    /// pattern. All levels must have equal length and every entry must be
    /// a valid index into a data array of that length.
    pub fn from_levels(levels: Vec<Vec<u32>>) -> Self {
        let levels: Vec<Box<[u32]>> = levels.into_iter().map(Vec::into_boxed_slice).collect();
        for level in &levels {
            assert_eq!(level.len(), levels[0].len());
            assert!(level.iter().all(|&v| (v as usize) < level.len()));
        }
        LookupTable { levels }
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> &[u32] {
        &self.levels[level]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(array_size: usize, depth: usize, cache_optimized: bool) -> BenchConfig {
        BenchConfig {
            array_size,
            indirection_level: depth,
            cache_optimized,
            seed: Some(42),
            ..BenchConfig::reference()
        }
    }

    #[test]
    fn identity_sequence_counts_up() {
        assert_eq!(identity_sequence(4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(identity_sequence(0).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn every_level_is_a_permutation() {
        for cache_optimized in [false, true] {
            let table = LookupTable::generate(&config(257, 5, cache_optimized)).unwrap();
            assert_eq!(table.depth(), 5);
            for l in 0..table.depth() {
                let mut values: Vec<u32> = table.level(l).to_vec();
                values.sort_unstable();
                assert_eq!(values, identity_sequence(257).unwrap());
            }
        }
    }

    #[test]
    fn linear_mode_is_identity() {
        let table = LookupTable::generate(&config(64, 3, true)).unwrap();
        for l in 0..table.depth() {
            for (i, &v) in table.level(l).iter().enumerate() {
                assert_eq!(v as usize, i);
            }
        }
    }

    #[test]
    fn shuffled_levels_stay_in_bounds() {
        let table = LookupTable::generate(&config(100, 8, false)).unwrap();
        for l in 0..table.depth() {
            assert!(table.level(l).iter().all(|&v| v < 100));
        }
    }

    #[test]
    fn equal_seeds_give_equal_tables() {
        let a = LookupTable::generate(&config(128, 4, false)).unwrap();
        let b = LookupTable::generate(&config(128, 4, false)).unwrap();
        for l in 0..a.depth() {
            assert_eq!(a.level(l), b.level(l));
        }
    }

    #[test]
    fn shuffle_swaps_from_the_full_range() {
        // A constant RNG always swapping with position 0 exercises the
        // full-range draw: position 0 ends up holding the last element.
        struct Zero;
        impl RngCore for Zero {
            fn next_u32(&mut self) -> u32 {
                0
            }
            fn next_u64(&mut self) -> u64 {
                0
            }
            fn fill_bytes(&mut self, dst: &mut [u8]) {
                dst.fill(0);
            }
        }
        let mut seq = identity_sequence(5).unwrap();
        shuffle_in_place(&mut seq, &mut Zero);
        assert_eq!(seq, vec![4, 0, 1, 2, 3]);
    }

    #[test]
    #[should_panic]
    fn from_levels_rejects_out_of_bounds() {
        LookupTable::from_levels(vec![vec![0, 1, 4, 2]]);
    }
}
