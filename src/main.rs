//! Benchmark kernel with the reference configuration baked in.
//!
//! Takes no arguments and reads no input: it generates the data array and
//! the lookup table, resolves a chain from every starting position, and
//! prints the resulting rise count. Timing is left to external tools (or
//! use the `sweep` example for instrumented runs).

use memchase::{BenchConfig, LookupTable, identity_sequence, traverse_all};

const ARRAY_SIZE: usize = 8196;
const INDIRECTION_LEVEL: usize = 512;
const CACHE_OPTIMIZED: bool = false;
const ENABLE_BRANCH: bool = false;
const SUMMATION_LEVEL: usize = 0;

fn main() {
    let config = BenchConfig {
        array_size: ARRAY_SIZE,
        indirection_level: INDIRECTION_LEVEL,
        cache_optimized: CACHE_OPTIMIZED,
        enable_branch: ENABLE_BRANCH,
        summation_level: SUMMATION_LEVEL,
        seed: None,
    };
    let data = identity_sequence(config.array_size).expect("data array allocation failed");
    let table = LookupTable::generate(&config).expect("lookup table allocation failed");
    let count = traverse_all(&data, &table, &config);
    println!("{count}");
}
