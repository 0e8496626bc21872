//! Sweeps the pointer chase across table sizes and the access-pattern
//! switches, reporting counters per chain resolution.
//!
//! Shuffled rows show the latency of wherever each table size lands in
//! the memory hierarchy; linear rows show the same work with a
//! prefetch-friendly pattern; branch rows add the data-dependent
//! comparison that stresses the branch predictor.

use memchase::{
    BenchConfig, LookupTable, bench_labels, from_env, identity_sequence, traverse_all,
};
use std::hint::black_box;

bench_labels! {
    struct Labels {
        mode: &'static str,
        size: String,
        depth: String,
    }
}

fn measure(config: &BenchConfig, mode: &'static str, bench: &mut memchase::Bench<Labels>) {
    let data = identity_sequence(config.array_size).expect("data array allocation failed");
    let table = LookupTable::generate(config).expect("lookup table allocation failed");
    let count = bench
        .run(|| traverse_all(&data, &table, config))
        .record(
            config.array_size,
            Labels {
                mode,
                size: config.array_size.to_string(),
                depth: config.indirection_level.to_string(),
            },
        );
    black_box(count);
}

fn main() {
    let mut bench = from_env();
    for size_exp in 10..17 {
        let base = BenchConfig {
            array_size: 1 << size_exp,
            indirection_level: 512,
            seed: Some(0xC0FFEE),
            ..BenchConfig::reference()
        };
        measure(
            &BenchConfig {
                cache_optimized: true,
                ..base.clone()
            },
            "linear",
            &mut bench,
        );
        measure(&base, "shuffled", &mut bench);
        measure(
            &BenchConfig {
                enable_branch: true,
                ..base.clone()
            },
            "shuffled+branch",
            &mut bench,
        );
        measure(
            &BenchConfig {
                summation_level: 8,
                ..base
            },
            "shuffled+scan",
            &mut bench,
        );
    }
}
