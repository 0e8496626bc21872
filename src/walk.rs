use crate::config::BenchConfig;
use crate::table::LookupTable;
use std::hint::black_box;

/// Resolves one chain: descends through every table level from the deepest
/// to level 0 and returns the data element the chain terminates on.
///
/// Each lookup's address depends on the value loaded by the previous
/// lookup, so the loads form a strict dependency chain the CPU can neither
/// reorder nor prefetch across. One resolution therefore costs roughly
/// `depth` times the access latency of wherever the table lives in the
/// memory hierarchy.
///
/// A nonzero `summation_level` additionally scans up to that many
/// consecutive data elements at the chain end (clamped to the array
/// bound). The sum is discarded through [`black_box`]; it exists to add
/// memory reads per resolution, never to change the result.
pub fn resolve(data: &[u32], table: &LookupTable, start: usize, summation_level: usize) -> u32 {
    let mut index = start;
    for level in (0..table.depth()).rev() {
        index = table.level(level)[index] as usize;
    }
    if summation_level > 0 {
        let mut sum = 0u32;
        for &v in data[index..].iter().take(summation_level) {
            sum = sum.wrapping_add(v);
        }
        black_box(sum);
    }
    data[index]
}

/// Resolves a chain from every starting position in order and returns the
/// number of strict rises of the resolved value over its predecessor.
///
/// The comparison only exists when `config.enable_branch` is set; with it
/// unset the branch is monomorphized away rather than skipped at runtime,
/// because its mere presence is what the branch-prediction study varies.
/// With it unset the result is always 0.
pub fn traverse_all(data: &[u32], table: &LookupTable, config: &BenchConfig) -> u32 {
    if config.enable_branch {
        walk::<true>(data, table, config.summation_level)
    } else {
        walk::<false>(data, table, config.summation_level)
    }
}

fn walk<const COUNT_RISES: bool>(data: &[u32], table: &LookupTable, summation_level: usize) -> u32 {
    let mut prev = 0u32;
    let mut count = 0u32;
    for start in 0..data.len() {
        let value = resolve(data, table, start, summation_level);
        if COUNT_RISES && prev < value {
            count += 1;
        }
        prev = value;
    }
    count
}
