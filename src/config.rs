/// Parameters of one benchmark run.
///
/// The fields mirror the knobs of the measured access pattern: how much
/// memory is touched, how many dependent loads form a chain, whether the
/// access order is prefetch-friendly, and whether a data-dependent branch
/// runs per iteration. A config is built once and never mutated; the
/// generator and the traversal both borrow it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Element count of the data array and of each lookup table level.
    pub array_size: usize,
    /// Depth of the lookup table, i.e. the length of each dependent-load chain.
    pub indirection_level: usize,
    /// `true` leaves every level as the identity permutation (sequential,
    /// prefetch-friendly); `false` shuffles each level independently.
    pub cache_optimized: bool,
    /// Whether the per-iteration rise-counting branch executes at all.
    /// When `false` the branch is compiled out, not merely skipped.
    pub enable_branch: bool,
    /// Number of extra data elements linearly scanned when a chain
    /// terminates. 0 disables the scan. The scan only adds memory traffic;
    /// it never changes the traversal result.
    pub summation_level: usize,
    /// Shuffle seed. `None` seeds from the OS, so shuffled runs differ from
    /// each other; fix a seed to make shuffled runs reproducible.
    pub seed: Option<u64>,
}

impl BenchConfig {
    /// The reference configuration: 8196 elements, 512 levels, shuffled
    /// tables, no branch, no summation scan.
    pub fn reference() -> Self {
        BenchConfig {
            array_size: 8196,
            indirection_level: 512,
            cache_optimized: false,
            enable_branch: false,
            summation_level: 0,
            seed: None,
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::reference()
    }
}
