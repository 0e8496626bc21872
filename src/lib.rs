//! Memory hierarchy latency benchmark built around a multi-level pointer
//! chase.
//!
//! The kernel generates a data array and a stack of independent
//! permutations (the lookup table), then resolves a chain of dependent
//! lookups from every starting position. Each load's address comes from
//! the previous load's value, so a chain is a strict sequence of
//! latency-bound memory accesses. Shuffling the table defeats the
//! prefetcher; leaving it linear makes the same work prefetch-friendly.
//! An optional per-iteration branch and an optional linear scan at chain
//! end isolate branch-prediction and bandwidth effects.
//!
//! [`Bench`] wraps a traversal with performance counters and reports
//! labeled measurements in a live table, markdown, or CSV:
//!
//! ```no_run
//! use memchase::{BenchConfig, LookupTable, bench_labels, from_env, identity_sequence, traverse_all};
//!
//! bench_labels! {
//!     struct Labels {
//!         mode: &'static str,
//!     }
//! }
//!
//! let config = BenchConfig::reference();
//! let data = identity_sequence(config.array_size).unwrap();
//! let table = LookupTable::generate(&config).unwrap();
//! let mut bench = from_env::<Labels>();
//! let count = bench
//!     .run(|| traverse_all(&data, &table, &config))
//!     .record(config.array_size, Labels { mode: "shuffled" });
//! assert_eq!(count, 0);
//! ```

mod config;
mod labels;
mod table;
mod walk;

pub mod counters;
pub mod report;

pub use config::BenchConfig;
pub use labels::Labels;
pub use table::{LookupTable, identity_sequence, shuffle_in_place};
pub use walk::{resolve, traverse_all};

use counters::{Counters, counters_from_env};
use report::{Format, format_from_env};
use std::{marker::PhantomData, time::SystemTime};

/// Builds a [`Bench`] with the default counter backend and the output
/// format selected by `MEMCHASE_FORMAT`.
pub fn from_env<L: Labels>() -> Bench<L> {
    Bench::new(counters_from_env(), format_from_env())
}

/// Runs closures with performance counters enabled and records labeled
/// measurements.
///
/// Buffered output formats print when the `Bench` is dropped.
pub struct Bench<L> {
    counters: Box<dyn Counters>,
    format: Box<dyn Format>,
    label_names: &'static [&'static str],
    _p: PhantomData<L>,
}

impl<L: Labels> Default for Bench<L> {
    fn default() -> Self {
        from_env()
    }
}

impl<L: Labels> Bench<L> {
    pub fn new(counters: Box<dyn Counters>, format: Box<dyn Format>) -> Self {
        Bench {
            counters,
            format,
            label_names: L::names(),
            _p: PhantomData,
        }
    }

    /// Runs `f` with counters enabled. The measurement is not reported
    /// until [`record`](Measured::record) is called on the return value.
    pub fn run<R>(&mut self, f: impl FnOnce() -> R) -> Measured<'_, L, R> {
        let start_time = SystemTime::now();
        self.counters.reset();
        self.counters.enable();
        let ret = f();
        self.counters.disable();
        Measured {
            bench: self,
            start_time,
            ret,
        }
    }
}

/// A finished measurement waiting to be labeled and recorded.
pub struct Measured<'a, L, R> {
    bench: &'a mut Bench<L>,
    start_time: SystemTime,
    ret: R,
}

impl<L: Labels, R> Measured<'_, L, R> {
    /// Attaches labels and pushes the measurement to the output format.
    ///
    /// `scale` is the number of kernel operations the closure performed
    /// (e.g. chain resolutions); scalable counters are reported per
    /// operation. Returns the closure's return value.
    pub fn record(self, scale: usize, labels: L) -> R {
        let bench = self.bench;
        if let Err(err) = bench.format.push(
            scale,
            self.start_time,
            &mut *bench.counters,
            &mut |dst| labels.values(dst),
            bench.label_names,
        ) {
            eprintln!("error recording measurement: {err}");
        }
        self.ret
    }
}

impl<L> Drop for Bench<L> {
    fn drop(&mut self) {
        if let Err(err) = self
            .format
            .dump_and_reset(self.label_names, &mut *self.counters)
        {
            eprintln!("error writing report: {err}");
        }
    }
}
