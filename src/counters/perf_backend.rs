use super::{CounterReading, Counters};
use perf_event::{
    Builder, Counter,
    events::{Cache, CacheId, CacheOp, CacheResult, Hardware, Software},
};

/// A [`Counters`] backend reading hardware counters via `perf_event_open`.
///
/// Note that this crate uses the `perf-event` crate from the `perf-event2`
/// package, not the `perf-event` package.
///
/// Perf counter groups are not used, so the kernel may multiplex the
/// counters and individual counters may not run for the exact same
/// duration. Readings are extrapolated over the enabled time and flagged
/// as multiplexed when that happens.
pub struct PerfBackend {
    counters: Vec<(String, Counter, f64)>,
}

impl PerfBackend {
    /// Creates a backend from the counters listed in `MEMCHASE_EVENTS`, or
    /// the default pointer-chase set if the variable is not defined.
    pub fn from_env() -> Self {
        let events = std::env::var("MEMCHASE_EVENTS");
        let events = events
            .as_deref()
            .unwrap_or("cycle,instr,l1-miss,llc-miss,dtlb-miss,br-miss,t-clock")
            .split(",");
        Self::with_counter_names(events)
    }

    /// Builds a backend from a list of event names.
    ///
    /// These event names are not standard names.
    /// They are aliases for counter configurations defined by this crate,
    /// chosen to fit in the output table without line-wrapping.
    ///
    /// Invalid names and counters that cannot be opened (e.g. due to
    /// permission issues) are skipped with a warning message to stderr.
    pub fn with_counter_names<'a>(counters: impl IntoIterator<Item = &'a str>) -> Self {
        let counters = counters
            .into_iter()
            .filter_map(|name| {
                let mut scale = 1.0;

                // Keep this clean. Users are expected to read this match
                // statement to discover available counter names.
                let mut builder = match name {
                    "cycle" => Builder::new(Hardware::CPU_CYCLES),
                    "instr" => Builder::new(Hardware::INSTRUCTIONS),
                    "l1-miss" => Builder::new(Cache {
                        which: CacheId::L1D,
                        operation: CacheOp::READ,
                        result: CacheResult::MISS,
                    }),
                    "llc-miss" => Builder::new(Hardware::CACHE_MISSES),
                    "dtlb-miss" => Builder::new(Cache {
                        which: CacheId::DTLB,
                        operation: CacheOp::READ,
                        result: CacheResult::MISS,
                    }),
                    "br-miss" => Builder::new(Hardware::BRANCH_MISSES),
                    "t-clock" => {
                        // time is reported by the kernel in nanoseconds, we convert to seconds.
                        scale = 1.0e-9;
                        Builder::new(Software::TASK_CLOCK)
                    }
                    _ => {
                        eprintln!("invalid counter name: {name:?}");
                        return None;
                    }
                };
                builder.inherit(true);
                match builder.build() {
                    Err(e) => {
                        eprintln!("failed to create counter {name:?}: {e}");
                        None
                    }
                    Ok(counter) => Some((name.to_string(), counter, scale)),
                }
            })
            .collect();
        PerfBackend { counters }
    }
}

impl Counters for PerfBackend {
    fn enable(&mut self) {
        for x in &mut self.counters {
            x.1.enable().unwrap();
        }
    }

    fn disable(&mut self) {
        for x in &mut self.counters {
            x.1.disable().unwrap();
        }
    }

    fn reset(&mut self) {
        for x in &mut self.counters {
            x.1.reset().unwrap();
        }
    }

    fn read(&mut self, dst: &mut Vec<CounterReading>) {
        dst.extend(self.counters.iter_mut().map(|(_, counter, scale)| {
            let reading = counter.read_full().unwrap();
            CounterReading {
                value: reading.count() as f64
                    * *scale
                    * reading.time_enabled().unwrap().as_secs_f64()
                    / reading.time_running().unwrap().as_secs_f64(),
                multiplexed: reading.time_enabled() != reading.time_running(),
                enable_scale: true,
            }
        }));
    }

    fn names(&self, dst: &mut dyn FnMut(&str)) {
        for (name, _, _) in &self.counters {
            dst(name);
        }
    }
}
