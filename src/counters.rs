#[cfg(target_os = "linux")]
mod perf_backend;
mod time_backend;

#[cfg(target_os = "linux")]
pub use perf_backend::PerfBackend;
pub use time_backend::TimeBackend;

/// A set of named performance counters recorded around a traversal.
///
/// A backend supports enabling, disabling, resetting, and reading its
/// counters. The backend used by a default [`Bench`](crate::Bench) is
/// built by [`counters_from_env`].
pub trait Counters {
    /// Enable counters.
    fn enable(&mut self);
    /// Disable counters.
    fn disable(&mut self);
    /// Reset counters to zero.
    fn reset(&mut self);
    /// Read all counters and append the readings to `dst`.
    fn read(&mut self, dst: &mut Vec<CounterReading>);
    /// Appends the counter names to `dst`.
    ///
    /// Names must be appended in the same order as the values appended by
    /// [`read`](Self::read).
    fn names(&self, dst: &mut dyn FnMut(&str));
}

impl Counters for Box<dyn Counters> {
    fn enable(&mut self) {
        (**self).enable();
    }

    fn disable(&mut self) {
        (**self).disable();
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn read(&mut self, dst: &mut Vec<CounterReading>) {
        (**self).read(dst);
    }

    fn names(&self, dst: &mut dyn FnMut(&str)) {
        (**self).names(dst);
    }
}

impl<A: Counters, B: Counters> Counters for (A, B) {
    /// Enables A, then B
    fn enable(&mut self) {
        self.0.enable();
        self.1.enable();
    }

    /// Disables B, then A (reverse starting order)
    fn disable(&mut self) {
        self.1.disable();
        self.0.disable();
    }

    fn reset(&mut self) {
        self.0.reset();
        self.1.reset();
    }

    fn read(&mut self, dst: &mut Vec<CounterReading>) {
        self.0.read(dst);
        self.1.read(dst);
    }

    fn names(&self, dst: &mut dyn FnMut(&str)) {
        self.0.names(dst);
        self.1.names(dst);
    }
}

/// Constructs the default counter backend.
///
/// On Linux this is wall-clock time plus the hardware counters most
/// relevant to a latency-bound pointer chase (cycles, instructions, cache
/// and TLB misses, branch misses); elsewhere it is wall-clock time only.
/// The perf event set can be overridden via `MEMCHASE_EVENTS`.
pub fn counters_from_env() -> Box<dyn Counters> {
    #[cfg(target_os = "linux")]
    return Box::new((TimeBackend::new(), PerfBackend::from_env()));
    #[cfg(not(target_os = "linux"))]
    return Box::new(TimeBackend::new());
}

/// A reading of a single performance counter.
pub struct CounterReading {
    /// The value to report to the user.
    pub value: f64,
    /// If `true`, the counter was multiplexed by the kernel and the
    /// reading is an extrapolation. Output formats include a warning.
    pub multiplexed: bool,
    /// If `true`, the reading is divided by the `scale` parameter of the
    /// measurement, turning totals into per-resolution values.
    pub enable_scale: bool,
}

impl CounterReading {
    pub(crate) fn scaled_value(&self, scale: usize) -> f64 {
        if self.enable_scale {
            self.value / scale as f64
        } else {
            self.value
        }
    }
}

pub(crate) fn count_counters(counters: &dyn Counters) -> usize {
    let mut num_counters = 0;
    counters.names(&mut |_| {
        num_counters += 1;
    });
    num_counters
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Counters for Recorder {
        fn enable(&mut self) {
            self.log.borrow_mut().push(format!("enable {}", self.name));
        }
        fn disable(&mut self) {
            self.log.borrow_mut().push(format!("disable {}", self.name));
        }
        fn reset(&mut self) {}
        fn read(&mut self, dst: &mut Vec<CounterReading>) {
            dst.push(CounterReading {
                value: 10.0,
                multiplexed: false,
                enable_scale: true,
            });
        }
        fn names(&self, dst: &mut dyn FnMut(&str)) {
            dst(self.name);
        }
    }

    #[test]
    fn pairs_disable_in_reverse_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pair = (
            Recorder {
                name: "a",
                log: log.clone(),
            },
            Recorder {
                name: "b",
                log: log.clone(),
            },
        );
        pair.enable();
        pair.disable();
        assert_eq!(
            *log.borrow(),
            vec!["enable a", "enable b", "disable b", "disable a"]
        );
        assert_eq!(count_counters(&pair), 2);
    }

    #[test]
    fn scale_only_applies_when_enabled() {
        let scaled = CounterReading {
            value: 8.0,
            multiplexed: false,
            enable_scale: true,
        };
        let raw = CounterReading {
            value: 8.0,
            multiplexed: false,
            enable_scale: false,
        };
        assert_eq!(scaled.scaled_value(4), 2.0);
        assert_eq!(raw.scaled_value(4), 8.0);
    }
}
