use super::{CounterReading, Counters};
use std::time::{Duration, Instant};

/// A counter that records the duration of time it is enabled for.
///
/// The counter is named `time`.
pub struct TimeBackend {
    time: Result<Duration, Instant>,
}

impl Default for TimeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeBackend {
    pub fn new() -> Self {
        Self {
            time: Ok(Duration::ZERO),
        }
    }
}

impl Counters for TimeBackend {
    fn enable(&mut self) {
        let Ok(duration) = self.time else {
            panic!("already enabled")
        };
        self.time = Err(Instant::now() - duration);
    }

    fn disable(&mut self) {
        let Err(start) = self.time else {
            panic!("already disabled")
        };
        self.time = Ok(Instant::now() - start);
    }

    fn reset(&mut self) {
        assert!(self.time.is_ok(), "reset while enabled");
        self.time = Ok(Duration::ZERO)
    }

    fn read(&mut self, dst: &mut Vec<CounterReading>) {
        dst.push(CounterReading {
            value: self.time.expect("read while enabled").as_secs_f64(),
            multiplexed: false,
            enable_scale: false,
        });
    }

    fn names(&self, dst: &mut dyn FnMut(&str)) {
        dst("time");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_only_while_enabled() {
        let mut backend = TimeBackend::new();
        backend.enable();
        std::thread::sleep(Duration::from_millis(5));
        backend.disable();
        let mut readings = Vec::new();
        backend.read(&mut readings);
        assert!(readings[0].value >= 0.005);
        backend.reset();
        readings.clear();
        backend.read(&mut readings);
        assert_eq!(readings[0].value, 0.0);
    }
}
