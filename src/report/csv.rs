use super::Format;
use crate::counters::{CounterReading, Counters};
use std::{
    error::Error,
    io::{Write, stdout},
    iter,
    time::UNIX_EPOCH,
};

/// Streams machine-readable records to stdout, one row per measurement.
///
/// Columns are the labels, the start time of the measured closure (seconds
/// since the epoch), the scale, one column per counter, and a flag telling
/// whether any counter reading was multiplexed.
pub struct Csv {
    header_written: bool,
    reading_buffer: Vec<CounterReading>,
    writer: csv::Writer<Box<dyn Write>>,
}

impl Default for Csv {
    fn default() -> Self {
        Self::new()
    }
}

impl Csv {
    pub fn new() -> Self {
        Self::from_writer(Box::new(stdout()))
    }

    pub fn from_writer(writer: Box<dyn Write>) -> Self {
        Csv {
            header_written: false,
            reading_buffer: Vec::new(),
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl Format for Csv {
    fn push(
        &mut self,
        scale: usize,
        start_time: std::time::SystemTime,
        counters: &mut dyn Counters,
        labels: &mut dyn FnMut(&mut dyn FnMut(&str)),
        label_names: &'static [&'static str],
    ) -> Result<(), Box<dyn Error>> {
        if !self.header_written {
            self.header_written = true;
            let mut err = Ok(());
            for name in label_names {
                self.writer.write_field(name)?;
            }
            self.writer.write_field("start_time")?;
            self.writer.write_field("scale")?;
            counters.names(&mut |x| {
                if err.is_ok() {
                    err = self.writer.write_field(x)
                }
            });
            err?;
            self.writer.write_field("multiplexed")?;
            self.writer.write_record(iter::empty::<&[u8]>())?;
        }
        let mut err = Ok(());
        labels(&mut |x| {
            if err.is_ok() {
                err = self.writer.write_field(x)
            }
        });
        err?;
        self.writer.write_field(
            start_time
                .duration_since(UNIX_EPOCH)?
                .as_secs_f64()
                .to_string(),
        )?;
        self.writer.write_field(scale.to_string())?;
        self.reading_buffer.clear();
        counters.read(&mut self.reading_buffer);
        let mut any_multiplexed = false;
        for reading in &self.reading_buffer {
            any_multiplexed |= reading.multiplexed;
            self.writer
                .write_field(reading.scaled_value(scale).to_string())?;
        }
        self.writer.write_field(any_multiplexed.to_string())?;
        self.writer.write_record(iter::empty::<&[u8]>())?;
        self.writer.flush()?;
        Ok(())
    }

    fn dump_and_reset(
        &mut self,
        _label_names: &'static [&'static str],
        _counters: &mut dyn Counters,
    ) -> Result<(), Box<dyn Error>> {
        self.header_written = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::SystemTime;

    #[derive(Clone)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct OneCounter;

    impl Counters for OneCounter {
        fn enable(&mut self) {}
        fn disable(&mut self) {}
        fn reset(&mut self) {}
        fn read(&mut self, dst: &mut Vec<CounterReading>) {
            dst.push(CounterReading {
                value: 6.0,
                multiplexed: false,
                enable_scale: true,
            });
        }
        fn names(&self, dst: &mut dyn FnMut(&str)) {
            dst("cycle");
        }
    }

    #[test]
    fn header_then_one_row_per_record() {
        let buf = Shared(Rc::new(RefCell::new(Vec::new())));
        let mut format = Csv::from_writer(Box::new(buf.clone()));
        let mut counters = OneCounter;
        for _ in 0..2 {
            format
                .push(
                    3,
                    SystemTime::UNIX_EPOCH,
                    &mut counters,
                    &mut |dst| dst("shuffled"),
                    &["mode"],
                )
                .unwrap();
        }
        drop(format);
        let out = String::from_utf8(buf.0.borrow().clone()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "mode,start_time,scale,cycle,multiplexed");
        assert_eq!(lines[1], "shuffled,0,3,2,false");
        assert_eq!(lines.len(), 3);
    }
}
