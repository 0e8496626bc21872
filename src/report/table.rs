use super::Format;
use crate::counters::{CounterReading, Counters};
use std::{error::Error, iter, mem};
use tabled::settings::Style;

struct Record {
    scale: usize,
    labels: Vec<String>,
    counters: Vec<CounterReading>,
}

/// Buffers all measurements and prints one markdown table at the end.
pub struct Table {
    records: Vec<Record>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        Table {
            records: Vec::new(),
        }
    }
}

impl Format for Table {
    fn push(
        &mut self,
        scale: usize,
        _start_time: std::time::SystemTime,
        counters: &mut dyn Counters,
        labels: &mut dyn FnMut(&mut dyn FnMut(&str)),
        _label_names: &'static [&'static str],
    ) -> Result<(), Box<dyn Error>> {
        let mut label_vec = Vec::new();
        labels(&mut |l: &str| label_vec.push(l.to_string()));
        self.records.push(Record {
            scale,
            labels: label_vec,
            counters: {
                let mut dst = Vec::new();
                counters.read(&mut dst);
                dst
            },
        });
        Ok(())
    }

    fn dump_and_reset(
        &mut self,
        label_names: &'static [&'static str],
        counters: &mut dyn Counters,
    ) -> Result<(), Box<dyn Error>> {
        let mut table = tabled::builder::Builder::new();
        table.push_record(label_names.iter().copied());
        for record in &mut self.records {
            table.push_record(mem::take(&mut record.labels));
        }
        let any_multiplexed = self
            .records
            .iter()
            .flat_map(|x| &x.counters)
            .any(|x| x.multiplexed);
        let mut name_i = 0;
        counters.names(&mut |name| {
            let readings = || {
                self.records
                    .iter()
                    .map(|x| x.counters[name_i].scaled_value(x.scale))
            };
            table.push_column(
                iter::once(name.to_string()).chain(readings().map(|x| format!("{x:3.3}"))),
            );
            name_i += 1;
        });
        let multiplex_warning = if any_multiplexed {
            "⚠️ Some counters were multiplexed.\n"
        } else {
            "\n"
        };
        let mut table = table.build();
        table.with(Style::markdown());
        println!("{multiplex_warning}{table}");
        self.records.clear();
        Ok(())
    }
}
