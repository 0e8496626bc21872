mod csv;
mod live;
mod si_float;
mod table;

pub use csv::Csv;
pub use live::Live;
pub use si_float::SiFloat;
pub use table::Table;

use crate::counters::Counters;
use std::error::Error;

/// An output sink for measurement records.
///
/// [`push`](Format::push) is called once per recorded measurement with the
/// counters already disabled; [`dump_and_reset`](Format::dump_and_reset)
/// is called when the benchmark harness is dropped. Buffering formats emit
/// their output in the latter, streaming formats in the former.
pub trait Format {
    fn push(
        &mut self,
        scale: usize,
        start_time: std::time::SystemTime,
        counters: &mut dyn Counters,
        labels: &mut dyn FnMut(&mut dyn FnMut(&str)),
        label_names: &'static [&'static str],
    ) -> Result<(), Box<dyn Error>>;

    fn dump_and_reset(
        &mut self,
        label_names: &'static [&'static str],
        counters: &mut dyn Counters,
    ) -> Result<(), Box<dyn Error>>;
}

impl Format for Box<dyn Format> {
    fn push(
        &mut self,
        scale: usize,
        start_time: std::time::SystemTime,
        counters: &mut dyn Counters,
        labels: &mut dyn FnMut(&mut dyn FnMut(&str)),
        label_names: &'static [&'static str],
    ) -> Result<(), Box<dyn Error>> {
        (**self).push(scale, start_time, counters, labels, label_names)
    }

    fn dump_and_reset(
        &mut self,
        label_names: &'static [&'static str],
        counters: &mut dyn Counters,
    ) -> Result<(), Box<dyn Error>> {
        (**self).dump_and_reset(label_names, counters)
    }
}

/// Selects the output format from `MEMCHASE_FORMAT`.
///
/// Supported values are `csv` and `md`; anything else falls back to the
/// live streaming table with a warning.
pub fn format_from_env() -> Box<dyn Format> {
    match std::env::var("MEMCHASE_FORMAT").as_deref() {
        Ok("csv") => Box::new(Csv::new()),
        Ok("md") => Box::new(Table::new()),
        x => {
            if let Ok(requested) = x {
                eprintln!(
                    "unrecognized value for MEMCHASE_FORMAT: {requested:?}.\nSupported values: csv, md"
                );
            }
            Box::new(Live::new())
        }
    }
}
