use super::{Format, SiFloat};
use crate::counters::{CounterReading, Counters, count_counters};
use std::{
    env,
    error::Error,
    io::{self, StdoutLock, Write, stdout},
    iter,
};

/// Prints a box-drawn table one row at a time, as measurements complete.
///
/// This is the default format: a long sweep shows its results while it is
/// still running. When a row holds more columns than fit in the terminal,
/// it wraps onto continuation lines. The line width is taken from the
/// terminal, overridable via `MEMCHASE_LINE_LEN`.
pub struct Live {
    inner: Option<Inner>,
}

struct Inner {
    table: StreamingTable,
    reading_buffer: Vec<CounterReading>,
}

impl Default for Live {
    fn default() -> Self {
        Self::new()
    }
}

impl Live {
    pub fn new() -> Self {
        Live { inner: None }
    }

    fn line_len() -> usize {
        env::var("MEMCHASE_LINE_LEN")
            .ok()
            .and_then(|x| {
                x.parse()
                    .map_err(|_| {
                        eprintln!("failed to parse line len: {x:?}");
                    })
                    .ok()
            })
            .or_else(|| terminal_size::terminal_size().map(|x| x.0.0 as usize))
            .unwrap_or(160)
    }
}

impl Format for Live {
    fn push(
        &mut self,
        scale: usize,
        _start_time: std::time::SystemTime,
        counters: &mut dyn Counters,
        labels: &mut dyn FnMut(&mut dyn FnMut(&str)),
        label_names: &'static [&'static str],
    ) -> Result<(), Box<dyn Error>> {
        let mut err = Ok(());
        let this = self.inner.get_or_insert_with(|| {
            let num_counters = count_counters(counters);
            let mut table = StreamingTable::new(
                label_names.len() + 1 + num_counters,
                9,
                Self::line_len(),
            );
            let push = &mut |x: &str| {
                if err.is_ok() {
                    err = table.push(x.to_string());
                }
            };
            for name in label_names {
                push(name);
            }
            push("scale");
            counters.names(push);
            Inner {
                table,
                reading_buffer: Vec::with_capacity(num_counters),
            }
        });
        let push = &mut |x: &str| {
            if err.is_ok() {
                err = this.table.push(x.to_string());
            }
        };
        labels(push);
        this.reading_buffer.clear();
        counters.read(&mut this.reading_buffer);
        err?;
        this.table.push(SiFloat(scale as f64).to_string())?;
        for reading in &this.reading_buffer {
            this.table
                .push(SiFloat(reading.scaled_value(scale)).to_string())?;
        }
        Ok(())
    }

    fn dump_and_reset(
        &mut self,
        _label_names: &'static [&'static str],
        _counters: &mut dyn Counters,
    ) -> Result<(), Box<dyn Error>> {
        if let Some(this) = &mut self.inner {
            this.table.end_table()?;
        }
        self.inner = None;
        Ok(())
    }
}

/// A table written to stdout cell by cell, without ever buffering more
/// than one output line of cells.
///
/// All cells share a fixed width; content wider than a cell is wrapped
/// onto extra text lines within the row. If a record holds more columns
/// than fit in `line_width`, the record continues on the next line behind
/// a dashed separator.
struct StreamingTable {
    column_count: usize,
    columns_per_line: usize,
    cell_size: usize,
    line: Vec<String>,
    columns_written: usize,
    table_started: bool,
    record_separator: String,
    wrapping_separator: String,
    field_separator: &'static str,
}

impl StreamingTable {
    fn new(column_count: usize, cell_size: usize, line_width: usize) -> Self {
        assert!(column_count > 0);
        assert!(cell_size > 2);
        let columns_per_line = ((line_width.max(cell_size + 2) - 1) / (cell_size + 1)).max(1);
        let mut ret = StreamingTable {
            column_count,
            columns_per_line,
            cell_size,
            line: Vec::new(),
            columns_written: 0,
            table_started: false,
            record_separator: String::new(),
            wrapping_separator: String::new(),
            field_separator: "│",
        };
        if ret.columns_per_line < ret.column_count {
            ret.wrapping_separator = ret.make_separator(&["│", "│", "│"], "-");
        } else {
            ret.columns_per_line = ret.column_count;
        }
        ret.record_separator = ret.make_separator(&["├", "┼", "┤"], "─");
        ret
    }

    fn push(&mut self, x: String) -> io::Result<()> {
        self.line.push(x);
        if self.line.len() == self.columns_per_line
            || self.columns_written + self.line.len() == self.column_count
        {
            let stdout = stdout();
            let mut stdout = stdout.lock();
            if self.columns_written == 0 {
                if !self.table_started {
                    self.table_started = true;
                    writeln!(stdout, "{}", self.make_separator(&["┌", "┬", "┐"], "─"))?;
                } else {
                    writeln!(stdout, "{}", self.record_separator)?;
                }
            } else {
                writeln!(stdout, "{}", self.wrapping_separator)?;
            }
            self.write_content_lines(&mut stdout)?;
            if self.columns_written >= self.column_count {
                self.columns_written = 0;
            }
        }
        Ok(())
    }

    fn write_content_lines(&mut self, stdout: &mut StdoutLock) -> io::Result<()> {
        let cells: Vec<_> = self
            .line
            .iter()
            .map(|s| textwrap::wrap(s, self.cell_size))
            .collect();
        let lines = cells.iter().map(|w| w.len()).max().unwrap_or(1);
        for i in 0..lines {
            write!(stdout, "{}", self.field_separator)?;
            for c in 0..self.columns_per_line {
                let width = self.cell_size;
                let content = cells
                    .get(c)
                    .and_then(|x| x.get(i))
                    .map(|x| x.as_ref())
                    .unwrap_or("");
                write!(stdout, "{content:^width$}")?;
                write!(stdout, "{}", self.field_separator)?;
            }
            writeln!(stdout)?;
        }
        self.columns_written += self.line.len();
        self.line.clear();
        Ok(())
    }

    fn make_separator(&self, crosses: &[&str; 3], line: &str) -> String {
        let mut ret = String::new();
        ret.push_str(crosses[0]);
        ret.extend(iter::repeat_n(line, self.cell_size));
        for _ in 1..self.columns_per_line {
            ret.push_str(crosses[1]);
            ret.extend(iter::repeat_n(line, self.cell_size));
        }
        ret.push_str(crosses[2]);
        ret
    }

    fn end_table(&mut self) -> io::Result<()> {
        writeln!(stdout(), "{}", self.make_separator(&["└", "┴", "┘"], "─"))?;
        self.table_started = false;
        Ok(())
    }
}
