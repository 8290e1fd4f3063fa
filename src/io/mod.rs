use std::io::{BufWriter, Write};

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::harness::ReportRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// mean and stdev for every column
    #[default]
    MeanStdev,
    /// mean only
    MeanOnly,
}

/// Writes report rows as delimiter-separated lines.
///
/// Consumers address fields by position: label, size, then one or two fields per
/// timed column. Every field is followed by the delimiter, the last one included,
/// and no header is written.
pub struct ReportWriter<W: Write> {
    writer: BufWriter<W>,
    delimiter: String,
    mode: ReportMode,
    rows_written: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(inner: W, delimiter: impl Into<String>, mode: ReportMode) -> Self {
        Self {
            writer: BufWriter::with_capacity(64 * 1024, inner),
            delimiter: delimiter.into(),
            mode,
            rows_written: 0,
        }
    }

    pub fn format_row(&self, row: &ReportRow) -> String {
        let d = &self.delimiter;
        let mut line = format!("{}{d}{}{d}", row.label, row.size);

        for column in &row.columns {
            line.push_str(&format!("{}{d}", column.mean));
            if self.mode == ReportMode::MeanStdev {
                line.push_str(&format!("{}{d}", column.stdev));
            }
        }

        line.push('\n');
        line
    }

    /// Rows are flushed immediately so partial results survive an aborted run.
    pub fn write_row(&mut self, row: &ReportRow) -> Result<()> {
        let line = self.format_row(row);
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| err.into_error().into())
    }
}

pub fn create_progress_bar(total_configurations: usize) -> ProgressBar {
    let pb = ProgressBar::new(total_configurations as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} configurations ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
