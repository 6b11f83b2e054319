//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `decisions.csv`
//! - `releases.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{DecisionRow, OutputResult, ReleaseRow, TickSummaryRow};
use crate::writer::OutputWriter;

/// Writes lock events to three CSV files.
pub struct CsvWriter {
    decisions: Writer<File>,
    releases:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut decisions = Writer::from_path(dir.join("decisions.csv"))?;
        decisions.write_record(["tick", "world", "group", "region", "distance", "entry_x", "entry_y", "entry_z", "result"])?;

        let mut releases = Writer::from_path(dir.join("releases.csv"))?;
        releases.write_record(["tick", "world", "slot", "group", "reason"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "moving", "granted", "denied", "released"])?;

        Ok(Self { decisions, releases, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        for row in rows {
            self.decisions.write_record(&[
                row.tick.to_string(),
                row.world.to_string(),
                row.group.to_string(),
                row.region.to_string(),
                format!("{:.3}", row.distance),
                row.entry.0.to_string(),
                row.entry.1.to_string(),
                row.entry.2.to_string(),
                row.result.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_releases(&mut self, rows: &[ReleaseRow]) -> OutputResult<()> {
        for row in rows {
            self.releases.write_record(&[
                row.tick.to_string(),
                row.world.to_string(),
                row.slot.to_string(),
                row.group.to_string(),
                row.reason.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.moving.to_string(),
            row.granted.to_string(),
            row.denied.to_string(),
            row.released.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.decisions.flush()?;
        self.releases.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
