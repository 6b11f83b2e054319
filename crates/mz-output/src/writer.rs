//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DecisionRow, OutputResult, ReleaseRow, TickSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`EventLogObserver::take_error`][crate::EventLogObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of slot decisions.
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()>;

    /// Write a batch of releases.
    fn write_releases(&mut self, rows: &[ReleaseRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
