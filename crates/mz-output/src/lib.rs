//! `mz-output` — lock-event output writers for the mutex-zone workspace.
//!
//! Two backends are provided, the second behind a Cargo feature:
//!
//! | Feature   | Backend | Files created                                          |
//! |-----------|---------|--------------------------------------------------------|
//! | *(none)*  | CSV     | `decisions.csv`, `releases.csv`, `tick_summaries.csv`  |
//! | `sqlite`  | SQLite  | `output.db`                                            |
//!
//! Both implement [`OutputWriter`] and are driven by [`EventLogObserver`],
//! which implements `mz_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mz_output::{CsvWriter, EventLogObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = EventLogObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::EventLogObserver;
pub use row::{DecisionRow, ReleaseRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
