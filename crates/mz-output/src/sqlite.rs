//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `decisions`, `releases` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::{DecisionRow, OutputResult, ReleaseRow, TickSummaryRow};
use crate::writer::OutputWriter;

/// Writes lock events to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS decisions (
                 tick     INTEGER NOT NULL,
                 world    INTEGER NOT NULL,
                 grp      INTEGER NOT NULL,
                 region   INTEGER NOT NULL,
                 distance REAL    NOT NULL,
                 entry_x  INTEGER NOT NULL,
                 entry_y  INTEGER NOT NULL,
                 entry_z  INTEGER NOT NULL,
                 result   TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS releases (
                 tick   INTEGER NOT NULL,
                 world  INTEGER NOT NULL,
                 slot   INTEGER NOT NULL,
                 grp    INTEGER NOT NULL,
                 reason TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick     INTEGER PRIMARY KEY,
                 moving   INTEGER NOT NULL,
                 granted  INTEGER NOT NULL,
                 denied   INTEGER NOT NULL,
                 released INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO decisions \
                 (tick, world, grp, region, distance, entry_x, entry_y, entry_z, result) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.world,
                    row.group,
                    row.region,
                    row.distance,
                    row.entry.0,
                    row.entry.1,
                    row.entry.2,
                    row.result,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_releases(&mut self, rows: &[ReleaseRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO releases (tick, world, slot, grp, reason) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.tick, row.world, row.slot, row.group, row.reason])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, moving, granted, denied, released) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![row.tick, row.moving, row.granted, row.denied, row.released],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
