//! CSV trace output.
//!
//! `CsvTrace` bridges [`ExecObserver`] to a `csv::Writer`: one row per
//! active member per snapshot.  Errors from the writer are stored internally
//! because observer hooks have no return value — check with
//! [`take_error`][CsvTrace::take_error] after the run.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use fc_core::{GroupState, Tick, TickStatus, Vec3};

use crate::{ExecObserver, SimError, SimResult};

/// A snapshot of one member at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub tick: u64,
    pub agent: u32,
    /// `u32::MAX` when the agent is not (or no longer) a member.
    pub group: u32,
    /// `u16::MAX` while no slot is assigned.
    pub slot: u16,
    pub position: Vec3,
    /// The group's state, if the agent still belongs to a live group.
    pub state: Option<GroupState>,
    pub status: TickStatus,
}

/// Writes member snapshots to a single CSV file.
pub struct CsvTrace {
    writer: Writer<File>,
    last_error: Option<SimError>,
    finished: bool,
}

impl CsvTrace {
    /// Open (or create) the trace file at `path` and write the header row.
    pub fn new(path: &Path) -> SimResult<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record([
            "tick", "agent", "group", "slot", "x", "y", "z", "state", "status",
        ])?;
        Ok(Self {
            writer,
            last_error: None,
            finished: false,
        })
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush the underlying file.  Idempotent — safe to call more than once.
    pub fn finish(&mut self) -> SimResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }

    fn write_rows(&mut self, rows: &[TraceRow]) -> SimResult<()> {
        for row in rows {
            self.writer.write_record(&[
                row.tick.to_string(),
                row.agent.to_string(),
                row.group.to_string(),
                row.slot.to_string(),
                format!("{:.3}", row.position.x),
                format!("{:.3}", row.position.y),
                format!("{:.3}", row.position.z),
                row.state.map(|s| s.to_string()).unwrap_or_default(),
                row.status.to_string(),
            ])?;
        }
        Ok(())
    }

    fn store_err(&mut self, result: SimResult<()>) {
        if let Err(err) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(err);
            }
        }
    }
}

impl ExecObserver for CsvTrace {
    fn on_snapshot(&mut self, _tick: Tick, rows: &[TraceRow]) {
        let result = self.write_rows(rows);
        self.store_err(result);
    }

    fn on_end(&mut self, _final_tick: Tick) {
        let result = self.finish();
        self.store_err(result);
    }
}
