//! Executor observer trait for progress reporting and data collection.

use fc_core::Tick;

use crate::trace::TraceRow;

/// Callbacks invoked by [`FormationExec::tick`][crate::FormationExec::tick]
/// at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl ExecObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, running: usize) {
///         if tick.0 % 20 == 0 {
///             println!("{tick}: {running} members still running");
///         }
///     }
/// }
/// ```
pub trait ExecObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `running` is the number of active members that reported `Running`
    /// this tick.
    fn on_tick_end(&mut self, _tick: Tick, _running: usize) {}

    /// Called at snapshot intervals (every `snapshot_interval_ticks`) with
    /// one row per active member, so output writers can record positions
    /// without knowing any output format.
    fn on_snapshot(&mut self, _tick: Tick, _rows: &[TraceRow]) {}

    /// Called once when the executor finishes a
    /// [`run_until_settled`][crate::FormationExec::run_until_settled] run.
    fn on_end(&mut self, _final_tick: Tick) {}
}

/// An [`ExecObserver`] that does nothing.  Use when you need to call the
/// tick loop but don't want callbacks.
pub struct NoopObserver;

impl ExecObserver for NoopObserver {}
