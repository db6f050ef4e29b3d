//! The `FormationExec` tick loop.

use std::sync::Arc;

use fc_core::{AgentId, GroupId, SimClock, Tick, TickStatus};
use fc_formation::{FormationEngine, MemberConfig};
use fc_nav::{Motion, PathFollower};
use fc_shape::SlotShape;

use crate::trace::TraceRow;
use crate::ExecObserver;

// ── ExecConfig ────────────────────────────────────────────────────────────────

/// Executor configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate.
#[derive(Clone, Debug)]
pub struct ExecConfig {
    /// Milliseconds per simulation tick.  Default: 50 (20 Hz).
    pub tick_duration_ms: u32,

    /// Emit an observer snapshot every N ticks; 0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms: 50,
            snapshot_interval_ticks: 0,
        }
    }
}

// ── FormationExec ─────────────────────────────────────────────────────────────

/// Drives formation members the way the host task-executor contract
/// describes: `spawn` is `onStart`, [`tick`][Self::tick] calls every active
/// member's per-tick hook, `release` is `onEnd`.
///
/// Each tick:
///
/// 1. integrate every follower's motion,
/// 2. run every active member's controller in ascending `AgentId` order
///    (strictly serialized — see the coordination core's concurrency notes),
/// 3. record each member's latest [`TickStatus`],
/// 4. fire observer hooks (and a snapshot at the configured interval).
///
/// Members whose join fails at spawn time are *disabled*: the error is
/// logged once and the member reports `Failed` on every subsequent tick
/// without ever touching the engine again.
pub struct FormationExec<F: PathFollower + Motion> {
    pub config: ExecConfig,
    pub clock: SimClock,
    pub engine: FormationEngine,
    pub followers: Vec<F>,
    statuses: Vec<TickStatus>,
    active: Vec<bool>,
}

impl<F: PathFollower + Motion> FormationExec<F> {
    pub fn new(config: ExecConfig) -> Self {
        let clock = SimClock::new(config.tick_duration_ms);
        Self {
            config,
            clock,
            engine: FormationEngine::new(),
            followers: Vec::new(),
            statuses: Vec::new(),
            active: Vec::new(),
        }
    }

    pub fn agent_count(&self) -> usize {
        self.followers.len()
    }

    /// The member's most recent tick result (`Failed` for unknown agents).
    pub fn status(&self, agent: AgentId) -> TickStatus {
        self.statuses
            .get(agent.index())
            .copied()
            .unwrap_or(TickStatus::Failed)
    }

    pub fn is_active(&self, agent: AgentId) -> bool {
        self.active.get(agent.index()).copied().unwrap_or(false)
    }

    // ── Lifecycle hooks ───────────────────────────────────────────────────

    /// `onStart`: adopt `follower` and join `group`.
    ///
    /// A configuration error (invalid config, closed group) is logged once
    /// and disables the member: it reports `Failed` on every tick from now
    /// on, per the error-handling contract.
    pub fn spawn(
        &mut self,
        follower: F,
        group: GroupId,
        config: MemberConfig,
        shape: Arc<dyn SlotShape>,
    ) -> AgentId {
        let agent = AgentId(self.followers.len() as u32);
        self.followers.push(follower);
        self.statuses.push(TickStatus::Running);
        self.active.push(true);

        if let Err(err) = self
            .engine
            .join(group, agent, config, shape, &mut self.followers, &self.clock)
        {
            log::warn!("{agent}: disabled at start: {err}");
            self.active[agent.index()] = false;
            self.statuses[agent.index()] = TickStatus::Failed;
        }
        agent
    }

    /// `onEnd`: release the member from its group (restoring its original
    /// speed) and stop ticking it.  Idempotent.
    pub fn release(&mut self, agent: AgentId) {
        if agent.index() >= self.followers.len() {
            return;
        }
        self.engine.leave(agent, &mut self.followers);
        self.active[agent.index()] = false;
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the simulation by one tick.
    pub fn tick<O: ExecObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let dt = self.clock.dt_secs();
        for follower in &mut self.followers {
            follower.integrate(dt);
        }

        let mut running = 0;
        for i in 0..self.followers.len() {
            if !self.active[i] {
                continue;
            }
            let agent = AgentId(i as u32);
            let status = self.engine.tick(agent, &mut self.followers, &self.clock);
            self.statuses[i] = status;
            if status == TickStatus::Running {
                running += 1;
            }
        }

        observer.on_tick_end(now, running);
        if self.config.snapshot_interval_ticks > 0
            && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
        {
            let rows = self.trace_rows(now);
            observer.on_snapshot(now, &rows);
        }

        self.clock.advance();
    }

    /// Run exactly `n` ticks.
    pub fn run_ticks<O: ExecObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick(observer);
        }
    }

    /// Run until every active member reports a terminal status, or until
    /// `max_ticks` elapse.  Returns `true` when everything settled.
    pub fn run_until_settled<O: ExecObserver>(
        &mut self,
        max_ticks: u64,
        observer: &mut O,
    ) -> bool {
        for _ in 0..max_ticks {
            if self.settled() {
                break;
            }
            self.tick(observer);
        }
        observer.on_end(self.clock.current_tick);
        self.settled()
    }

    /// `true` when no active member is still `Running`.
    pub fn settled(&self) -> bool {
        self.active
            .iter()
            .zip(&self.statuses)
            .all(|(&active, &status)| !active || status.is_terminal())
    }

    // ── Snapshot rows ─────────────────────────────────────────────────────

    fn trace_rows(&self, now: Tick) -> Vec<TraceRow> {
        (0..self.followers.len())
            .filter(|&i| self.active[i])
            .map(|i| {
                let agent = AgentId(i as u32);
                let member = self.engine.member(agent);
                TraceRow {
                    tick: now.0,
                    agent: agent.0,
                    group: member.map(|m| m.group.0).unwrap_or(u32::MAX),
                    slot: member.map(|m| m.slot.0).unwrap_or(u16::MAX),
                    position: self.followers[i].position(),
                    state: member.and_then(|m| self.engine.group(m.group)).map(|g| g.state),
                    status: self.statuses[i],
                }
            })
            .collect()
    }
}
