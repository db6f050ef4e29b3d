//! Integration tests for fc-sim.

use std::sync::Arc;

use fc_core::{AgentId, GroupId, GroupState, Tick, TickStatus, Vec3};
use fc_formation::{MemberConfig, OrientationMode};
use fc_nav::KinematicFollower;
use fc_shape::{Line, SlotShape};

use crate::{CsvTrace, ExecConfig, ExecObserver, FormationExec, NoopObserver};

const GROUP: GroupId = GroupId(1);

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A 2-slot-friendly line that assigns slots strictly in join order.
struct SeqLine;

impl SlotShape for SeqLine {
    fn slot_position(&self, slot: usize, count: usize, center: Vec3, forward: Vec3, _snap: bool) -> Vec3 {
        Line { spacing: 2.0 }.slot_position(slot, count, center, forward, false)
    }

    fn allows_optimal_assignment(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "seq-line"
    }
}

fn test_exec() -> FormationExec<KinematicFollower> {
    FormationExec::new(ExecConfig {
        tick_duration_ms: 50,
        snapshot_interval_ticks: 0,
    })
}

fn follower(position: Vec3) -> KinematicFollower {
    KinematicFollower::new(position, Vec3::Z, 2.0)
}

fn test_config(target: Vec3) -> MemberConfig {
    MemberConfig {
        target,
        orientation: OrientationMode::Explicit { direction: Vec3::Z },
        start_delay_secs: 0.1,
        stuck_duration_secs: 0.2,
        ..MemberConfig::default()
    }
}

fn group_state(exec: &FormationExec<KinematicFollower>) -> GroupState {
    exec.engine.group(GROUP).expect("group exists").state
}

// ── End-to-end scenario ───────────────────────────────────────────────────────

#[cfg(test)]
mod end_to_end {
    use super::*;

    #[test]
    fn two_member_line_reaches_arrived() {
        let mut exec = test_exec();
        let target = Vec3::new(0.0, 0.0, 5.0);
        let cfg = test_config(target);
        let shape: Arc<dyn SlotShape> = Arc::new(SeqLine);

        let a = exec.spawn(follower(Vec3::ZERO), GROUP, cfg, Arc::clone(&shape));
        let b = exec.spawn(follower(Vec3::new(2.0, 0.0, 0.0)), GROUP, cfg, Arc::clone(&shape));
        assert_eq!(group_state(&exec), GroupState::Initialized);

        // The 0.1 s settling delay spans ticks 0 and 1.
        exec.run_ticks(2, &mut NoopObserver);
        assert_eq!(group_state(&exec), GroupState::Initialized);

        // Tick 2 is at t = 0.1 s: the leader assigns slots in join order.
        exec.run_ticks(1, &mut NoopObserver);
        assert_eq!(group_state(&exec), GroupState::MoveToFormation);
        assert_eq!(exec.engine.member(a).unwrap().slot.0, 0);
        assert_eq!(exec.engine.member(b).unwrap().slot.0, 1);

        // Everyone parks and rotates, the group departs, and both members
        // are aimed at the slot pattern around the true target.
        let mut saw_move_to_target = false;
        for _ in 0..200 {
            exec.tick(&mut NoopObserver);
            if group_state(&exec) == GroupState::MoveToTarget {
                saw_move_to_target = true;
                break;
            }
        }
        assert!(saw_move_to_target);
        let direction = exec.engine.group(GROUP).unwrap().direction;
        let expect_a = shape.slot_position(0, 2, target, direction, true);
        let expect_b = shape.slot_position(1, 2, target, direction, true);
        assert_eq!(exec.followers[a.index()].destination, Some(expect_a));
        assert_eq!(exec.followers[b.index()].destination, Some(expect_b));

        // Both followers arrive; the next tick reports success to both.
        assert!(exec.run_until_settled(1_000, &mut NoopObserver));
        assert_eq!(group_state(&exec), GroupState::Arrived);
        assert_eq!(exec.status(a), TickStatus::Succeeded);
        assert_eq!(exec.status(b), TickStatus::Succeeded);
    }

    #[test]
    fn late_joiner_gets_next_slot_and_current_target() {
        let mut exec = test_exec();
        let target = Vec3::new(0.0, 0.0, 8.0);
        let cfg = test_config(target);
        let shape: Arc<dyn SlotShape> = Arc::new(SeqLine);

        let a = exec.spawn(follower(Vec3::ZERO), GROUP, cfg, Arc::clone(&shape));
        let b = exec.spawn(follower(Vec3::new(2.0, 0.0, 0.0)), GROUP, cfg, Arc::clone(&shape));
        for _ in 0..200 {
            exec.tick(&mut NoopObserver);
            if group_state(&exec) == GroupState::MoveToTarget {
                break;
            }
        }
        assert_eq!(group_state(&exec), GroupState::MoveToTarget);
        let a_slot = exec.engine.member(a).unwrap().slot;
        let b_slot = exec.engine.member(b).unwrap().slot;

        let d = exec.spawn(follower(Vec3::new(-2.0, 0.0, 0.0)), GROUP, cfg, Arc::clone(&shape));

        assert_eq!(group_state(&exec), GroupState::MoveToTarget, "no restart");
        assert_eq!(exec.engine.member(d).unwrap().slot.0, 2);
        assert_eq!(exec.engine.member(a).unwrap().slot, a_slot, "a untouched");
        assert_eq!(exec.engine.member(b).unwrap().slot, b_slot, "b untouched");

        let group = exec.engine.group(GROUP).unwrap();
        let expect = shape.slot_position(2, 3, group.target_position, group.direction, true);
        assert_eq!(exec.followers[d.index()].destination, Some(expect));

        assert!(exec.run_until_settled(1_000, &mut NoopObserver));
        assert_eq!(exec.status(d), TickStatus::Succeeded);
    }

    #[test]
    fn stuck_member_broadcasts_failure() {
        let mut exec = test_exec();
        let cfg = test_config(Vec3::new(0.0, 0.0, 8.0));
        let shape: Arc<dyn SlotShape> = Arc::new(SeqLine);

        let a = exec.spawn(follower(Vec3::ZERO), GROUP, cfg, Arc::clone(&shape));
        let b = exec.spawn(follower(Vec3::new(2.0, 0.0, 0.0)), GROUP, cfg, shape);
        for _ in 0..200 {
            exec.tick(&mut NoopObserver);
            if group_state(&exec) == GroupState::MoveToTarget {
                break;
            }
        }

        exec.followers[b.index()].obstructed = true;
        assert!(exec.run_until_settled(200, &mut NoopObserver));
        assert_eq!(group_state(&exec), GroupState::Failure);
        assert_eq!(exec.status(a), TickStatus::Failed);
        assert_eq!(exec.status(b), TickStatus::Failed);
    }
}

// ── Lifecycle hooks ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn invalid_config_disables_the_member() {
        let mut exec = test_exec();
        let bad = MemberConfig {
            out_of_range_delta: 0.1,
            in_range_delta: 0.4, // inverted hysteresis
            ..test_config(Vec3::new(0.0, 0.0, 5.0))
        };
        let a = exec.spawn(follower(Vec3::ZERO), GROUP, bad, Arc::new(SeqLine));

        assert!(!exec.is_active(a));
        assert_eq!(exec.status(a), TickStatus::Failed);
        assert!(exec.engine.member(a).is_none(), "never joined");

        // Stays failed, forever, without touching the engine.
        exec.run_ticks(5, &mut NoopObserver);
        assert_eq!(exec.status(a), TickStatus::Failed);
        assert_eq!(exec.engine.member_count(), 0);
    }

    #[test]
    fn release_restores_speed_and_membership() {
        let mut exec = test_exec();
        let cfg = test_config(Vec3::new(0.0, 0.0, 8.0));
        let a = exec.spawn(follower(Vec3::ZERO), GROUP, cfg, Arc::new(SeqLine));
        let b = exec.spawn(follower(Vec3::new(2.0, 0.0, 0.0)), GROUP, cfg, Arc::new(SeqLine));

        exec.followers[a.index()].speed = 0.5; // as if throttled by catch-up
        exec.release(a);

        assert!(!exec.is_active(a));
        assert_eq!(exec.followers[a.index()].speed, 2.0, "original speed restored");
        let group = exec.engine.group(GROUP).unwrap();
        assert_eq!(group.leader, b, "leadership moved on");
        assert!(!group.contains(a));

        // Releasing twice (or releasing a stranger) is harmless.
        exec.release(a);
        exec.release(AgentId(99));
    }

    #[test]
    fn releasing_everyone_dissolves_the_group() {
        let mut exec = test_exec();
        let cfg = test_config(Vec3::new(0.0, 0.0, 8.0));
        let a = exec.spawn(follower(Vec3::ZERO), GROUP, cfg, Arc::new(SeqLine));
        let b = exec.spawn(follower(Vec3::new(2.0, 0.0, 0.0)), GROUP, cfg, Arc::new(SeqLine));
        exec.release(a);
        exec.release(b);
        assert!(exec.engine.group(GROUP).is_none());
        assert!(exec.settled(), "no active members left");
    }
}

// ── Observer hooks ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observers {
    use super::*;

    struct TickCounter {
        starts: usize,
        ends: usize,
        last_running: usize,
    }

    impl ExecObserver for TickCounter {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }
        fn on_tick_end(&mut self, _tick: Tick, running: usize) {
            self.ends += 1;
            self.last_running = running;
        }
    }

    #[test]
    fn observer_called_once_per_tick() {
        let mut exec = test_exec();
        let cfg = test_config(Vec3::new(0.0, 0.0, 5.0));
        exec.spawn(follower(Vec3::ZERO), GROUP, cfg, Arc::new(SeqLine));

        let mut counter = TickCounter { starts: 0, ends: 0, last_running: 0 };
        exec.run_ticks(7, &mut counter);
        assert_eq!(counter.starts, 7);
        assert_eq!(counter.ends, 7);
        assert_eq!(counter.last_running, 1, "the lone member is still running");
    }

    #[test]
    fn snapshots_fire_at_interval() {
        let mut exec: FormationExec<KinematicFollower> = FormationExec::new(ExecConfig {
            tick_duration_ms: 50,
            snapshot_interval_ticks: 4,
        });
        let cfg = test_config(Vec3::new(0.0, 0.0, 5.0));
        exec.spawn(follower(Vec3::ZERO), GROUP, cfg, Arc::new(SeqLine));

        struct SnapCounter(usize);
        impl ExecObserver for SnapCounter {
            fn on_snapshot(&mut self, _tick: Tick, rows: &[crate::TraceRow]) {
                assert_eq!(rows.len(), 1);
                self.0 += 1;
            }
        }

        let mut counter = SnapCounter(0);
        exec.run_ticks(9, &mut counter);
        // Ticks 0, 4, and 8 are multiples of the interval.
        assert_eq!(counter.0, 3);
    }
}

// ── CSV trace ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trace {
    use super::*;

    #[test]
    fn trace_file_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");

        let mut exec: FormationExec<KinematicFollower> = FormationExec::new(ExecConfig {
            tick_duration_ms: 50,
            snapshot_interval_ticks: 1,
        });
        let cfg = test_config(Vec3::new(0.0, 0.0, 2.0));
        exec.spawn(follower(Vec3::ZERO), GROUP, cfg, Arc::new(SeqLine));
        exec.spawn(follower(Vec3::new(2.0, 0.0, 0.0)), GROUP, cfg, Arc::new(SeqLine));

        let mut trace = CsvTrace::new(&path).unwrap();
        assert!(exec.run_until_settled(1_000, &mut trace));
        assert!(trace.take_error().is_none());

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "tick,agent,group,slot,x,y,z,state,status"
        );
        let first = lines.next().expect("at least one data row");
        assert!(first.starts_with("0,0,1,"), "tick 0, agent 0, group 1: {first}");
        // Two members per snapshot tick.
        assert_eq!(contents.lines().count() % 2, 1, "header + 2 rows per tick");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        let mut trace = CsvTrace::new(&path).unwrap();
        trace.finish().unwrap();
        trace.finish().unwrap();
    }
}
