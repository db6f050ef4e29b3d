//! escort — smallest runnable demo of the fc formation framework.
//!
//! Five agents assemble into a wedge, rotate to face the objective, fly the
//! pattern 40 units downrange, and report success.  A CSV trace of every
//! 5th tick lands in `escort_trace.csv` for plotting.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use log::info;

use fc_core::{GroupId, Vec3};
use fc_formation::{MemberConfig, OrientationMode};
use fc_nav::KinematicFollower;
use fc_shape::{SlotShape, Wedge};
use fc_sim::{CsvTrace, ExecConfig, FormationExec};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize = 5;
const TICK_DURATION_MS: u32 = 50; // 20 Hz
const SNAPSHOT_INTERVAL: u64 = 5;
const MAX_TICKS: u64 = 10_000;
const TRACE_PATH: &str = "escort_trace.csv";

fn setup_logging() -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {}: {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn main() -> Result<()> {
    setup_logging()?;

    let target = Vec3::new(0.0, 0.0, 40.0);
    let config = MemberConfig {
        target,
        orientation: OrientationMode::MovementDirection,
        ..MemberConfig::default()
    };
    let shape: Arc<dyn SlotShape> = Arc::new(Wedge::default());

    let mut exec: FormationExec<KinematicFollower> = FormationExec::new(ExecConfig {
        tick_duration_ms: TICK_DURATION_MS,
        snapshot_interval_ticks: SNAPSHOT_INTERVAL,
    });

    // A loose gaggle south of the origin; the engine sorts out who stands
    // where.
    for i in 0..AGENT_COUNT {
        let position = Vec3::new(
            i as f32 * 1.5 - 3.0,
            0.0,
            -((i % 3) as f32) * 1.5,
        );
        exec.spawn(
            KinematicFollower::new(position, Vec3::Z, 4.0),
            GroupId(1),
            config,
            Arc::clone(&shape),
        );
    }

    let mut trace = CsvTrace::new(Path::new(TRACE_PATH))?;
    let wall = Instant::now();
    let settled = exec.run_until_settled(MAX_TICKS, &mut trace);
    if let Some(err) = trace.take_error() {
        return Err(err.into());
    }

    info!(
        "run finished: settled={settled}, sim time {:.1}s, wall {:.0?}",
        exec.clock.elapsed_secs(),
        wall.elapsed(),
    );
    for i in 0..AGENT_COUNT {
        let agent = fc_core::AgentId(i as u32);
        println!(
            "agent {i}: {} at {}",
            exec.status(agent),
            exec.followers[i].position
        );
    }
    println!("trace written to {TRACE_PATH}");
    Ok(())
}
