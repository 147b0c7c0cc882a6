//! Battle drivers
//!
//! The simulation only knows `tick(dt)`. These drivers decide when ticks
//! happen: as fast as possible for headless runs, or paced on a tokio
//! interval for real-time playback with cancellation.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::game::events::BattleEvent;
use crate::game::game_loop::Battle;

/// How a driver loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Battle reached the finished phase
    Finished { ticks: u64 },
    /// Tick cap hit before the battle finished
    TickLimit { ticks: u64 },
    /// Shutdown signal arrived between ticks
    Cancelled { ticks: u64 },
}

impl RunOutcome {
    pub fn ticks(&self) -> u64 {
        match *self {
            RunOutcome::Finished { ticks }
            | RunOutcome::TickLimit { ticks }
            | RunOutcome::Cancelled { ticks } => ticks,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, RunOutcome::Finished { .. })
    }
}

/// Ticks between periodic status lines
fn status_interval(dt: f32) -> u64 {
    if dt > 0.0 {
        ((1.0 / dt).round() as u64).max(1)
    } else {
        60
    }
}

/// Runs the battle to completion without pacing
pub fn run_headless<F>(battle: &mut Battle, dt: f32, max_ticks: u64, mut on_events: F) -> RunOutcome
where
    F: FnMut(&Battle, &[BattleEvent]),
{
    let log_every = status_interval(dt);
    let mut ticks = 0;

    while !battle.is_finished() {
        if ticks >= max_ticks {
            warn!("Tick limit {} reached before the battle finished", max_ticks);
            return RunOutcome::TickLimit { ticks };
        }

        let events = battle.tick(dt);
        ticks += 1;
        if !events.is_empty() {
            on_events(battle, &events);
        }
        if ticks % log_every == 0 {
            debug!("tick {}: {}", ticks, battle.status());
        }
    }

    RunOutcome::Finished { ticks }
}

/// Runs the battle paced to the wall clock until it finishes, the tick cap is
/// hit, or `shutdown` resolves
pub async fn run_realtime<S, F>(
    battle: &mut Battle,
    dt: f32,
    max_ticks: u64,
    shutdown: S,
    mut on_events: F,
) -> RunOutcome
where
    S: Future<Output = ()>,
    F: FnMut(&Battle, &[BattleEvent]),
{
    let period = Duration::from_secs_f32(dt.max(0.001));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    info!("Real-time loop started at {:.0} Hz", 1.0 / period.as_secs_f32());
    let log_every = status_interval(dt);
    let mut ticks = 0;

    while !battle.is_finished() {
        if ticks >= max_ticks {
            warn!("Tick limit {} reached before the battle finished", max_ticks);
            return RunOutcome::TickLimit { ticks };
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown signal received after {} ticks", ticks);
                return RunOutcome::Cancelled { ticks };
            }
            _ = ticker.tick() => {
                let events = battle.tick(dt);
                ticks += 1;
                if !events.is_empty() {
                    on_events(battle, &events);
                }
                if ticks % log_every == 0 {
                    info!("{}", battle.status());
                }
            }
        }
    }

    RunOutcome::Finished { ticks }
}
