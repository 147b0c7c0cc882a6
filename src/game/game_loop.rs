//! Battle loop: owns one round from spawn to final standings
//!
//! A `Battle` is driven by repeated `tick(dt)` calls from whatever driver the
//! host uses (headless loop, real-time interval, tests). Each tick is atomic:
//! arena shrink, steering, boundary checks, collisions and the end-of-round
//! check all complete before it returns.

use serde::Serialize;
use tracing::{info, warn};

use crate::game::constants::fighter_radius_for;
use crate::game::constants::game::COUNTDOWN_SECONDS;
use crate::game::constants::physics::MAX_FRAME_DT;
use crate::game::events::BattleEvent;
use crate::game::match_result::{check_battle_end, BattleSummary, MatchEndReason, ResultEntry, Standings};
use crate::game::state::{Arena, BattlePhase, Fighter, FighterId, HitEffect};
use crate::game::systems::spawn::{self, SpawnMode};
use crate::game::systems::{arena, collision, steering, TickContext};
use crate::roster::Roster;
use crate::util::rng::RandomSource;
use crate::util::vec2::Vec2;

pub const IDLE_STATUS: &str = "Add some names and hit Start Battle!";
pub const STARTING_STATUS: &str = "Battle starting...";
pub const NO_WINNER_STATUS: &str = "No clear winner, try again!";

/// Frame step accepted by the simulation: non-negative, finite, at most `MAX_FRAME_DT`
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Read-only view of one fighter for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct FighterView {
    pub id: FighterId,
    pub name: String,
    pub position: Vec2,
    pub orientation: f32,
    pub radius: f32,
    pub health: u32,
    pub hits_taken: u32,
    pub alive: bool,
    pub outside: bool,
    pub eliminated_at: Option<f64>,
    pub elimination_reason: Option<String>,
}

impl From<&Fighter> for FighterView {
    fn from(fighter: &Fighter) -> Self {
        Self {
            id: fighter.id,
            name: fighter.name.clone(),
            position: fighter.position,
            orientation: fighter.orientation,
            radius: fighter.radius,
            health: fighter.health,
            hits_taken: fighter.hits_taken,
            alive: fighter.alive,
            outside: fighter.outside_since.is_some(),
            eliminated_at: fighter.eliminated_at,
            elimination_reason: fighter.elimination_reason.clone(),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct BattleSnapshot {
    pub tick: u64,
    pub phase: BattlePhase,
    pub now_ms: f64,
    pub elapsed_ms: f64,
    pub arena: Arena,
    pub fighters: Vec<FighterView>,
    pub effects: Vec<HitEffect>,
    pub status: String,
}

/// One battle-royale round and everything it owns
pub struct Battle {
    width: f32,
    height: f32,
    arena: Arena,
    fighters: Vec<Fighter>,
    effects: Vec<HitEffect>,
    standings: Standings,
    phase: BattlePhase,
    spawn_mode: SpawnMode,
    status: String,
    /// Battle clock (ms); advances with every tick, never reset
    now_ms: f64,
    countdown_ends_at: f64,
    round_started_at: f64,
    elapsed_ms: f64,
    end_reason: Option<MatchEndReason>,
    tick_count: u64,
    rng: Box<dyn RandomSource>,
}

impl Battle {
    /// Idle battle for a viewport. Non-positive sizes are bumped to one unit.
    pub fn new(width: f32, height: f32, rng: Box<dyn RandomSource>) -> Self {
        let width = sanitize_dimension(width);
        let height = sanitize_dimension(height);
        Self {
            width,
            height,
            arena: Arena::for_viewport(width, height),
            fighters: Vec::new(),
            effects: Vec::new(),
            standings: Standings::new(),
            phase: BattlePhase::Idle,
            spawn_mode: SpawnMode::default(),
            status: IDLE_STATUS.to_string(),
            now_ms: 0.0,
            countdown_ends_at: 0.0,
            round_started_at: 0.0,
            elapsed_ms: 0.0,
            end_reason: None,
            tick_count: 0,
            rng,
        }
    }

    /// Resets everything and places the roster for a new round.
    ///
    /// Any round in progress is discarded. The battle enters the countdown.
    pub fn start(&mut self, roster: &Roster, mode: SpawnMode) -> Vec<BattleEvent> {
        if matches!(self.phase, BattlePhase::Countdown | BattlePhase::Running) {
            info!("Discarding battle in progress");
        }

        let mut arena = Arena::for_viewport(self.width, self.height);
        spawn::prepare_arena(mode, &mut arena);
        let radius = fighter_radius_for(self.width.min(self.height));
        let points = spawn::plan(mode, roster.len(), radius, &arena, self.rng.as_mut());
        let spawned_at = self.now_ms;

        self.fighters = roster
            .names()
            .iter()
            .zip(points)
            .enumerate()
            .map(|(id, (name, point))| {
                let mut fighter = Fighter::new(id, name.clone(), radius);
                fighter.position = point.position;
                fighter.velocity = point.velocity;
                fighter.orientation = point.orientation;
                fighter.wander_angle = point.wander_angle;
                fighter.wander_timer = point.wander_timer;
                fighter.extra_grace_ms = point.extra_grace_ms;
                // Extra grace runs from spawn, so the countdown eats into it
                if fighter.extra_grace_ms > 0.0 {
                    fighter.outside_since = Some(spawned_at);
                }
                fighter
            })
            .collect();

        self.arena = arena;
        self.effects.clear();
        self.standings = Standings::new();
        self.spawn_mode = mode;
        self.phase = BattlePhase::Countdown;
        self.countdown_ends_at = self.now_ms + COUNTDOWN_SECONDS * 1000.0;
        self.round_started_at = 0.0;
        self.elapsed_ms = 0.0;
        self.end_reason = None;
        self.tick_count = 0;
        self.status = STARTING_STATUS.to_string();

        info!(
            "Battle starting: {} fighters, {} spawn, arena radius {:.0}",
            self.fighters.len(),
            mode,
            self.arena.radius
        );

        let mut events = vec![BattleEvent::PhaseChanged {
            phase: BattlePhase::Countdown,
        }];
        events.extend(
            self.fighters
                .iter()
                .filter(|f| f.outside_since.is_some())
                .map(|f| BattleEvent::LeftSafeZone { fighter: f.id }),
        );
        events
    }

    /// Advances the battle by `dt` seconds (clamped to `MAX_FRAME_DT`)
    pub fn tick(&mut self, dt: f32) -> Vec<BattleEvent> {
        let dt = clamp_dt(dt);
        self.now_ms += f64::from(dt) * 1000.0;

        let now = self.now_ms;
        self.effects.retain(|effect| !effect.is_expired(now));

        match self.phase {
            BattlePhase::Countdown => {
                self.tick_count += 1;
                self.tick_countdown()
            }
            BattlePhase::Running => {
                self.tick_count += 1;
                self.tick_running(dt)
            }
            BattlePhase::Idle | BattlePhase::Finished => Vec::new(),
        }
    }

    fn tick_countdown(&mut self) -> Vec<BattleEvent> {
        let remaining = (self.countdown_ends_at - self.now_ms).max(0.0);
        self.status = format!("Prepare to battle in {}...", (remaining / 1000.0).ceil() as u64);
        if remaining > 0.0 {
            return Vec::new();
        }

        self.phase = BattlePhase::Running;
        self.round_started_at = self.now_ms;
        self.elapsed_ms = 0.0;
        self.status = self.running_status();
        info!("Round begins with {} fighters", self.alive_count());

        vec![BattleEvent::PhaseChanged {
            phase: BattlePhase::Running,
        }]
    }

    fn tick_running(&mut self, dt: f32) -> Vec<BattleEvent> {
        self.elapsed_ms = self.now_ms - self.round_started_at;
        let ctx = TickContext {
            now_ms: self.now_ms,
            elapsed_ms: self.elapsed_ms,
            dt,
        };

        let mut events = self.standings.sweep_knockouts(&mut self.fighters, ctx.elapsed_ms);

        arena::shrink(&mut self.arena, dt);
        steering::update(&mut self.fighters, &self.arena, dt, self.rng.as_mut());
        events.extend(arena::check_boundaries(
            &mut self.fighters,
            &self.arena,
            &ctx,
            &mut self.standings,
        ));
        events.extend(collision::update(
            &mut self.fighters,
            &mut self.effects,
            &ctx,
            &mut self.standings,
            self.rng.as_mut(),
        ));
        self.sanitize();

        match check_battle_end(self.alive_count(), ctx.elapsed_ms) {
            Some(reason) => events.extend(self.finish(reason)),
            None => self.status = self.running_status(),
        }

        events
    }

    fn finish(&mut self, reason: MatchEndReason) -> Vec<BattleEvent> {
        let (winner, mut events) =
            self.standings
                .finalize(&mut self.fighters, self.elapsed_ms, self.rng.as_mut());

        self.phase = BattlePhase::Finished;
        self.end_reason = Some(reason);
        self.status = match winner.and_then(|id| self.fighters.get(id)) {
            Some(fighter) => format!("{} wins the battle!", fighter.name),
            None => NO_WINNER_STATUS.to_string(),
        };
        info!(
            "Battle finished after {:.1}s ({:?})",
            self.elapsed_ms / 1000.0,
            reason
        );

        events.push(BattleEvent::PhaseChanged {
            phase: BattlePhase::Finished,
        });
        events.push(BattleEvent::Finished { winner });
        events
    }

    /// Puts non-finite fighters back on the arena center at rest
    fn sanitize(&mut self) {
        let center = self.arena.center;
        for fighter in &mut self.fighters {
            if !fighter.position.is_finite() {
                warn!("Fixed non-finite position for {}", fighter.name);
                fighter.position = center;
            }
            if !fighter.velocity.is_finite() {
                warn!("Fixed non-finite velocity for {}", fighter.name);
                fighter.velocity = Vec2::ZERO;
            }
        }
    }

    fn running_status(&self) -> String {
        format!(
            "Arena shrinking · {} fighters left · {}s to final circle",
            self.alive_count(),
            self.arena.seconds_to_final_circle()
        )
    }

    /// Rescales the arena and fighters for a new viewport size
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            warn!("Ignoring invalid viewport size {}x{}", width, height);
            return;
        }
        let previous_min = self.width.min(self.height);
        arena::rescale(&mut self.arena, &mut self.fighters, previous_min, width, height);
        self.width = width;
        self.height = height;
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            tick: self.tick_count,
            phase: self.phase,
            now_ms: self.now_ms,
            elapsed_ms: self.elapsed_ms,
            arena: self.arena,
            fighters: self.fighters.iter().map(FighterView::from).collect(),
            effects: self.effects.clone(),
            status: self.status.clone(),
        }
    }

    /// Results so far, winner first
    pub fn results(&self) -> Vec<ResultEntry> {
        self.standings.sorted()
    }

    /// Final outcome, once the battle has finished
    pub fn summary(&self) -> Option<BattleSummary> {
        let end_reason = self.end_reason?;
        Some(BattleSummary {
            winner: self.winner().map(|fighter| fighter.name.clone()),
            end_reason,
            duration_ms: self.elapsed_ms,
            total_hits: self.fighters.iter().map(|f| f.hits_inflicted).sum(),
            results: self.results(),
        })
    }

    pub fn winner(&self) -> Option<&Fighter> {
        self.standings.winner().and_then(|id| self.fighters.get(id))
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    pub fn fighter(&self, id: FighterId) -> Option<&Fighter> {
        self.fighters.get(id)
    }

    pub fn effects(&self) -> &[HitEffect] {
        &self.effects
    }

    pub fn alive_count(&self) -> usize {
        self.fighters.iter().filter(|f| f.alive).count()
    }

    pub fn spawn_mode(&self) -> SpawnMode {
        self.spawn_mode
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub(crate) fn fighters_mut(&mut self) -> &mut [Fighter] {
        &mut self.fighters
    }
}

fn sanitize_dimension(value: f32) -> f32 {
    if value.is_finite() {
        value.max(1.0)
    } else {
        1.0
    }
}
