//! Battle state definitions
//!
//! Fighters, the shared arena, transient hit effects and the battle phase.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::constants::{arena, combat, spawn};
use crate::util::vec2::Vec2;

/// Fighter identifier (assignment order, 0-based)
pub type FighterId = usize;

/// One contender
///
/// Fields are grouped by how often the tick touches them: motion first,
/// combat bookkeeping second, identity last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    // === Motion (every tick) ===
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing in radians
    pub orientation: f32,
    pub radius: f32,
    pub alive: bool,
    pub wander_angle: f32,
    /// Seconds until the wander direction is re-rolled
    pub wander_timer: f32,

    // === Combat and boundary ===
    /// Hits this fighter can absorb
    pub health: u32,
    pub hits_taken: u32,
    pub hits_inflicted: u32,
    /// Battle clock (ms) of the last hit received
    pub last_damage_at: Option<f64>,
    /// Battle clock (ms) when the current stretch outside the safe zone began
    pub outside_since: Option<f64>,
    /// Grace on top of the standard outside grace, cleared on first re-entry
    pub extra_grace_ms: f64,
    /// Elapsed round time (ms) at elimination, or at battle end for the winner
    pub eliminated_at: Option<f64>,
    pub elimination_reason: Option<String>,

    // === Identity ===
    pub id: FighterId,
    pub name: String,
    /// 1-based position in the roster
    pub display_index: usize,
}

impl Fighter {
    pub fn new(id: FighterId, name: String, radius: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            orientation: 0.0,
            radius,
            alive: true,
            wander_angle: 0.0,
            wander_timer: 0.0,
            health: combat::STARTING_HEALTH,
            hits_taken: 0,
            hits_inflicted: 0,
            last_damage_at: None,
            outside_since: None,
            extra_grace_ms: 0.0,
            eliminated_at: None,
            elimination_reason: None,
            id,
            name,
            display_index: id + 1,
        }
    }

    pub fn is_knocked_out(&self) -> bool {
        self.hits_taken >= self.health
    }

    /// Whether a hit at `now` would be ignored because of the damage cooldown
    pub fn on_cooldown(&self, now: f64) -> bool {
        match self.last_damage_at {
            Some(at) => now - at <= combat::HIT_COOLDOWN_MS,
            None => false,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Circular safe zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Arena {
    pub center: Vec2,
    pub radius: f32,
    pub min_radius: f32,
}

impl Arena {
    /// Arena sized for a viewport, centered in it
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let min_dimension = width.min(height);
        let min_radius = min_dimension / arena::MIN_RADIUS_DIVISOR;
        Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            radius: (min_dimension / arena::INITIAL_RADIUS_DIVISOR).max(min_radius),
            min_radius,
        }
    }

    /// Shrinks linearly toward the floor. Never grows.
    pub fn shrink(&mut self, dt: f32) {
        if self.radius > self.min_radius {
            self.radius = (self.radius - arena::SHRINK_RATE * dt).max(self.min_radius);
        }
    }

    /// Whole seconds until the floor radius is reached
    pub fn seconds_to_final_circle(&self) -> u32 {
        let remaining = (self.radius - self.min_radius).max(0.0);
        (remaining / arena::SHRINK_RATE).ceil() as u32
    }

    pub fn distance_from_center(&self, position: Vec2) -> f32 {
        position.distance_to(self.center)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            radius: 200.0,
            min_radius: 80.0,
        }
    }
}

/// Transient impact marker for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitEffect {
    pub position: Vec2,
    /// Battle clock (ms)
    pub born_at: f64,
    pub duration_ms: f64,
    pub intensity: f32,
    /// Cosmetic seed for the renderer
    pub seed: f32,
}

impl HitEffect {
    pub fn new(position: Vec2, born_at: f64, intensity: f32, seed: f32) -> Self {
        Self {
            position,
            born_at,
            duration_ms: combat::HIT_EFFECT_DURATION_MS,
            intensity,
            seed,
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.born_at > self.duration_ms
    }
}

/// Battle phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BattlePhase {
    /// No battle yet
    #[default]
    Idle,
    /// Fighters placed, waiting for the round to begin
    Countdown,
    /// Round in progress
    Running,
    /// Results final
    Finished,
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BattlePhase::Idle => "idle",
            BattlePhase::Countdown => "countdown",
            BattlePhase::Running => "running",
            BattlePhase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Radius a fighter should have after a viewport rescale
pub fn rescaled_fighter_radius(radius: f32, scale: f32) -> f32 {
    (radius * scale).clamp(spawn::RESCALED_RADIUS_MIN, spawn::RESCALED_RADIUS_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fighter_new() {
        let fighter = Fighter::new(2, "Athena".to_string(), 24.0);
        assert_eq!(fighter.display_index, 3);
        assert!(fighter.alive);
        assert_eq!(fighter.health, 3);
        assert!(fighter.last_damage_at.is_none());
        assert!(fighter.eliminated_at.is_none());
    }

    #[test]
    fn test_fighter_cooldown_window() {
        let mut fighter = Fighter::new(0, "Zed".to_string(), 20.0);
        assert!(!fighter.on_cooldown(0.0));

        fighter.last_damage_at = Some(1_000.0);
        assert!(fighter.on_cooldown(1_000.0));
        assert!(fighter.on_cooldown(1_300.0));
        assert!(!fighter.on_cooldown(1_300.5));
    }

    #[test]
    fn test_knocked_out_at_health() {
        let mut fighter = Fighter::new(0, "Ahri".to_string(), 20.0);
        fighter.hits_taken = 2;
        assert!(!fighter.is_knocked_out());
        fighter.hits_taken = 3;
        assert!(fighter.is_knocked_out());
    }

    #[test]
    fn test_arena_for_viewport() {
        let arena = Arena::for_viewport(1040.0, 780.0);
        assert_eq!(arena.center, Vec2::new(520.0, 390.0));
        assert!((arena.radius - 300.0).abs() < 1e-3);
        assert!((arena.min_radius - 97.5).abs() < 1e-3);
    }

    #[test]
    fn test_arena_shrink_clamps_at_floor() {
        let mut arena = Arena::default();
        for _ in 0..1_000 {
            let before = arena.radius;
            arena.shrink(0.05);
            assert!(arena.radius <= before);
            assert!(arena.radius >= arena.min_radius);
        }
        assert_eq!(arena.radius, arena.min_radius);
        assert_eq!(arena.seconds_to_final_circle(), 0);
    }

    #[test]
    fn test_seconds_to_final_circle_rounds_up() {
        let arena = Arena {
            center: Vec2::ZERO,
            radius: 80.0 + 27.0,
            min_radius: 80.0,
        };
        assert_eq!(arena.seconds_to_final_circle(), 2);
    }

    #[test]
    fn test_hit_effect_expiry() {
        let effect = HitEffect::new(Vec2::ZERO, 100.0, 1.0, 0.0);
        assert!(!effect.is_expired(300.0));
        assert!(effect.is_expired(361.0));
    }

    #[test]
    fn test_rescaled_fighter_radius_clamped() {
        assert_eq!(rescaled_fighter_radius(30.0, 2.0), 36.0);
        assert_eq!(rescaled_fighter_radius(18.0, 0.5), 16.0);
        assert!((rescaled_fighter_radius(20.0, 1.1) - 22.0).abs() < 1e-4);
    }

    #[test]
    fn test_phase_default_idle() {
        assert_eq!(BattlePhase::default(), BattlePhase::Idle);
        assert_eq!(BattlePhase::Countdown.to_string(), "countdown");
    }
}
