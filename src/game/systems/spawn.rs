//! Spawn planning
//!
//! Turns a contender count and a spawn mode into starting positions and
//! initial motion. Every planner is a pure function of its inputs plus the
//! random source, and always returns exactly one entry per contender.

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::constants::boundary::STORM_EXTRA_GRACE_MS;
use crate::game::constants::physics::MAX_SPEED;
use crate::game::constants::spawn::*;
use crate::game::state::Arena;
use crate::util::rng::RandomSource;
use crate::util::vec2::Vec2;

/// How contenders are placed at battle start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnMode {
    /// Rejection-sampled positions inside the arena
    #[default]
    Random,
    /// Evenly spaced ring
    Even,
    /// Groups of 2-3 around a ring
    Clusters,
    /// Everyone near the middle, arena pre-shrunk
    Center,
    /// Just outside the boundary, rushing inward
    Storm,
}

impl SpawnMode {
    pub const ALL: [SpawnMode; 5] = [
        SpawnMode::Random,
        SpawnMode::Even,
        SpawnMode::Clusters,
        SpawnMode::Center,
        SpawnMode::Storm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnMode::Random => "random",
            SpawnMode::Even => "even",
            SpawnMode::Clusters => "clusters",
            SpawnMode::Center => "center",
            SpawnMode::Storm => "storm",
        }
    }

    /// One-line explanation for help output
    pub fn description(&self) -> &'static str {
        match self {
            SpawnMode::Random => "All contenders spawn in random positions inside the arena.",
            SpawnMode::Even => "Fighters spawn evenly spaced around the circle.",
            SpawnMode::Clusters => "Contenders arrive in small clusters of 2-3 per side.",
            SpawnMode::Center => "All fighters drop near the middle as the circle shrinks quickly.",
            SpawnMode::Storm => "Everyone spawns outside the safe zone and must rush into the arena.",
        }
    }
}

impl fmt::Display for SpawnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown spawn mode '{0}' (expected random, even, clusters, center or storm)")]
pub struct SpawnModeParseError(pub String);

impl FromStr for SpawnMode {
    type Err = SpawnModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SpawnMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| SpawnModeParseError(s.to_string()))
    }
}

/// Starting state for one contender
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec2,
    pub velocity: Vec2,
    pub orientation: f32,
    pub wander_angle: f32,
    pub wander_timer: f32,
    pub extra_grace_ms: f64,
}

/// Applies mode-specific arena adjustments. Center drop starts on a smaller circle.
pub fn prepare_arena(mode: SpawnMode, arena: &mut Arena) {
    if mode == SpawnMode::Center {
        arena.radius = (arena.min_radius * CENTER_MIN_RADIUS_FACTOR)
            .max(arena.radius * CENTER_RADIUS_FACTOR);
    }
}

/// Plans positions and initial motion for `count` contenders.
/// Non-finite positions fall back to the arena center.
pub fn plan(
    mode: SpawnMode,
    count: usize,
    fighter_radius: f32,
    arena: &Arena,
    rng: &mut dyn RandomSource,
) -> Vec<SpawnPoint> {
    let positions = spawn_positions(mode, count, fighter_radius, arena, rng);
    debug!("Planned {} spawn positions ({})", positions.len(), mode);

    positions
        .into_iter()
        .map(|position| {
            let position = position.finite_or(arena.center);
            initial_motion(mode, position, arena, rng)
        })
        .collect()
}

/// Computes exactly `count` spawn positions for the mode
pub fn spawn_positions(
    mode: SpawnMode,
    count: usize,
    fighter_radius: f32,
    arena: &Arena,
    rng: &mut dyn RandomSource,
) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }

    let spawn_radius = arena.radius * SPAWN_RADIUS_RATIO;
    let safe_ring = (fighter_radius * 3.0)
        .max(spawn_radius.min(arena.radius - fighter_radius * 1.4));

    let mut positions = match mode {
        SpawnMode::Random => random_positions(count, fighter_radius, spawn_radius, safe_ring, arena, rng),
        SpawnMode::Even => even_positions(count, fighter_radius, safe_ring, arena, rng),
        SpawnMode::Clusters => cluster_positions(count, fighter_radius, safe_ring, arena, rng),
        SpawnMode::Center => center_positions(count, fighter_radius, arena, rng),
        SpawnMode::Storm => storm_positions(count, fighter_radius, arena, rng),
    };

    positions.resize(count, arena.center);
    positions
}

fn random_positions(
    count: usize,
    fighter_radius: f32,
    spawn_radius: f32,
    safe_ring: f32,
    arena: &Arena,
    rng: &mut dyn RandomSource,
) -> Vec<Vec2> {
    let spacing = fighter_radius * RANDOM_SPACING;
    let mut taken: Vec<Vec2> = Vec::with_capacity(count);

    for i in 0..count {
        let placed = (0..RANDOM_MAX_ATTEMPTS).find_map(|_| {
            let angle = rng.angle();
            let distance = rng.next_unit() * spawn_radius;
            let candidate = arena.center + Vec2::from_angle(angle) * distance;
            let clear = taken
                .iter()
                .all(|spot| candidate.distance_to(*spot) > spacing);
            clear.then_some(candidate)
        });

        let position = placed.unwrap_or_else(|| {
            let angle = TAU * i as f32 / count as f32;
            arena.center + Vec2::from_angle(angle) * safe_ring
        });
        taken.push(position);
    }

    taken
}

/// Half-width of the angular jitter used by ring layouts
fn ring_jitter(count: usize) -> f32 {
    PI / (2.0 * count.max(4) as f32)
}

fn even_positions(
    count: usize,
    fighter_radius: f32,
    ring_radius: f32,
    arena: &Arena,
    rng: &mut dyn RandomSource,
) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let base_angle = TAU * i as f32 / count as f32;
            let angle = base_angle + rng.jitter(ring_jitter(count));
            let tangential = rng.next_unit() * fighter_radius * 0.8;
            let distance = ring_radius - rng.next_unit() * fighter_radius * 0.6;
            let radial = distance.max(fighter_radius * 2.2);
            let heading = Vec2::from_angle(angle);
            arena.center + heading * radial + heading.perpendicular() * tangential
        })
        .collect()
}

/// Splits `count` contenders into `ceil(count / 3)` groups.
///
/// Starts from groups of two, trims from the back if that overshoots, then
/// grows groups round-robin up to three members.
pub fn cluster_sizes(count: usize) -> Vec<usize> {
    let cluster_count = count.div_ceil(MAX_CLUSTER_SIZE).max(1);
    let mut sizes = vec![2usize; cluster_count];
    let mut total = cluster_count * 2;

    for size in sizes.iter_mut().rev() {
        if total <= count {
            break;
        }
        if *size > 1 {
            *size -= 1;
            total -= 1;
        }
    }

    let mut grow_index = 0;
    while total < count && grow_index <= cluster_count * MAX_CLUSTER_SIZE {
        let idx = grow_index % cluster_count;
        if sizes[idx] < MAX_CLUSTER_SIZE {
            sizes[idx] += 1;
            total += 1;
        }
        grow_index += 1;
    }

    sizes
}

fn cluster_positions(
    count: usize,
    fighter_radius: f32,
    safe_ring: f32,
    arena: &Arena,
    rng: &mut dyn RandomSource,
) -> Vec<Vec2> {
    let sizes = cluster_sizes(count);
    let ring = cluster_ring_radius(fighter_radius, safe_ring);
    let spread = fighter_radius * 2.6;
    let mut positions = Vec::with_capacity(count);

    for (cluster, &size) in sizes.iter().enumerate() {
        let angle = TAU * cluster as f32 / sizes.len() as f32;
        let cluster_center = arena.center + Vec2::from_angle(angle) * ring;
        for _ in 0..size {
            if positions.len() >= count {
                break;
            }
            let offset_angle = rng.angle();
            let offset = rng.next_unit() * spread;
            positions.push(cluster_center + Vec2::from_angle(offset_angle) * offset);
        }
    }

    positions
}

fn cluster_ring_radius(fighter_radius: f32, safe_ring: f32) -> f32 {
    (fighter_radius * 4.0).max(safe_ring * 0.85)
}

fn center_positions(
    count: usize,
    fighter_radius: f32,
    arena: &Arena,
    rng: &mut dyn RandomSource,
) -> Vec<Vec2> {
    let drop_radius = (fighter_radius * 3.0).max(arena.radius * 0.26);
    (0..count)
        .map(|i| {
            let angle = rng.angle();
            let distance = rng.next_unit() * drop_radius * 0.75;
            // Small per-index spiral so identical samples never overlap exactly
            let spiral = (i as f32 / count.max(1) as f32) * fighter_radius * 0.4;
            let heading = Vec2::from_angle(angle);
            arena.center + heading * distance + heading.perpendicular() * spiral
        })
        .collect()
}

fn storm_positions(
    count: usize,
    fighter_radius: f32,
    arena: &Arena,
    rng: &mut dyn RandomSource,
) -> Vec<Vec2> {
    let storm_radius = arena.radius * STORM_RING_RATIO;
    let thickness = fighter_radius * STORM_RING_THICKNESS;
    (0..count)
        .map(|i| {
            let base_angle = TAU * i as f32 / count as f32;
            let angle = base_angle + rng.jitter(ring_jitter(count));
            let distance = storm_radius + rng.next_unit() * thickness;
            arena.center + Vec2::from_angle(angle) * distance
        })
        .collect()
}

/// Seeds velocity, facing and wander timing consistent with the spawn geometry
pub fn initial_motion(
    mode: SpawnMode,
    position: Vec2,
    arena: &Arena,
    rng: &mut dyn RandomSource,
) -> SpawnPoint {
    let drift = MAX_SPEED * INITIAL_VELOCITY_RATIO / 2.0;
    let mut point = SpawnPoint {
        position,
        velocity: Vec2::new(rng.jitter(drift), rng.jitter(drift)),
        orientation: rng.angle(),
        wander_angle: rng.angle(),
        wander_timer: rng.range(0.6, 2.2),
        extra_grace_ms: 0.0,
    };

    let to_center = arena.center - position;
    match mode {
        SpawnMode::Storm => {
            point.velocity = to_center.normalize_or_self() * (MAX_SPEED * STORM_RUSH_RATIO);
            point.orientation = to_center.angle();
            point.wander_timer = rng.range(0.35, 0.6);
            point.extra_grace_ms = STORM_EXTRA_GRACE_MS;
        }
        SpawnMode::Center => {
            point.wander_timer = rng.range(0.3, 0.8);
        }
        SpawnMode::Even => {
            point.orientation = to_center.angle();
        }
        SpawnMode::Clusters => {
            point.wander_timer = rng.range(0.5, 1.5);
        }
        SpawnMode::Random => {}
    }

    point
}
