//! Autonomous steering and motion integration
//!
//! Each alive fighter blends neighbor avoidance, a pull toward the arena
//! center, a wandering heading and pursuit of its nearest rival, then eases
//! its velocity toward the blended direction at cruise speed.

use crate::game::constants::physics::*;
use crate::game::constants::steering::*;
use crate::game::state::{Arena, Fighter};
use crate::util::rng::RandomSource;
use crate::util::vec2::{lerp_angle, Vec2};

/// Steer and move every alive fighter.
///
/// Fighters are processed in roster order; neighbor queries see positions
/// already updated earlier in the same pass.
pub fn update(fighters: &mut [Fighter], arena: &Arena, dt: f32, rng: &mut dyn RandomSource) {
    for index in 0..fighters.len() {
        if !fighters[index].alive {
            continue;
        }

        advance_wander(&mut fighters[index], dt, rng);
        let desired = desired_velocity(fighters, index, arena);
        integrate(&mut fighters[index], desired, dt);
    }
}

/// Counts down the wander timer and re-rolls the heading when it runs out
pub fn advance_wander(fighter: &mut Fighter, dt: f32, rng: &mut dyn RandomSource) {
    fighter.wander_timer -= dt;
    if fighter.wander_timer <= 0.0 {
        fighter.wander_angle = rng.angle();
        fighter.wander_timer = rng.range(WANDER_INTERVAL_MIN, WANDER_INTERVAL_MAX);
    }
}

/// Unweighted steering sum for the fighter at `index` (before normalization)
pub fn steering_direction(fighters: &[Fighter], index: usize, arena: &Arena) -> Vec2 {
    let me = &fighters[index];

    let mut avoid = Vec2::ZERO;
    let mut neighbors = 0usize;
    let mut nearest: Option<(f32, Vec2)> = None;

    for (other_index, other) in fighters.iter().enumerate() {
        if other_index == index || !other.alive {
            continue;
        }
        let offset = other.position - me.position;
        let dist = offset.length();

        if dist < AVOID_DISTANCE && dist > 0.0 {
            let factor = (AVOID_DISTANCE - dist) / AVOID_DISTANCE;
            avoid -= offset * (factor / dist);
            neighbors += 1;
        }

        if nearest.map_or(true, |(best, _)| dist < best) {
            nearest = Some((dist, offset));
        }
    }

    if neighbors > 0 {
        avoid = avoid * (1.0 / neighbors as f32);
    }

    let to_center = arena.center - me.position;
    let mut direction = avoid * AVOID_WEIGHT
        + to_center.normalize_or_self() * CENTER_WEIGHT
        + Vec2::from_angle(me.wander_angle) * WANDER_WEIGHT;

    if let Some((dist, offset)) = nearest {
        if dist > 0.0 {
            direction += offset * (PURSUIT_WEIGHT / dist.max(1.0));
        }
    }

    direction + panic_pull(me.position, arena)
}

/// Extra pull toward the center once a fighter strays past the panic threshold
pub fn panic_pull(position: Vec2, arena: &Arena) -> Vec2 {
    let to_center = arena.center - position;
    let radial = to_center.length();
    let threshold = arena.radius * PANIC_THRESHOLD_RATIO;
    if radial <= threshold {
        return Vec2::ZERO;
    }

    let strength = ((radial - threshold) / (arena.radius - threshold).max(1.0) * PANIC_MAX)
        .min(PANIC_MAX);
    to_center.normalize_or_self() * strength
}

/// Velocity the fighter at `index` is steering toward
pub fn desired_velocity(fighters: &[Fighter], index: usize, arena: &Arena) -> Vec2 {
    steering_direction(fighters, index, arena).normalize_or_self() * (MAX_SPEED * DESIRED_SPEED_RATIO)
}

/// Eases velocity toward `desired`, applies friction and the speed cap, then
/// moves and turns the fighter
pub fn integrate(fighter: &mut Fighter, desired: Vec2, dt: f32) {
    fighter.velocity += (desired - fighter.velocity) * (dt * VELOCITY_EASE_RATE);
    fighter.velocity *= FRICTION.powf(dt * FRICTION_REFERENCE_FPS);
    fighter.velocity = fighter.velocity.clamp_length(MAX_SPEED);

    fighter.position += fighter.velocity * dt;

    if fighter.speed() > ORIENTATION_MIN_SPEED {
        fighter.orientation = lerp_angle(fighter.orientation, fighter.velocity.angle(), ORIENTATION_LERP);
    }
}
