//! Arena management system
//!
//! Handles safe-zone shrink, viewport rescaling and the boundary grace timer
//! that eliminates fighters who stay outside too long.

use crate::game::constants::arena::{BOUNDARY_PULL_BASE, BOUNDARY_PULL_MAX, MIN_RADIUS_DIVISOR};
use crate::game::constants::boundary::OUTSIDE_GRACE_MS;
use crate::game::constants::physics::MAX_SPEED;
use crate::game::events::BattleEvent;
use crate::game::match_result::Standings;
use crate::game::state::{rescaled_fighter_radius, Arena, Fighter};
use crate::game::systems::TickContext;
use crate::util::vec2::Vec2;

pub const LOST_OUTSIDE_REASON: &str = "Lost outside the arena";

/// Shrink the safe zone by one tick
pub fn shrink(arena: &mut Arena, dt: f32) {
    arena.shrink(dt);
}

/// Rescales the arena and every fighter for a new viewport.
///
/// Radius, offsets from center and velocities scale by the ratio of the
/// smaller viewport dimensions; fighter radii stay within the rescale bounds.
/// The floor radius is recomputed and the arena never ends up below it.
pub fn rescale(
    arena: &mut Arena,
    fighters: &mut [Fighter],
    previous_min_dimension: f32,
    width: f32,
    height: f32,
) {
    let min_dimension = width.min(height);
    let scale = if previous_min_dimension > 0.0 {
        min_dimension / previous_min_dimension
    } else {
        1.0
    };
    let previous_center = arena.center;
    let center = Vec2::new(width / 2.0, height / 2.0);

    arena.radius *= scale;
    for fighter in fighters.iter_mut() {
        let offset = fighter.position - previous_center;
        fighter.position = center + offset * scale;
        fighter.velocity *= scale;
        fighter.radius = rescaled_fighter_radius(fighter.radius, scale);
    }

    arena.center = center;
    arena.min_radius = min_dimension / MIN_RADIUS_DIVISOR;
    arena.radius = arena.radius.max(arena.min_radius);
}

/// Whether the fighter overlaps the boundary, with the outward normal and overflow
fn overflow(fighter: &Fighter, arena: &Arena) -> Option<(Vec2, f32)> {
    let offset = fighter.position - arena.center;
    let dist = offset.length();
    let boundary = arena.radius - fighter.radius;
    if dist > boundary && dist > 0.0 {
        Some((offset * (1.0 / dist), dist - boundary))
    } else {
        None
    }
}

/// Time a fighter may spend outside before elimination, including any spawn bonus
pub fn grace_for(fighter: &Fighter) -> f64 {
    OUTSIDE_GRACE_MS + fighter.extra_grace_ms
}

/// Check fighters against the safe-zone boundary.
///
/// Fighters past the edge are pulled back in. The first tick outside starts
/// the grace timer; a fighter still outside once the grace has elapsed is
/// eliminated. Coming back inside clears the timer and any spawn bonus.
pub fn check_boundaries(
    fighters: &mut [Fighter],
    arena: &Arena,
    ctx: &TickContext,
    standings: &mut Standings,
) -> Vec<BattleEvent> {
    let mut events = Vec::new();

    for index in 0..fighters.len() {
        let expired = {
            let fighter = &mut fighters[index];
            if !fighter.alive {
                continue;
            }

            match overflow(fighter, arena) {
                Some((normal, overflow)) => {
                    let pull = (overflow / fighter.radius.max(1.0) + BOUNDARY_PULL_BASE)
                        .min(BOUNDARY_PULL_MAX);
                    fighter.velocity -= normal * (MAX_SPEED * pull * ctx.dt);

                    match fighter.outside_since {
                        None => {
                            fighter.outside_since = Some(ctx.now_ms);
                            events.push(BattleEvent::LeftSafeZone { fighter: fighter.id });
                            false
                        }
                        Some(since) => ctx.now_ms - since >= grace_for(fighter),
                    }
                }
                None => {
                    if fighter.outside_since.take().is_some() {
                        events.push(BattleEvent::ReturnedToSafeZone { fighter: fighter.id });
                    }
                    fighter.extra_grace_ms = 0.0;
                    false
                }
            }
        };

        if expired {
            let id = fighters[index].id;
            events.extend(standings.eliminate(fighters, id, LOST_OUTSIDE_REASON, ctx.elapsed_ms));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::boundary::STORM_EXTRA_GRACE_MS;

    fn arena() -> Arena {
        Arena {
            center: Vec2::new(400.0, 400.0),
            radius: 200.0,
            min_radius: 80.0,
        }
    }

    fn ctx(now_ms: f64) -> TickContext {
        TickContext {
            now_ms,
            elapsed_ms: now_ms,
            dt: 0.016,
        }
    }

    fn fighter_at(id: usize, x: f32, y: f32) -> Fighter {
        let mut fighter = Fighter::new(id, format!("F{}", id), 20.0);
        fighter.position = Vec2::new(x, y);
        fighter
    }

    #[test]
    fn test_inside_fighter_untouched() {
        let arena = arena();
        let mut fighters = vec![fighter_at(0, 450.0, 400.0), fighter_at(1, 300.0, 400.0)];
        let mut standings = Standings::new();

        let events = check_boundaries(&mut fighters, &arena, &ctx(0.0), &mut standings);
        assert!(events.is_empty());
        assert!(fighters.iter().all(|f| f.outside_since.is_none()));
        assert_eq!(fighters[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_outside_fighter_pulled_inward_and_timed() {
        let arena = arena();
        // Boundary for a radius-20 fighter sits 180 from center
        let mut fighters = vec![fighter_at(0, 600.0, 400.0), fighter_at(1, 400.0, 400.0)];
        let mut standings = Standings::new();

        let events = check_boundaries(&mut fighters, &arena, &ctx(1_000.0), &mut standings);
        assert_eq!(events, vec![BattleEvent::LeftSafeZone { fighter: 0 }]);
        assert_eq!(fighters[0].outside_since, Some(1_000.0));

        // overflow 20 / radius 20 + 0.4 = 1.4
        let expected = -MAX_SPEED * 1.4 * 0.016;
        assert!((fighters[0].velocity.x - expected).abs() < 1e-3);
        assert_eq!(fighters[0].velocity.y, 0.0);
    }

    #[test]
    fn test_pull_is_capped() {
        let arena = arena();
        let mut fighters = vec![fighter_at(0, 2_000.0, 400.0)];
        let mut standings = Standings::new();
        check_boundaries(&mut fighters, &arena, &ctx(0.0), &mut standings);
        let expected = -MAX_SPEED * BOUNDARY_PULL_MAX * 0.016;
        assert!((fighters[0].velocity.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_eliminated_after_grace() {
        let arena = arena();
        let mut fighters = vec![
            fighter_at(0, 600.0, 400.0),
            fighter_at(1, 400.0, 400.0),
            fighter_at(2, 380.0, 400.0),
        ];
        let mut standings = Standings::new();

        check_boundaries(&mut fighters, &arena, &ctx(1_000.0), &mut standings);
        fighters[0].position = Vec2::new(600.0, 400.0);
        check_boundaries(&mut fighters, &arena, &ctx(2_999.0), &mut standings);
        assert!(fighters[0].alive);

        fighters[0].position = Vec2::new(600.0, 400.0);
        let events = check_boundaries(&mut fighters, &arena, &ctx(3_000.0), &mut standings);
        assert!(!fighters[0].alive);
        assert_eq!(fighters[0].elimination_reason.as_deref(), Some(LOST_OUTSIDE_REASON));
        assert_eq!(
            events,
            vec![BattleEvent::Eliminated {
                fighter: 0,
                placement: 3,
                reason: LOST_OUTSIDE_REASON.to_string(),
            }]
        );
    }

    #[test]
    fn test_reentry_resets_grace() {
        let arena = arena();
        let mut fighters = vec![fighter_at(0, 600.0, 400.0), fighter_at(1, 400.0, 400.0)];
        let mut standings = Standings::new();

        check_boundaries(&mut fighters, &arena, &ctx(0.0), &mut standings);
        fighters[0].position = Vec2::new(450.0, 400.0);
        let events = check_boundaries(&mut fighters, &arena, &ctx(1_900.0), &mut standings);
        assert_eq!(events, vec![BattleEvent::ReturnedToSafeZone { fighter: 0 }]);
        assert!(fighters[0].outside_since.is_none());

        // Back out: a fresh timer starts, so the earlier stretch does not count
        fighters[0].position = Vec2::new(600.0, 400.0);
        check_boundaries(&mut fighters, &arena, &ctx(2_000.0), &mut standings);
        fighters[0].position = Vec2::new(600.0, 400.0);
        check_boundaries(&mut fighters, &arena, &ctx(3_500.0), &mut standings);
        assert!(fighters[0].alive);
        assert_eq!(fighters[0].outside_since, Some(2_000.0));
    }

    #[test]
    fn test_storm_bonus_extends_first_stretch_only() {
        let arena = arena();
        let mut fighters = vec![fighter_at(0, 600.0, 400.0), fighter_at(1, 400.0, 400.0)];
        fighters[0].extra_grace_ms = STORM_EXTRA_GRACE_MS;
        let mut standings = Standings::new();

        check_boundaries(&mut fighters, &arena, &ctx(0.0), &mut standings);
        fighters[0].position = Vec2::new(600.0, 400.0);
        check_boundaries(&mut fighters, &arena, &ctx(5_000.0), &mut standings);
        assert!(fighters[0].alive);

        fighters[0].position = Vec2::new(450.0, 400.0);
        check_boundaries(&mut fighters, &arena, &ctx(5_100.0), &mut standings);
        assert_eq!(fighters[0].extra_grace_ms, 0.0);
        assert_eq!(grace_for(&fighters[0]), OUTSIDE_GRACE_MS);
    }

    #[test]
    fn test_dead_fighters_ignored() {
        let arena = arena();
        let mut fighters = vec![fighter_at(0, 900.0, 400.0)];
        fighters[0].alive = false;
        let mut standings = Standings::new();
        let events = check_boundaries(&mut fighters, &arena, &ctx(0.0), &mut standings);
        assert!(events.is_empty());
        assert!(fighters[0].outside_since.is_none());
    }

    #[test]
    fn test_rescale_scales_positions_and_radius() {
        let mut arena = Arena::for_viewport(800.0, 800.0);
        let mut fighters = vec![fighter_at(0, 500.0, 400.0)];
        fighters[0].velocity = Vec2::new(100.0, 0.0);
        fighters[0].radius = 30.0;

        rescale(&mut arena, &mut fighters, 800.0, 1_600.0, 1_600.0);

        assert_eq!(arena.center, Vec2::new(800.0, 800.0));
        assert!((arena.radius - 800.0 / 2.6 * 2.0).abs() < 1e-2);
        assert_eq!(arena.min_radius, 200.0);
        assert_eq!(fighters[0].position, Vec2::new(1_000.0, 800.0));
        assert_eq!(fighters[0].velocity, Vec2::new(200.0, 0.0));
        assert_eq!(fighters[0].radius, 36.0);
    }

    #[test]
    fn test_rescale_floors_radius_at_new_minimum() {
        let mut arena = Arena {
            center: Vec2::new(400.0, 400.0),
            radius: 100.0,
            min_radius: 100.0,
        };
        let mut fighters = Vec::new();
        // Shrinking the viewport keeps radius proportional, then floors it
        rescale(&mut arena, &mut fighters, 800.0, 400.0, 600.0);
        assert_eq!(arena.min_radius, 50.0);
        assert_eq!(arena.radius, 50.0);

        arena.radius = 30.0;
        rescale(&mut arena, &mut fighters, 400.0, 400.0, 400.0);
        assert_eq!(arena.radius, arena.min_radius);
    }

    #[test]
    fn test_shrink_monotonic() {
        let mut arena = arena();
        let mut last = arena.radius;
        for _ in 0..400 {
            shrink(&mut arena, 0.05);
            assert!(arena.radius <= last);
            assert!(arena.radius >= arena.min_radius);
            last = arena.radius;
        }
    }
}
