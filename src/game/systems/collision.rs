//! Fighter collisions and combat
//!
//! Overlapping pairs are separated and bounced apart. Contact is also how
//! damage happens: one side of every collision lands a hit unless both are
//! still inside their damage cooldown.

use tracing::debug;

use crate::game::constants::combat::*;
use crate::game::constants::physics::MAX_SPEED;
use crate::game::events::BattleEvent;
use crate::game::match_result::Standings;
use crate::game::state::{Fighter, HitEffect};
use crate::game::systems::TickContext;
use crate::util::rng::RandomSource;

/// Mutable access to two distinct fighters
fn pair_mut(fighters: &mut [Fighter], i: usize, j: usize) -> (&mut Fighter, &mut Fighter) {
    debug_assert!(i < j);
    let (head, tail) = fighters.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Separates an overlapping pair and applies the bounce impulse.
/// Returns false if the pair is not touching (or exactly coincident).
pub fn resolve_contact(a: &mut Fighter, b: &mut Fighter) -> bool {
    let delta = b.position - a.position;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if !(dist < min_dist && dist > 0.0) {
        return false;
    }

    let normal = delta * (1.0 / dist);
    let half_overlap = (min_dist - dist) / 2.0;
    a.position -= normal * half_overlap;
    b.position += normal * half_overlap;

    let closing = (b.velocity - a.velocity).dot(normal);
    let impulse = closing.max(MIN_IMPULSE_SPEED) * IMPULSE_SCALE * BOUNCE_STRENGTH;
    a.velocity -= normal * impulse;
    b.velocity += normal * impulse;

    if closing > 0.0 {
        let dampen = closing * SEPARATION_DAMPING;
        a.velocity += normal * dampen;
        b.velocity -= normal * dampen;
    }

    true
}

/// Which side of a collision takes the hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    /// `a` hits `b`
    AHitsB,
    /// `b` hits `a`
    BHitsA,
}

/// Picks the attacker for a collision at `now`, or `None` if neither side can take damage
pub fn choose_hit(a: &Fighter, b: &Fighter, now: f64, rng: &mut dyn RandomSource) -> Option<HitSide> {
    let a_damageable = !a.on_cooldown(now);
    let b_damageable = !b.on_cooldown(now);
    match (a_damageable, b_damageable) {
        (true, true) => Some(if rng.coin() { HitSide::AHitsB } else { HitSide::BHitsA }),
        (true, false) => Some(HitSide::BHitsA),
        (false, true) => Some(HitSide::AHitsB),
        (false, false) => None,
    }
}

/// Records a hit and returns its impact intensity
pub fn apply_hit(attacker: &mut Fighter, victim: &mut Fighter, now: f64) -> f32 {
    victim.last_damage_at = Some(now);
    victim.hits_taken += 1;
    attacker.hits_inflicted += 1;

    let relative_speed = (attacker.velocity - victim.velocity).length();
    (relative_speed / (MAX_SPEED * IMPACT_SPEED_RATIO).max(1.0)).min(MAX_IMPACT)
}

/// Resolve collisions between all alive pairs
pub fn update(
    fighters: &mut [Fighter],
    effects: &mut Vec<HitEffect>,
    ctx: &TickContext,
    standings: &mut Standings,
    rng: &mut dyn RandomSource,
) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    let count = fighters.len();

    for i in 0..count {
        for j in (i + 1)..count {
            let knockout = {
                let (a, b) = pair_mut(fighters, i, j);
                if !a.alive || !b.alive || !resolve_contact(a, b) {
                    continue;
                }

                let (attacker, victim) = match choose_hit(a, b, ctx.now_ms, rng) {
                    Some(HitSide::AHitsB) => (a, b),
                    Some(HitSide::BHitsA) => (b, a),
                    None => continue,
                };

                let intensity = apply_hit(attacker, victim, ctx.now_ms);
                let midpoint = (attacker.position + victim.position) * 0.5;
                effects.push(HitEffect::new(midpoint, ctx.now_ms, intensity, rng.next_unit()));

                debug!(
                    "{} hit {} ({}/{}) intensity {:.2}",
                    attacker.name, victim.name, victim.hits_taken, victim.health, intensity
                );
                events.push(BattleEvent::Hit {
                    attacker: attacker.id,
                    victim: victim.id,
                    intensity,
                    at_ms: ctx.now_ms,
                });

                victim
                    .is_knocked_out()
                    .then(|| (victim.id, format!("{} delivered the final blow", attacker.name)))
            };

            if let Some((victim, reason)) = knockout {
                events.extend(standings.eliminate(fighters, victim, &reason, ctx.elapsed_ms));
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::rng::SeededRandom;
    use crate::util::vec2::Vec2;

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
    fn test_contact_separates_and_bounces() {
        let mut a = fighter_at(0, 100.0, 100.0);
        let mut b = fighter_at(1, 130.0, 100.0);

        assert!(resolve_contact(&mut a, &mut b));
        assert!((a.position.x - 95.0).abs() < 1e-4);
        assert!((b.position.x - 135.0).abs() < 1e-4);

        // At rest: the floor closing speed of 90 drives the bounce
        let impulse = MIN_IMPULSE_SPEED * IMPULSE_SCALE * BOUNCE_STRENGTH;
        assert!((a.velocity.x + impulse).abs() < 1e-3);
        assert!((b.velocity.x - impulse).abs() < 1e-3);
    }

    #[test]
    fn test_separating_pair_is_damped() {
        let mut a = fighter_at(0, 100.0, 100.0);
        let mut b = fighter_at(1, 130.0, 100.0);
        b.velocity = Vec2::new(200.0, 0.0);

        resolve_contact(&mut a, &mut b);
        let impulse = 200.0 * IMPULSE_SCALE * BOUNCE_STRENGTH;
        let dampen = 200.0 * SEPARATION_DAMPING;
        assert!((a.velocity.x - (-impulse + dampen)).abs() < 1e-3);
        assert!((b.velocity.x - (200.0 + impulse - dampen)).abs() < 1e-3);
    }

    #[test]
    fn test_no_contact_for_distant_or_coincident_pairs() {
        let mut a = fighter_at(0, 100.0, 100.0);
        let mut b = fighter_at(1, 140.0, 100.0);
        assert!(!resolve_contact(&mut a, &mut b));

        let mut c = fighter_at(2, 100.0, 100.0);
        let mut d = fighter_at(3, 100.0, 100.0);
        assert!(!resolve_contact(&mut c, &mut d));
        assert_eq!(c.position, d.position);
    }

    #[test]
    fn test_choose_hit_respects_cooldown() {
        let mut rng = SeededRandom::new(1);
        let mut a = fighter_at(0, 0.0, 0.0);
        let mut b = fighter_at(1, 0.0, 0.0);

        a.last_damage_at = Some(1_000.0);
        assert_eq!(choose_hit(&a, &b, 1_200.0, &mut rng), Some(HitSide::AHitsB));

        b.last_damage_at = Some(1_100.0);
        assert_eq!(choose_hit(&a, &b, 1_200.0, &mut rng), None);

        assert!(choose_hit(&a, &b, 1_500.0, &mut rng).is_some());
    }

    #[test]
    fn test_choose_hit_random_when_both_damageable() {
        let mut rng = SeededRandom::new(8);
        let a = fighter_at(0, 0.0, 0.0);
        let b = fighter_at(1, 0.0, 0.0);
        let picks: Vec<HitSide> = (0..64)
            .filter_map(|_| choose_hit(&a, &b, 0.0, &mut rng))
            .collect();
        assert_eq!(picks.len(), 64);
        assert!(picks.contains(&HitSide::AHitsB));
        assert!(picks.contains(&HitSide::BHitsA));
    }

    #[test]
    fn test_apply_hit_counts_and_intensity() {
        let mut attacker = fighter_at(0, 0.0, 0.0);
        let mut victim = fighter_at(1, 0.0, 0.0);
        attacker.velocity = Vec2::new(70.0, 0.0);

        let intensity = apply_hit(&mut attacker, &mut victim, 500.0);
        assert!((intensity - 0.5).abs() < 1e-4);
        assert_eq!(victim.hits_taken, 1);
        assert_eq!(victim.last_damage_at, Some(500.0));
        assert_eq!(attacker.hits_inflicted, 1);

        attacker.velocity = Vec2::new(5_000.0, 0.0);
        assert_eq!(apply_hit(&mut attacker, &mut victim, 900.0), MAX_IMPACT);
    }

    #[test]
    fn test_collision_produces_hit_and_effect() {
        let mut fighters = vec![fighter_at(0, 100.0, 100.0), fighter_at(1, 130.0, 100.0)];
        let mut effects = Vec::new();
        let mut standings = Standings::new();
        let mut rng = SeededRandom::new(3);

        let events = update(&mut fighters, &mut effects, &ctx(1_000.0), &mut standings, &mut rng);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], BattleEvent::Hit { at_ms, .. } if at_ms == 1_000.0));
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].position, Vec2::new(115.0, 100.0));
        assert_eq!(fighters[0].hits_taken + fighters[1].hits_taken, 1);
        assert_eq!(fighters[0].hits_inflicted + fighters[1].hits_inflicted, 1);
    }

    #[test]
    fn test_no_double_damage_within_cooldown() {
        let mut fighters = vec![fighter_at(0, 100.0, 100.0), fighter_at(1, 130.0, 100.0)];
        let mut effects = Vec::new();
        let mut standings = Standings::new();
        let mut rng = SeededRandom::new(6);

        update(&mut fighters, &mut effects, &ctx(0.0), &mut standings, &mut rng);
        let victim = if fighters[0].hits_taken == 1 { 0 } else { 1 };

        // Keep them touching; the victim cannot be hit again within the window
        for step in 1..=18 {
            fighters[0].position = Vec2::new(100.0, 100.0);
            fighters[1].position = Vec2::new(130.0, 100.0);
            update(&mut fighters, &mut effects, &ctx(step as f64 * 16.0), &mut standings, &mut rng);
            assert_eq!(fighters[victim].hits_taken, 1, "step {}", step);
        }
    }

    #[test]
    fn test_final_blow_eliminates_victim() {
        let mut fighters = vec![
            fighter_at(0, 100.0, 100.0),
            fighter_at(1, 130.0, 100.0),
            fighter_at(2, 500.0, 500.0),
        ];
        fighters[0].name = "Zeus".to_string();
        fighters[1].name = "Hades".to_string();
        fighters[1].hits_taken = 2;
        // Zeus just took a hit, so only Hades is damageable
        fighters[0].last_damage_at = Some(900.0);
        let mut effects = Vec::new();
        let mut standings = Standings::new();
        let mut rng = SeededRandom::new(2);

        let events = update(&mut fighters, &mut effects, &ctx(1_000.0), &mut standings, &mut rng);
        assert!(!fighters[1].alive);
        assert_eq!(
            fighters[1].elimination_reason.as_deref(),
            Some("Zeus delivered the final blow")
        );
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            BattleEvent::Eliminated {
                fighter: 1,
                placement: 3,
                reason: "Zeus delivered the final blow".to_string(),
            }
        );
        assert_eq!(fighters[0].hits_inflicted, 1);
    }

    #[test]
    fn test_dead_fighters_do_not_collide() {
        let mut fighters = vec![fighter_at(0, 100.0, 100.0), fighter_at(1, 110.0, 100.0)];
        fighters[1].alive = false;
        let mut effects = Vec::new();
        let mut standings = Standings::new();
        let mut rng = SeededRandom::new(2);

        let events = update(&mut fighters, &mut effects, &ctx(0.0), &mut standings, &mut rng);
        assert!(events.is_empty());
        assert_eq!(fighters[0].position, Vec2::new(100.0, 100.0));
    }
}
