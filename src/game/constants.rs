/// Motion constants. Speeds are in arena units per second.
pub mod physics {
    /// Hard cap on fighter speed
    pub const MAX_SPEED: f32 = 350.0;
    /// Cruise speed the steering aims for, as a fraction of MAX_SPEED
    pub const DESIRED_SPEED_RATIO: f32 = 0.9;
    /// Per-frame friction at 60 fps, applied as FRICTION^(dt * 60)
    pub const FRICTION: f32 = 0.79;
    /// Frames per second the friction exponent is normalized to
    pub const FRICTION_REFERENCE_FPS: f32 = 60.0;
    /// Rate at which velocity eases toward the desired velocity (per second)
    pub const VELOCITY_EASE_RATE: f32 = 1.4;
    /// Longest frame step accepted by the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Fraction of the heading gap closed per tick
    pub const ORIENTATION_LERP: f32 = 0.18;
    /// Orientation only follows velocity above this speed
    pub const ORIENTATION_MIN_SPEED: f32 = 18.0;
}

/// Steering weights
pub mod steering {
    /// Neighbors closer than this push each other apart
    pub const AVOID_DISTANCE: f32 = 140.0;
    pub const AVOID_WEIGHT: f32 = 0.9;
    pub const CENTER_WEIGHT: f32 = 0.28;
    pub const WANDER_WEIGHT: f32 = 0.45;
    pub const PURSUIT_WEIGHT: f32 = 1.4;
    /// Panic starts at this fraction of the arena radius
    pub const PANIC_THRESHOLD_RATIO: f32 = 0.88;
    /// Upper bound of the panic term
    pub const PANIC_MAX: f32 = 2.6;
    /// Wander direction is re-rolled after this many seconds (min)
    pub const WANDER_INTERVAL_MIN: f32 = 0.6;
    /// Wander direction is re-rolled after this many seconds (max)
    pub const WANDER_INTERVAL_MAX: f32 = 2.0;
}

/// Arena sizing and shrink
pub mod arena {
    /// Safe-zone shrink speed (units per second)
    pub const SHRINK_RATE: f32 = 26.0;
    /// Initial radius = min viewport dimension / this
    pub const INITIAL_RADIUS_DIVISOR: f32 = 2.6;
    /// Floor radius = min viewport dimension / this
    pub const MIN_RADIUS_DIVISOR: f32 = 8.0;
    /// Inward pull cap for fighters beyond the boundary
    pub const BOUNDARY_PULL_MAX: f32 = 2.8;
    /// Constant added to the normalized overflow before capping
    pub const BOUNDARY_PULL_BASE: f32 = 0.4;
}

/// Boundary grace timers (milliseconds)
pub mod boundary {
    /// Time a fighter may stay outside the safe zone
    pub const OUTSIDE_GRACE_MS: f64 = 2_000.0;
    /// Additional grace for fighters that spawn outside in storm mode
    pub const STORM_EXTRA_GRACE_MS: f64 = 3_500.0;
}

/// Combat and collision
pub mod combat {
    /// Hits a fighter can take before being knocked out
    pub const STARTING_HEALTH: u32 = 3;
    /// Minimum time between two hits received by the same fighter
    pub const HIT_COOLDOWN_MS: f64 = 300.0;
    /// Floor on the closing speed used for the bounce impulse
    pub const MIN_IMPULSE_SPEED: f32 = 90.0;
    pub const IMPULSE_SCALE: f32 = 0.6;
    pub const BOUNCE_STRENGTH: f32 = 1.4;
    /// Damping applied when the pair is already separating
    pub const SEPARATION_DAMPING: f32 = 0.45;
    /// Hit effect intensity cap
    pub const MAX_IMPACT: f32 = 1.8;
    /// Relative speed that maps to an impact of 1.0, as a fraction of MAX_SPEED
    pub const IMPACT_SPEED_RATIO: f32 = 0.4;
    /// Lifetime of a hit effect
    pub const HIT_EFFECT_DURATION_MS: f64 = 260.0;
}

/// Fighter sizing and spawn geometry
pub mod spawn {
    /// Fighter radius = min viewport dimension / this, clamped
    pub const FIGHTER_RADIUS_DIVISOR: f32 = 18.0;
    pub const FIGHTER_RADIUS_MIN: f32 = 18.0;
    pub const FIGHTER_RADIUS_MAX: f32 = 32.0;
    /// Bounds fighter radius stays within after viewport rescales
    pub const RESCALED_RADIUS_MIN: f32 = 16.0;
    pub const RESCALED_RADIUS_MAX: f32 = 36.0;
    /// Spawn area as a fraction of the arena radius
    pub const SPAWN_RADIUS_RATIO: f32 = 0.72;
    /// Rejection sampling attempts per fighter in random mode
    pub const RANDOM_MAX_ATTEMPTS: u32 = 48;
    /// Minimum spacing in random mode, in fighter radii
    pub const RANDOM_SPACING: f32 = 2.4;
    /// Random initial velocity per axis, as a fraction of MAX_SPEED
    pub const INITIAL_VELOCITY_RATIO: f32 = 0.2;
    /// Storm fighters start this far out, as a fraction of the arena radius
    pub const STORM_RING_RATIO: f32 = 1.08;
    /// Storm ring thickness, in fighter radii
    pub const STORM_RING_THICKNESS: f32 = 1.8;
    /// Storm rush speed, as a fraction of MAX_SPEED
    pub const STORM_RUSH_RATIO: f32 = 0.75;
    /// Center-drop pre-shrink: radius becomes max(min * 1.4, radius * 0.82)
    pub const CENTER_MIN_RADIUS_FACTOR: f32 = 1.4;
    pub const CENTER_RADIUS_FACTOR: f32 = 0.82;
    /// Largest cluster in clusters mode
    pub const MAX_CLUSTER_SIZE: usize = 3;
}

/// Round timing
pub mod game {
    /// Countdown before the round starts (seconds)
    pub const COUNTDOWN_SECONDS: f64 = 2.0;
    /// Hard cap on round length
    pub const MAX_GAME_DURATION_MS: f64 = 13_500.0;
    /// Minimum contenders for a battle
    pub const MIN_CONTENDERS: usize = 2;
}

/// Fighter radius for a viewport with the given smaller dimension
pub fn fighter_radius_for(min_dimension: f32) -> f32 {
    (min_dimension / spawn::FIGHTER_RADIUS_DIVISOR)
        .clamp(spawn::FIGHTER_RADIUS_MIN, spawn::FIGHTER_RADIUS_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fighter_radius_clamped() {
        assert_eq!(fighter_radius_for(100.0), spawn::FIGHTER_RADIUS_MIN);
        assert_eq!(fighter_radius_for(10_000.0), spawn::FIGHTER_RADIUS_MAX);
        assert!((fighter_radius_for(450.0) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_bounds_within_rescale_bounds() {
        assert!(spawn::FIGHTER_RADIUS_MIN >= spawn::RESCALED_RADIUS_MIN);
        assert!(spawn::FIGHTER_RADIUS_MAX <= spawn::RESCALED_RADIUS_MAX);
    }

    #[test]
    fn test_wander_interval_ordered() {
        assert!(steering::WANDER_INTERVAL_MIN < steering::WANDER_INTERVAL_MAX);
    }
}
