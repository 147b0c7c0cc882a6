use thiserror::Error;

use crate::game::systems::spawn::SpawnMode;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("viewport must be at least {min}x{min}, got {width}x{height}")]
    ViewportTooSmall { width: f32, height: f32, min: f32 },
    #[error("tick rate must be 1-1000 Hz, got {0}")]
    InvalidTickRate(u32),
    #[error("max_ticks must be at least 1")]
    ZeroMaxTicks,
}

/// Simulation driver configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BattleConfig {
    /// Viewport width the arena is sized for
    pub width: f32,
    /// Viewport height the arena is sized for
    pub height: f32,
    /// Ticks per simulated second
    pub tick_rate: u32,
    /// Pace ticks against the wall clock instead of fast-forwarding
    pub realtime: bool,
    /// Fixed RNG seed for reproducible battles
    pub seed: Option<u64>,
    /// Spawn mode used when none is given on the command line
    pub spawn_mode: SpawnMode,
    /// Safety cap on ticks per battle in headless mode
    pub max_ticks: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            width: 1040.0,
            height: 780.0,
            tick_rate: 60,
            realtime: false,
            seed: None,
            spawn_mode: SpawnMode::Random,
            max_ticks: 100_000,
        }
    }
}

impl BattleConfig {
    pub const MIN_DIMENSION: f32 = 64.0;

    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from any key lookup; invalid values are warned about and skipped
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(width) = lookup("ARENA_VIEWPORT_WIDTH") {
            match width.trim().parse::<f32>() {
                Ok(parsed) if parsed.is_finite() && parsed >= Self::MIN_DIMENSION => config.width = parsed,
                _ => tracing::warn!("Invalid ARENA_VIEWPORT_WIDTH '{}', using default", width),
            }
        }

        if let Some(height) = lookup("ARENA_VIEWPORT_HEIGHT") {
            match height.trim().parse::<f32>() {
                Ok(parsed) if parsed.is_finite() && parsed >= Self::MIN_DIMENSION => config.height = parsed,
                _ => tracing::warn!("Invalid ARENA_VIEWPORT_HEIGHT '{}', using default", height),
            }
        }

        if let Some(rate) = lookup("ARENA_TICK_RATE") {
            if let Ok(parsed) = rate.trim().parse::<u32>() {
                if (1..=1000).contains(&parsed) {
                    config.tick_rate = parsed;
                } else {
                    tracing::warn!("ARENA_TICK_RATE must be 1-1000, using default");
                }
            } else {
                tracing::warn!("Invalid ARENA_TICK_RATE '{}', using default", rate);
            }
        }

        if let Some(realtime) = lookup("ARENA_REALTIME") {
            match realtime.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.realtime = true,
                "0" | "false" | "no" | "off" => config.realtime = false,
                _ => tracing::warn!("Invalid ARENA_REALTIME '{}', using default", realtime),
            }
        }

        if let Some(seed) = lookup("ARENA_SEED") {
            if let Ok(parsed) = seed.trim().parse::<u64>() {
                config.seed = Some(parsed);
            } else {
                tracing::warn!("Invalid ARENA_SEED '{}', ignoring", seed);
            }
        }

        if let Some(mode) = lookup("ARENA_SPAWN_MODE") {
            match mode.parse::<SpawnMode>() {
                Ok(parsed) => config.spawn_mode = parsed,
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        config
    }

    /// Validate configuration after loading and CLI overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        let too_small = |v: f32| !v.is_finite() || v < Self::MIN_DIMENSION;
        if too_small(self.width) || too_small(self.height) {
            return Err(ConfigError::ViewportTooSmall {
                width: self.width,
                height: self.height,
                min: Self::MIN_DIMENSION,
            });
        }
        if !(1..=1000).contains(&self.tick_rate) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::ZeroMaxTicks);
        }
        Ok(())
    }

    /// Seconds simulated per tick
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}
